//! PDF assembly for laid-out documents using lopdf.
//!
//! The whole document is built in memory: one shared resources dictionary
//! (both Helvetica faces and every embedded image), one Flate-compressed
//! content stream per page.

mod error;
mod images;

pub use error::RenderError;

use docket_layout::{
    FontFace, LaidOutDocument, LayoutElement, Page, PositionedElement, RectElement, Stroke,
    TextElement,
};
use docket_types::{Color, PT_PER_MM, mm_to_pt};
use flate2::Compression;
use flate2::write::ZlibEncoder;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use std::io::Write;

/// Renders `document` to PDF bytes.
pub fn render_document(document: &LaidOutDocument) -> Result<Vec<u8>, RenderError> {
    let mut pdf = Document::with_version("1.7");
    let pages_id = pdf.new_object_id();

    let mut font_dict = Dictionary::new();
    for face in [FontFace::Helvetica, FontFace::HelveticaBold] {
        let font_id = pdf.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => face.postscript_name(),
            "Encoding" => "WinAnsiEncoding",
        });
        font_dict.set(font_resource(face), font_id);
    }

    let mut xobjects = Dictionary::new();
    let mut image_names = Vec::with_capacity(document.pages.len());
    for (page_idx, page) in document.pages.iter().enumerate() {
        let mut names = Vec::new();
        for (el_idx, el) in page.elements.iter().enumerate() {
            if let LayoutElement::Image(image) = &el.element {
                let name = format!("Im{}_{}", page_idx + 1, el_idx + 1);
                let image_id = pdf.add_object(images::image_xobject(&image.image)?);
                xobjects.set(name.as_bytes(), image_id);
                names.push(name);
            }
        }
        image_names.push(names);
    }

    let resources_id = pdf.add_object(dictionary! {
        "Font" => font_dict,
        "XObject" => xobjects,
    });

    let (page_width, page_height) = (
        mm_to_pt(document.geometry.width),
        mm_to_pt(document.geometry.height),
    );

    let mut page_ids: Vec<ObjectId> = Vec::with_capacity(document.pages.len());
    for (page, names) in document.pages.iter().zip(image_names) {
        let content = PageContext::new(page_height, names).render(page);
        let content_id = pdf.add_object(compressed_stream(&content.encode()?)?);

        let page_id = pdf.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), page_width.into(), page_height.into()],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        page_ids.push(page_id);
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::from(*id)).collect();
    pdf.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_ids.len() as i64,
        }),
    );
    let catalog_id = pdf.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    pdf.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    pdf.save_to(&mut buffer)?;
    log::debug!("Rendered {} page(s) into {} bytes.", page_ids.len(), buffer.len());
    Ok(buffer)
}

pub(crate) fn compressed_stream(data: &[u8]) -> Result<Stream, RenderError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    let compressed = encoder.finish()?;
    Ok(Stream::new(dictionary! { "Filter" => "FlateDecode" }, compressed))
}

fn to_win_ansi(s: &str) -> Vec<u8> {
    s.chars().map(|c| if c as u32 <= 255 { c as u8 } else { b'?' }).collect()
}

fn font_resource(face: FontFace) -> &'static str {
    match face {
        FontFace::Helvetica => "F1",
        FontFace::HelveticaBold => "F2",
    }
}

fn rgb_operands(color: &Color) -> Vec<Object> {
    color.to_unit_rgb().iter().map(|c| (*c).into()).collect()
}

#[derive(Default, Clone, PartialEq)]
struct PageRenderState {
    font_name: &'static str,
    font_size: f32,
    fill_color: Option<Color>,
}

struct PageContext {
    page_height: f32,
    image_names: std::vec::IntoIter<String>,
    content: Content,
    state: PageRenderState,
}

impl PageContext {
    fn new(page_height: f32, image_names: Vec<String>) -> Self {
        Self {
            page_height,
            image_names: image_names.into_iter(),
            content: Content { operations: vec![] },
            state: PageRenderState::default(),
        }
    }

    fn render(mut self, page: &Page) -> Content {
        for el in &page.elements {
            self.draw_element(el);
        }
        self.content
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.content.operations.push(Operation::new(operator, operands));
    }

    /// PDF y in points for a layout y in millimetres.
    fn flip(&self, y_mm: f32) -> f32 {
        self.page_height - mm_to_pt(y_mm)
    }

    fn draw_element(&mut self, el: &PositionedElement) {
        match &el.element {
            LayoutElement::Text(text) => self.draw_text(text, el),
            LayoutElement::Rule(stroke) => self.draw_rule(stroke, el),
            LayoutElement::Rectangle(rect) => self.draw_rectangle(rect, el),
            LayoutElement::Image(_) => self.draw_image(el),
        }
    }

    fn set_fill_color(&mut self, color: &Color) {
        if self.state.fill_color.as_ref() != Some(color) {
            self.push("rg", rgb_operands(color));
            self.state.fill_color = Some(*color);
        }
    }

    fn set_stroke(&mut self, stroke: &Stroke) {
        self.push("w", vec![mm_to_pt(stroke.width).into()]);
        self.push("RG", rgb_operands(&stroke.color));
    }

    fn draw_text(&mut self, text: &TextElement, el: &PositionedElement) {
        if text.content.trim().is_empty() {
            return;
        }
        self.push("BT", vec![]);
        let font_name = font_resource(text.font);
        if self.state.font_name != font_name || self.state.font_size != text.font_size {
            self.push("Tf", vec![font_name.into(), text.font_size.into()]);
            self.state.font_name = font_name;
            self.state.font_size = text.font_size;
        }
        self.set_fill_color(&text.color);
        let baseline_y = el.y + text.font_size * 0.8 / PT_PER_MM;
        let pdf_y = self.flip(baseline_y);
        self.push("Td", vec![mm_to_pt(el.x).into(), pdf_y.into()]);
        self.push("Tj", vec![Object::string_literal(to_win_ansi(&text.content))]);
        self.push("ET", vec![]);
    }

    fn draw_rule(&mut self, stroke: &Stroke, el: &PositionedElement) {
        self.set_stroke(stroke);
        let y = self.flip(el.y);
        self.push("m", vec![mm_to_pt(el.x).into(), y.into()]);
        self.push("l", vec![mm_to_pt(el.x + el.width).into(), y.into()]);
        self.push("S", vec![]);
    }

    fn draw_rectangle(&mut self, rect: &RectElement, el: &PositionedElement) {
        let operator = match (&rect.fill, &rect.stroke) {
            (None, None) => return,
            (Some(_), None) => "f",
            (None, Some(_)) => "S",
            (Some(_), Some(_)) => "B",
        };
        if let Some(fill) = &rect.fill {
            self.set_fill_color(fill);
        }
        if let Some(stroke) = &rect.stroke {
            self.set_stroke(stroke);
        }
        let y = self.flip(el.y + el.height);
        self.push(
            "re",
            vec![
                mm_to_pt(el.x).into(),
                y.into(),
                mm_to_pt(el.width).into(),
                mm_to_pt(el.height).into(),
            ],
        );
        self.push(operator, vec![]);
    }

    fn draw_image(&mut self, el: &PositionedElement) {
        let Some(name) = self.image_names.next() else {
            log::warn!("Image element without a registered XObject, skipping.");
            return;
        };
        let y = self.flip(el.y + el.height);
        self.push("q", vec![]);
        self.push(
            "cm",
            vec![
                mm_to_pt(el.width).into(),
                0.into(),
                0.into(),
                mm_to_pt(el.height).into(),
                mm_to_pt(el.x).into(),
                y.into(),
            ],
        );
        self.push("Do", vec![Object::Name(name.into_bytes())]);
        self.push("Q", vec![]);
    }
}
