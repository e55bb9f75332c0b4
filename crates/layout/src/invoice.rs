//! Lays an invoice record straight into page coordinates.
//!
//! Sections are emitted top to bottom: header, invoice meta, bill-to block,
//! line-item table, totals and footer. Each section takes the cursor by value
//! and returns the advanced one.

use crate::LayoutError;
use crate::cursor::{Cursor, PageBuilder};
use crate::elements::{LayoutElement, PositionedElement, RectElement, Stroke, TextElement};
use crate::fonts::{FontFace, measure_text_width};
use crate::format::NumberFormat;
use crate::output::LaidOutDocument;
use crate::text::{truncate_to_width, wrap_text};
use chrono::{DateTime, Utc};
use docket_types::{Color, Invoice, LineItem, PageGeometry, PageSize};
use serde::Deserialize;
use std::fmt::Write;

const TITLE_SIZE: f32 = 18.0;
const HEADING_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;

const LINE_HEIGHT: f32 = 5.0;
const TITLE_HEIGHT: f32 = 8.0;
const HEADING_HEIGHT: f32 = 6.0;
const SECTION_GAP: f32 = 4.0;

const CELL_PADDING: f32 = 2.0;
const QTY_COLUMN_WIDTH: f32 = 15.0;
const MONEY_COLUMN_WIDTH: f32 = 30.0;
const HEADER_ROW_HEIGHT: f32 = 8.0;
const ROW_GAP: f32 = 2.0;
/// Minimum space a line-item row needs below the cursor.
const ROW_RESERVATION: f32 = 12.0;
/// Space the totals block needs below the cursor.
const TOTALS_RESERVATION: f32 = 30.0;
const TOTALS_WIDTH: f32 = 72.0;
const TOTAL_BOX_HEIGHT: f32 = 8.0;

const HEADER_SHADE: u8 = 230;

/// The business printed at the top of every invoice.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Issuer {
    pub name: String,
    pub tax_id: String,
}

impl Default for Issuer {
    fn default() -> Self {
        Self {
            name: "Company".to_string(),
            tax_id: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceLayoutConfig {
    pub page: PageGeometry,
    pub issuer: Issuer,
    pub number_format: NumberFormat,
    /// chrono `strftime` pattern for the creation timestamp.
    pub date_format: String,
    pub footer_text: String,
}

impl Default for InvoiceLayoutConfig {
    fn default() -> Self {
        Self {
            page: PageGeometry::new(PageSize::A4, 15.0),
            issuer: Issuer::default(),
            number_format: NumberFormat::default(),
            date_format: "%d/%m/%Y %H:%M".to_string(),
            footer_text: "Thank you for your business!".to_string(),
        }
    }
}

/// Column edges of the line-item table, in page millimetres.
struct Columns {
    qty_x: f32,
    description_x: f32,
    description_width: f32,
    unit_price_right: f32,
    subtotal_right: f32,
}

impl Columns {
    fn new(page: &PageGeometry) -> Self {
        let left = page.margin;
        let right = page.content_right();
        let description_x = left + QTY_COLUMN_WIDTH + CELL_PADDING;
        let description_end = right - 2.0 * MONEY_COLUMN_WIDTH;
        Self {
            qty_x: left + CELL_PADDING,
            description_x,
            description_width: (description_end - CELL_PADDING - description_x).max(1.0),
            unit_price_right: right - MONEY_COLUMN_WIDTH - CELL_PADDING,
            subtotal_right: right - CELL_PADDING,
        }
    }
}

/// Lays out invoices with one fixed configuration.
pub struct InvoiceLayout<'a> {
    config: &'a InvoiceLayoutConfig,
    columns: Columns,
}

impl<'a> InvoiceLayout<'a> {
    pub fn new(config: &'a InvoiceLayoutConfig) -> Self {
        Self {
            config,
            columns: Columns::new(&config.page),
        }
    }

    fn page(&self) -> &PageGeometry {
        &self.config.page
    }

    pub fn layout(&self, invoice: &Invoice) -> Result<LaidOutDocument, LayoutError> {
        if !self.page().is_valid() {
            return Err(LayoutError::InvalidGeometry(format!("{:?}", self.page())));
        }
        let created_at = format_timestamp(&invoice.created_at, &self.config.date_format)?;

        let (mut builder, cursor) = PageBuilder::new(*self.page());
        let cursor = self.header(&mut builder, cursor);
        let cursor = self.meta(&mut builder, cursor, invoice, &created_at);
        let cursor = self.bill_to(&mut builder, cursor, invoice);
        let cursor = self.items_table(&mut builder, cursor, invoice.items())?;
        let cursor = self.totals(&mut builder, cursor, invoice);
        self.footer(&mut builder, cursor);

        let document = builder.finish();
        log::debug!(
            "Laid out invoice {} with {} item(s) on {} page(s).",
            invoice.id,
            invoice.items().len(),
            document.page_count()
        );
        Ok(document)
    }

    fn header(&self, builder: &mut PageBuilder, cursor: Cursor) -> Cursor {
        let page = *self.page();
        let issuer = &self.config.issuer;

        let tax_id = (!issuer.tax_id.trim().is_empty())
            .then(|| format!("Tax ID: {}", issuer.tax_id.trim()));
        let tax_width = tax_id
            .as_deref()
            .map(|t| BODY.width(t) + SECTION_GAP)
            .unwrap_or(0.0);

        let name = TITLE.truncate(&issuer.name, page.printable_width() - tax_width);
        builder.place(cursor, TITLE.left(name, page.margin, cursor.y));
        if let Some(tax_id) = tax_id {
            builder.place(
                cursor,
                BODY.right(tax_id, page.content_right(), cursor.y + 2.0),
            );
        }

        let cursor = cursor.advance(TITLE_HEIGHT + 2.0);
        builder.place(cursor, rule(page.margin, cursor.y, page.printable_width()));
        cursor.advance(SECTION_GAP)
    }

    fn meta(
        &self,
        builder: &mut PageBuilder,
        cursor: Cursor,
        invoice: &Invoice,
        created_at: &str,
    ) -> Cursor {
        let page = *self.page();
        let title_width = page.printable_width() - BODY.width(created_at) - SECTION_GAP;
        let title = HEADING.truncate(&format!("Invoice #{}", invoice.id), title_width);
        builder.place(cursor, HEADING.left(title, page.margin, cursor.y));
        builder.place(
            cursor,
            BODY.right(created_at, page.content_right(), cursor.y + 1.0),
        );
        cursor.advance(HEADING_HEIGHT + SECTION_GAP)
    }

    fn bill_to(&self, builder: &mut PageBuilder, cursor: Cursor, invoice: &Invoice) -> Cursor {
        let contact = invoice.billing_contact();
        let lines = contact.lines();
        if lines.is_empty() {
            return cursor;
        }

        let page = *self.page();
        let mut cursor = builder.ensure_room(cursor, 2.0 * LINE_HEIGHT);
        builder.place(cursor, BODY_BOLD.left("Bill to:", page.margin, cursor.y));
        cursor = cursor.advance(LINE_HEIGHT);

        for field in lines {
            for line in BODY.wrap(field, page.printable_width()) {
                cursor = builder.ensure_room(cursor, LINE_HEIGHT);
                builder.place(cursor, BODY.left(line, page.margin, cursor.y));
                cursor = cursor.advance(LINE_HEIGHT);
            }
        }
        cursor.advance(SECTION_GAP)
    }

    fn items_table(
        &self,
        builder: &mut PageBuilder,
        cursor: Cursor,
        items: &[LineItem],
    ) -> Result<Cursor, LayoutError> {
        let page = *self.page();
        let cols = &self.columns;

        let mut cursor =
            builder.ensure_room(cursor, HEADER_ROW_HEIGHT + ROW_GAP + ROW_RESERVATION);
        builder.place(
            cursor,
            PositionedElement {
                x: page.margin,
                y: cursor.y,
                width: page.printable_width(),
                height: HEADER_ROW_HEIGHT,
                element: LayoutElement::Rectangle(RectElement {
                    fill: Some(Color::gray(HEADER_SHADE)),
                    stroke: None,
                }),
            },
        );
        let label_y = cursor.y + (HEADER_ROW_HEIGHT - LINE_HEIGHT) / 2.0;
        builder.place(cursor, BODY_BOLD.left("Qty", cols.qty_x, label_y));
        builder.place(
            cursor,
            BODY_BOLD.left("Description", cols.description_x, label_y),
        );
        builder.place(
            cursor,
            BODY_BOLD.right("Unit price", cols.unit_price_right, label_y),
        );
        builder.place(
            cursor,
            BODY_BOLD.right("Subtotal", cols.subtotal_right, label_y),
        );
        cursor = cursor.advance(HEADER_ROW_HEIGHT + ROW_GAP);

        for item in items {
            cursor = self.item_row(builder, cursor, item)?;
        }
        Ok(cursor)
    }

    /// Emits one row. The row moves to a fresh page as a whole when it does not fit.
    fn item_row(
        &self,
        builder: &mut PageBuilder,
        cursor: Cursor,
        item: &LineItem,
    ) -> Result<Cursor, LayoutError> {
        let page = *self.page();
        let cols = &self.columns;
        let fmt = &self.config.number_format;

        let lines = BODY.wrap(&item.description(), cols.description_width);
        let row_height = lines.len() as f32 * LINE_HEIGHT;
        let reservation = ROW_RESERVATION.max(row_height);
        if reservation > page.printable_height() {
            return Err(LayoutError::ElementTooLarge(reservation, page.printable_height()));
        }

        let cursor = builder.ensure_room(cursor, reservation);
        let last_line_y = cursor.y + (lines.len() - 1) as f32 * LINE_HEIGHT;

        builder.place(
            cursor,
            BODY.left(fmt.format(item.quantity), cols.qty_x, cursor.y),
        );
        for (i, line) in lines.into_iter().enumerate() {
            let y = cursor.y + i as f32 * LINE_HEIGHT;
            builder.place(cursor, BODY.left(line, cols.description_x, y));
        }
        let unit_price = fmt.format(item.product.price);
        builder.place(
            cursor,
            BODY.right(unit_price, cols.unit_price_right, last_line_y),
        );
        let subtotal = fmt.format(item.subtotal());
        builder.place(
            cursor,
            BODY_BOLD.right(subtotal, cols.subtotal_right, last_line_y),
        );

        Ok(cursor.advance(row_height + ROW_GAP))
    }

    fn totals(&self, builder: &mut PageBuilder, cursor: Cursor, invoice: &Invoice) -> Cursor {
        let page = *self.page();
        let fmt = &self.config.number_format;
        let box_x = page.content_right() - TOTALS_WIDTH;
        let label_x = box_x + CELL_PADDING;
        let value_right = page.content_right() - CELL_PADDING;

        let cursor = builder.ensure_room(cursor, TOTALS_RESERVATION);
        let cursor = cursor.advance(ROW_GAP);
        builder.place(cursor, rule(box_x, cursor.y, TOTALS_WIDTH));

        let cursor = cursor.advance(ROW_GAP);
        let subtotal = fmt.format(invoice.computed_subtotal());
        builder.place(cursor, BODY.left("Subtotal:", label_x, cursor.y));
        builder.place(cursor, BODY.right(subtotal, value_right, cursor.y));

        let cursor = cursor.advance(LINE_HEIGHT);
        builder.place(cursor, BODY.left("Tax:", label_x, cursor.y));
        builder.place(cursor, BODY.right(fmt.format(0.0), value_right, cursor.y));

        let cursor = cursor.advance(LINE_HEIGHT + ROW_GAP);
        builder.place(
            cursor,
            PositionedElement {
                x: box_x,
                y: cursor.y,
                width: TOTALS_WIDTH,
                height: TOTAL_BOX_HEIGHT,
                element: LayoutElement::Rectangle(RectElement {
                    fill: None,
                    stroke: Some(Stroke::default()),
                }),
            },
        );
        let text_y = cursor.y + (TOTAL_BOX_HEIGHT - HEADING_HEIGHT) / 2.0;
        builder.place(cursor, HEADING.left("Total:", label_x, text_y));
        builder.place(
            cursor,
            HEADING.right(fmt.format(invoice.total()), value_right, text_y),
        );

        cursor.advance(TOTAL_BOX_HEIGHT)
    }

    /// Pins the thank-you line to the bottom margin of the last page.
    fn footer(&self, builder: &mut PageBuilder, cursor: Cursor) {
        let page = *self.page();
        let footer_y = page.content_bottom() - LINE_HEIGHT;
        let cursor = if cursor.y > footer_y {
            builder.break_page(cursor)
        } else {
            cursor
        };

        let text = BODY.truncate(&self.config.footer_text, page.printable_width());
        let x = page.margin + (page.printable_width() - BODY.width(&text)) / 2.0;
        builder.place(cursor, BODY.left(text, x, footer_y));
    }
}

/// Renders `timestamp` with a chrono pattern, rejecting malformed patterns.
pub fn format_timestamp(timestamp: &DateTime<Utc>, pattern: &str) -> Result<String, LayoutError> {
    let mut out = String::new();
    write!(out, "{}", timestamp.format(pattern))
        .map_err(|_| LayoutError::InvalidDateFormat(pattern.to_string()))?;
    Ok(out)
}

/// A font at one size, with the line height it occupies.
#[derive(Debug, Clone, Copy)]
struct TextStyle {
    font: FontFace,
    size: f32,
    line_height: f32,
}

const TITLE: TextStyle = TextStyle {
    font: FontFace::HelveticaBold,
    size: TITLE_SIZE,
    line_height: TITLE_HEIGHT,
};
const HEADING: TextStyle = TextStyle {
    font: FontFace::HelveticaBold,
    size: HEADING_SIZE,
    line_height: HEADING_HEIGHT,
};
const BODY: TextStyle = TextStyle {
    font: FontFace::Helvetica,
    size: BODY_SIZE,
    line_height: LINE_HEIGHT,
};
const BODY_BOLD: TextStyle = TextStyle {
    font: FontFace::HelveticaBold,
    ..BODY
};

impl TextStyle {
    fn width(&self, text: &str) -> f32 {
        measure_text_width(text, self.font, self.size)
    }

    fn truncate(&self, text: &str, max_width: f32) -> String {
        truncate_to_width(text, self.font, self.size, max_width)
    }

    fn wrap(&self, text: &str, max_width: f32) -> Vec<String> {
        wrap_text(text, self.font, self.size, max_width)
    }

    fn left(&self, content: impl Into<String>, x: f32, y: f32) -> PositionedElement {
        let content = content.into();
        PositionedElement {
            x,
            y,
            width: self.width(&content),
            height: self.line_height,
            element: LayoutElement::Text(TextElement {
                content,
                font: self.font,
                font_size: self.size,
                color: Color::BLACK,
            }),
        }
    }

    fn right(&self, content: impl Into<String>, right: f32, y: f32) -> PositionedElement {
        let content = content.into();
        let x = right - self.width(&content);
        self.left(content, x, y)
    }
}

fn rule(x: f32, y: f32, width: f32) -> PositionedElement {
    PositionedElement {
        x,
        y,
        width,
        height: 0.0,
        element: LayoutElement::Rule(Stroke::default()),
    }
}
