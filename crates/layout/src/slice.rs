//! Splits one tall captured bitmap across fixed-size pages.
//!
//! The bitmap is only ever shrunk to fit the printable width. When the scaled
//! height exceeds one printable page, the printable height is mapped back to
//! source pixels and the bitmap is cut into consecutive windows that tile it
//! exactly.

use crate::LayoutError;
use crate::elements::{ImageElement, LayoutElement, PositionedElement};
use crate::output::{LaidOutDocument, Page};
use docket_types::{PageGeometry, Rect};
use image::{RgbaImage, imageops};
use std::sync::Arc;

/// Tolerance for float noise when a bitmap exactly fills a whole number of pages.
const PAGE_FIT_EPSILON: f64 = 1e-6;

/// A vertical window of the source bitmap and where it lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slice {
    pub page_index: usize,
    /// Placement in page millimetres.
    pub placement: Rect,
    pub source_y: u32,
    pub source_height: u32,
}

impl Slice {
    pub fn source_end(&self) -> u32 {
        self.source_y + self.source_height
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlicePlan {
    /// Uniform scale applied to the rendered size, never above 1.
    pub scale: f32,
    pub source_width: u32,
    pub source_height: u32,
    pub slices: Vec<Slice>,
}

impl SlicePlan {
    pub fn total_pages(&self) -> usize {
        self.slices.len()
    }
}

/// Computes the page windows for a `width_px` × `height_px` bitmap.
///
/// `px_to_mm` is the length of one bitmap pixel in millimetres.
pub fn plan_slices(
    width_px: u32,
    height_px: u32,
    page: &PageGeometry,
    px_to_mm: f32,
) -> Result<SlicePlan, LayoutError> {
    if width_px == 0 || height_px == 0 {
        return Err(LayoutError::EmptyBitmap);
    }
    if !page.is_valid() {
        return Err(LayoutError::InvalidGeometry(format!(
            "printable area of {:.2}x{:.2}mm",
            page.printable_width(),
            page.printable_height()
        )));
    }
    if !(px_to_mm.is_finite() && px_to_mm > 0.0) {
        return Err(LayoutError::InvalidGeometry(format!(
            "pixel size of {}mm",
            px_to_mm
        )));
    }

    let ratio = px_to_mm as f64;
    let printable_width = page.printable_width() as f64;
    let printable_height = page.printable_height() as f64;

    let rendered_width = width_px as f64 * ratio;
    let rendered_height = height_px as f64 * ratio;
    let scale = (printable_width / rendered_width).min(1.0);
    let scaled_width = rendered_width * scale;
    let scaled_height = rendered_height * scale;
    let x = page.margin as f64 + (printable_width - scaled_width) / 2.0;
    let top = page.margin as f64;

    let pages_needed = scaled_height / printable_height;
    let total_pages = ((pages_needed - PAGE_FIT_EPSILON).ceil() as usize).max(1);

    let slices = if total_pages == 1 {
        vec![Slice {
            page_index: 0,
            placement: Rect::new(
                x as f32,
                top as f32,
                scaled_width as f32,
                scaled_height.min(printable_height) as f32,
            ),
            source_y: 0,
            source_height: height_px,
        }]
    } else {
        let px_per_page = printable_height / (ratio * scale);
        let boundary = |i: usize| -> u32 {
            if i >= total_pages {
                height_px
            } else {
                ((i as f64 * px_per_page).floor() as u32).min(height_px)
            }
        };

        (0..total_pages)
            .map(|i| {
                let source_y = boundary(i);
                let source_height = boundary(i + 1) - source_y;
                let placed_height = (source_height as f64 * ratio * scale).min(printable_height);
                Slice {
                    page_index: i,
                    placement: Rect::new(
                        x as f32,
                        top as f32,
                        scaled_width as f32,
                        placed_height as f32,
                    ),
                    source_y,
                    source_height,
                }
            })
            .collect()
    };

    log::debug!(
        "Sliced {}x{}px bitmap at scale {:.3} into {} page(s).",
        width_px,
        height_px,
        scale,
        slices.len()
    );

    Ok(SlicePlan {
        scale: scale as f32,
        source_width: width_px,
        source_height: height_px,
        slices,
    })
}

/// Crops `image` along `plan` and places one window per page.
pub fn slice_bitmap(
    image: Arc<RgbaImage>,
    plan: &SlicePlan,
    page: PageGeometry,
) -> LaidOutDocument {
    let pages = plan
        .slices
        .iter()
        .map(|slice| {
            let window = if slice.source_y == 0 && slice.source_height == image.height() {
                Arc::clone(&image)
            } else {
                let height = slice
                    .source_height
                    .min(image.height().saturating_sub(slice.source_y));
                let window = imageops::crop_imm(&*image, 0, slice.source_y, image.width(), height);
                Arc::new(window.to_image())
            };
            Page {
                elements: vec![PositionedElement {
                    x: slice.placement.x,
                    y: slice.placement.y,
                    width: slice.placement.width,
                    height: slice.placement.height,
                    element: LayoutElement::Image(ImageElement { image: window }),
                }],
            }
        })
        .collect();

    LaidOutDocument {
        geometry: page,
        pages,
    }
}
