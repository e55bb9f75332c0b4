//! Page layout for exported documents.
//!
//! Two engines share the same positioned-page output:
//! - [`slice`] cuts a captured bitmap into page-sized windows.
//! - [`invoice`] lays out an invoice record as text, rules and boxes.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Element has a height of {0:.2}mm which exceeds the printable page height of {1:.2}mm.")]
    ElementTooLarge(f32, f32),
    #[error("Bitmap has no pixels to lay out.")]
    EmptyBitmap,
    #[error("Invalid page geometry: {0}")]
    InvalidGeometry(String),
    #[error("Invalid date format '{0}'.")]
    InvalidDateFormat(String),
}

pub mod cursor;
pub mod fonts;
pub mod format;
pub mod invoice;
pub mod slice;
pub mod text;

mod elements;
mod output;

pub use self::cursor::{Cursor, PageBuilder};
pub use self::elements::{
    ImageElement, LayoutElement, PositionedElement, RectElement, Stroke, TextElement,
};
pub use self::fonts::FontFace;
pub use self::format::NumberFormat;
pub use self::invoice::{InvoiceLayout, InvoiceLayoutConfig, Issuer};
pub use self::output::{LaidOutDocument, Page};
pub use self::slice::{Slice, SlicePlan, plan_slices, slice_bitmap};
