//! Export of invoices and captured interface regions to paginated PDF.
//!
//! Two paths share one renderer:
//! - a region of a host interface is captured as a bitmap and sliced
//!   across as many pages as it needs;
//! - an invoice record is laid out as text, rules and boxes.
//!
//! Both build the document in memory and save it through a [`SaveSink`].

pub mod config;
pub mod error;
pub mod export;
pub mod sink;

pub use config::{CaptureConfig, ExportConfig, PageConfig};
pub use error::ExportError;
pub use export::{
    DEFAULT_INVOICE_FILE_NAME, DEFAULT_REGION_FILE_NAME, RegionExportOptions,
    export_invoice_to_file, export_region_to_file, render_capture_pdf, render_invoice_pdf,
    render_region_pdf,
};
pub use sink::{DirectorySink, MemorySink, SaveSink};

pub use docket_capture::{
    BitmapHost, Capture, CaptureError, CaptureHost, CaptureOptions, RegionRef,
};
pub use docket_layout::LayoutError;
pub use docket_render_lopdf::RenderError;
pub use docket_types::{Invoice, PageSize};
