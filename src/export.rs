//! Export entry points.
//!
//! Each export builds the whole PDF in memory and hands it to the sink in a
//! single save call, so a failure never leaves a partial file behind.

use crate::config::ExportConfig;
use crate::error::ExportError;
use crate::sink::SaveSink;
use docket_capture::{Capture, CaptureHost, CaptureOptions, RegionRef, capture_region};
use docket_layout::{InvoiceLayout, plan_slices, slice_bitmap};
use docket_render_lopdf::render_document;
use docket_types::{Invoice, MM_PER_PX, PageGeometry, PageSize};
use std::sync::Arc;

pub const DEFAULT_REGION_FILE_NAME: &str = "document.pdf";
pub const DEFAULT_INVOICE_FILE_NAME: &str = "invoice.pdf";

#[derive(Debug, Clone, PartialEq)]
pub struct RegionExportOptions {
    pub page_size: PageSize,
    pub margin_mm: f32,
    /// Length of one captured pixel in millimetres.
    pub px_to_mm: f32,
    pub capture: CaptureOptions,
}

impl Default for RegionExportOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            margin_mm: 10.0,
            px_to_mm: MM_PER_PX,
            capture: CaptureOptions::default(),
        }
    }
}

impl RegionExportOptions {
    pub fn geometry(&self) -> PageGeometry {
        PageGeometry::new(self.page_size, self.margin_mm)
    }
}

/// Captures `region` and saves it as a paginated PDF.
///
/// Capture and rendering run before the returned future is first polled, so
/// the host is only borrowed for this call and several exports on one host
/// can await their saves concurrently. Resolves to the file name the document
/// was saved under.
pub fn export_region_to_file<'s, H, S>(
    host: &mut H,
    region: &RegionRef<H::Node>,
    file_name: Option<&str>,
    options: &RegionExportOptions,
    sink: &'s S,
) -> impl Future<Output = Result<String, ExportError>> + use<'s, H, S>
where
    H: CaptureHost,
    S: SaveSink,
{
    let rendered = render_region_pdf(host, region, options);
    let region = region.to_string();
    let file_name = file_name.unwrap_or(DEFAULT_REGION_FILE_NAME).to_string();
    async move {
        sink.save(&file_name, rendered?).await?;
        log::debug!("Exported region {} to {}", region, file_name);
        Ok(file_name)
    }
}

/// Resolves and captures `region`, returning the PDF bytes.
pub fn render_region_pdf<H: CaptureHost>(
    host: &mut H,
    region: &RegionRef<H::Node>,
    options: &RegionExportOptions,
) -> Result<Vec<u8>, ExportError> {
    let node = host
        .resolve(region)
        .ok_or_else(|| ExportError::ElementNotFound(region.to_string()))?;
    let capture = capture_region(host, &node, &options.capture)?;
    render_capture_pdf(&capture, options)
}

/// Lays out `invoice` and saves it as a PDF.
///
/// Returns the file name the document was saved under.
pub async fn export_invoice_to_file<S: SaveSink>(
    invoice: &Invoice,
    file_name: Option<&str>,
    config: &ExportConfig,
    sink: &S,
) -> Result<String, ExportError> {
    let bytes = render_invoice_pdf(invoice, config)?;

    let file_name = file_name.unwrap_or(DEFAULT_INVOICE_FILE_NAME);
    sink.save(file_name, bytes).await?;
    log::debug!("Exported invoice {} to {}", invoice.id, file_name);
    Ok(file_name.to_string())
}

/// Slices a capture onto pages and returns the PDF bytes.
pub fn render_capture_pdf(
    capture: &Capture,
    options: &RegionExportOptions,
) -> Result<Vec<u8>, ExportError> {
    let geometry = options.geometry();
    let plan = plan_slices(
        capture.width(),
        capture.height(),
        &geometry,
        options.px_to_mm,
    )?;
    log::debug!(
        "Slicing {}x{} px capture at scale {:.3} onto {} page(s).",
        capture.width(),
        capture.height(),
        plan.scale,
        plan.total_pages()
    );
    let document = slice_bitmap(Arc::clone(&capture.image), &plan, geometry);
    Ok(render_document(&document)?)
}

/// Validates and lays out `invoice`, returning the PDF bytes.
pub fn render_invoice_pdf(
    invoice: &Invoice,
    config: &ExportConfig,
) -> Result<Vec<u8>, ExportError> {
    invoice.validate()?;
    let layout_config = config.invoice_layout();
    let document = InvoiceLayout::new(&layout_config).layout(invoice)?;
    log::debug!("Invoice {} laid out on {} page(s).", invoice.id, document.page_count());
    Ok(render_document(&document)?)
}
