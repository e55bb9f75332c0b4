use docket_capture::CaptureError;
use docket_layout::LayoutError;
use docket_render_lopdf::RenderError;
use thiserror::Error;

/// Errors surfaced by the export entry points.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Element '{0}' could not be found.")]
    ElementNotFound(String),

    #[error("Capture failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Invoice is invalid: {0}")]
    InvalidInvoice(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not decode bitmap: {0}")]
    Image(#[from] image::ImageError),
}

impl From<docket_types::ValidationError> for ExportError {
    fn from(e: docket_types::ValidationError) -> Self {
        ExportError::InvalidInvoice(e.to_string())
    }
}
