use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CaptureError {
    #[error("Unsupported color function '{function}': {message}")]
    UnsupportedColorFunction { function: String, message: String },
    #[error("Could not clone region off-screen: {0}")]
    OffscreenClone(String),
    #[error("Rasterization failed: {0}")]
    Rasterize(String),
}
