//! Region capture for the export pipeline.
//!
//! A region of the host interface is cloned off-screen, forced onto an
//! explicit background and rasterized. When the rasterizer rejects a color
//! function, the clone's colors are rewritten from the original's computed
//! styles and the capture is retried once.

mod bitmap_host;
mod colors;
mod error;
mod host;
mod rasterizer;
mod zip;

pub use bitmap_host::BitmapHost;
pub use colors::{COLOR_PROPERTIES, ColorFallback, sanitize_colors};
pub use error::CaptureError;
pub use host::{CaptureHost, RegionRef};
pub use rasterizer::{
    Capture, CaptureOptions, OffscreenClone, capture_region, capture_with_recovery,
};
pub use zip::zip_trees;
