//! Export configuration, loadable from a JSON file.
//!
//! Every field has a default, so `{}` is a valid configuration file.

use crate::error::ExportError;
use crate::export::RegionExportOptions;
use docket_capture::CaptureOptions;
use docket_layout::{InvoiceLayoutConfig, Issuer, NumberFormat};
use docket_types::{MM_PER_PX, PageGeometry, PageSize};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageConfig {
    pub size: PageSize,
    /// Uniform margin on all four sides.
    pub margin_mm: f32,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            size: PageSize::A4,
            margin_mm: 15.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaptureConfig {
    pub scale: f32,
    /// Length of one captured pixel in millimetres.
    pub px_to_mm: f32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            scale: CaptureOptions::default().scale,
            px_to_mm: MM_PER_PX,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportConfig {
    pub page: PageConfig,
    pub issuer: Issuer,
    pub number_format: NumberFormat,
    pub date_format: String,
    pub footer_text: String,
    pub capture: CaptureConfig,
}

impl Default for ExportConfig {
    fn default() -> Self {
        let layout = InvoiceLayoutConfig::default();
        Self {
            page: PageConfig::default(),
            issuer: layout.issuer,
            number_format: layout.number_format,
            date_format: layout.date_format,
            footer_text: layout.footer_text,
            capture: CaptureConfig::default(),
        }
    }
}

impl ExportConfig {
    pub fn from_json(json: &str) -> Result<Self, ExportError> {
        let config: ExportConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ExportError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json).map_err(|e| match e {
            ExportError::Json(e) => ExportError::Config(format!("{}: {}", path.display(), e)),
            other => other,
        })
    }

    fn validate(&self) -> Result<(), ExportError> {
        if !(self.page.margin_mm.is_finite() && self.page.margin_mm >= 0.0) {
            return Err(ExportError::Config(format!(
                "page margin must be a non-negative number, got {}",
                self.page.margin_mm
            )));
        }
        if !(self.capture.scale.is_finite() && self.capture.scale > 0.0) {
            return Err(ExportError::Config(format!(
                "capture scale must be positive, got {}",
                self.capture.scale
            )));
        }
        if !(self.capture.px_to_mm.is_finite() && self.capture.px_to_mm > 0.0) {
            return Err(ExportError::Config(format!(
                "pxToMm must be positive, got {}",
                self.capture.px_to_mm
            )));
        }
        Ok(())
    }

    pub fn invoice_layout(&self) -> InvoiceLayoutConfig {
        InvoiceLayoutConfig {
            page: PageGeometry::new(self.page.size, self.page.margin_mm),
            issuer: self.issuer.clone(),
            number_format: self.number_format.clone(),
            date_format: self.date_format.clone(),
            footer_text: self.footer_text.clone(),
        }
    }

    /// Region options on this page size. The region margin has its own default.
    pub fn region_options(&self) -> RegionExportOptions {
        RegionExportOptions {
            page_size: self.page.size,
            px_to_mm: self.capture.px_to_mm,
            capture: CaptureOptions {
                scale: self.capture.scale,
                ..CaptureOptions::default()
            },
            ..RegionExportOptions::default()
        }
    }
}
