//! Replacement of color syntax the rasterizer cannot parse.
//!
//! Modern stylesheets resolve to functions such as `oklch()` that older
//! rasterizers reject. The fallback pass copies each node's computed color
//! values from the live original onto the off-screen clone, swapping any
//! value that still uses an unsupported function for a plain one.

use crate::error::CaptureError;
use crate::host::CaptureHost;
use crate::zip::zip_trees;
use serde::Deserialize;

/// Style properties copied by the fallback pass.
pub const COLOR_PROPERTIES: [&str; 8] = [
    "color",
    "background-color",
    "background",
    "border-top-color",
    "border-right-color",
    "border-bottom-color",
    "border-left-color",
    "box-shadow",
];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorFallback {
    /// Function names (without parentheses) the rasterizer cannot parse.
    pub unsupported_functions: Vec<String>,
    /// Substitute for color-valued properties.
    pub color: String,
    /// Substitute for `box-shadow` and the `background` shorthand.
    pub none: String,
}

impl Default for ColorFallback {
    fn default() -> Self {
        Self {
            unsupported_functions: ["oklch", "oklab", "lab", "lch", "color", "color-mix"]
                .into_iter()
                .map(String::from)
                .collect(),
            color: "#000000".to_string(),
            none: "none".to_string(),
        }
    }
}

impl ColorFallback {
    /// The first unsupported function called in `value`, if any.
    pub fn find_unsupported<'a>(&'a self, value: &str) -> Option<&'a str> {
        let lower = value.to_ascii_lowercase();
        self.unsupported_functions
            .iter()
            .find(|name| contains_call(&lower, &name.to_ascii_lowercase()))
            .map(String::as_str)
    }

    /// Whether `err` was caused by an unsupported color function.
    pub fn is_unsupported_color(&self, err: &CaptureError) -> bool {
        match err {
            CaptureError::UnsupportedColorFunction { .. } => true,
            CaptureError::Rasterize(message) => {
                message.to_ascii_lowercase().contains("color")
                    && self.find_unsupported(message).is_some()
            }
            CaptureError::OffscreenClone(_) => false,
        }
    }

    /// The value to write for `property`, given the original's computed value.
    pub fn resolve(&self, property: &str, value: &str) -> String {
        match self.find_unsupported(value) {
            None => value.to_string(),
            Some(_) if property == "box-shadow" || property == "background" => self.none.clone(),
            Some(_) => self.color.clone(),
        }
    }
}

/// True when `haystack` contains `name(` not preceded by an identifier character,
/// so `lab` does not match inside `oklab(`. Error messages often quote the bare
/// name, so a quoted occurrence counts too.
fn contains_call(haystack: &str, name: &str) -> bool {
    haystack.match_indices(name).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + name.len()..].chars().next();
        let boundary_before =
            !before.is_some_and(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        let call_or_quote = match after {
            Some('(') => true,
            Some('"') | Some('\'') => matches!(before, Some('"') | Some('\'')),
            _ => false,
        };
        boundary_before && call_or_quote
    })
}

/// Copies the color properties of every node under `original` onto the
/// matching node under `clone`, substituting unsupported values.
///
/// Returns the number of substituted values.
pub fn sanitize_colors<H: CaptureHost>(
    host: &mut H,
    original: &H::Node,
    clone: &H::Node,
    fallback: &ColorFallback,
) -> usize {
    let pairs = {
        let reader = &*host;
        zip_trees(
            original.clone(),
            clone.clone(),
            |n| reader.children(n),
            |n| reader.children(n),
        )
    };

    let mut substituted = 0;
    for (source, target) in &pairs {
        for property in COLOR_PROPERTIES {
            let Some(value) = host.computed_style(source, property) else {
                continue;
            };
            let resolved = fallback.resolve(property, &value);
            if resolved != value {
                log::trace!("Replacing {}: {} with {}", property, value, resolved);
                substituted += 1;
            }
            host.set_style(target, property, &resolved);
        }
    }

    log::debug!(
        "Color fallback visited {} node pair(s), substituted {} value(s).",
        pairs.len(),
        substituted
    );
    substituted
}
