//! Locale-style number formatting for money columns.

use serde::Deserialize;

/// Separators and precision used when printing amounts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NumberFormat {
    pub group_separator: String,
    pub decimal_separator: String,
    /// Upper bound on printed fraction digits; trailing zeros are dropped.
    pub max_fraction_digits: usize,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            group_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
            max_fraction_digits: 2,
        }
    }
}

impl NumberFormat {
    /// Formats `value` with digit grouping, e.g. `1234567.5` -> `1,234,567.5`.
    pub fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return value.to_string();
        }

        let fixed = format!("{:.*}", self.max_fraction_digits, value.abs());
        let (int_part, frac_part) = match fixed.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part.trim_end_matches('0')),
            None => (fixed.as_str(), ""),
        };

        let mut out = String::with_capacity(fixed.len() + int_part.len() / 3);
        let is_zero = int_part.bytes().all(|b| b == b'0') && frac_part.is_empty();
        if value.is_sign_negative() && !is_zero {
            out.push('-');
        }

        for (i, digit) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                out.push_str(&self.group_separator);
            }
            out.push(digit);
        }

        if !frac_part.is_empty() {
            out.push_str(&self.decimal_separator);
            out.push_str(frac_part);
        }
        out
    }
}
