//! Greedy word wrapping against the standard font metrics.

use crate::fonts::{FontFace, measure_text_width};

/// Breaks `text` into lines no wider than `max_width` millimetres.
///
/// Words are split on whitespace and explicit newlines start a new line. A
/// single word wider than the column is broken between characters. An empty
/// input yields one empty line, so every cell occupies at least one line.
pub fn wrap_text(text: &str, font: FontFace, font_size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };

            if measure_text_width(&candidate, font, font_size) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if measure_text_width(word, font, font_size) <= max_width {
                current = word.to_string();
            } else {
                let mut pieces = break_word(word, font, font_size, max_width);
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
            }
        }

        lines.push(current);
    }

    lines
}

/// Shortens `text` with a trailing ellipsis until it fits `max_width`.
pub fn truncate_to_width(text: &str, font: FontFace, font_size: f32, max_width: f32) -> String {
    if measure_text_width(text, font, font_size) <= max_width {
        return text.to_string();
    }
    let mut kept: Vec<char> = text.chars().collect();
    while !kept.is_empty() {
        kept.pop();
        let candidate = format!("{}...", kept.iter().collect::<String>().trim_end());
        if measure_text_width(&candidate, font, font_size) <= max_width {
            return candidate;
        }
    }
    String::new()
}

fn break_word(word: &str, font: FontFace, font_size: f32, max_width: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    for c in word.chars() {
        current.push(c);
        if current.chars().count() > 1
            && measure_text_width(&current, font, font_size) > max_width
        {
            current.pop();
            pieces.push(std::mem::take(&mut current));
            current.push(c);
        }
    }
    pieces.push(current);
    pieces
}
