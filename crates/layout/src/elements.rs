//! Positioned drawing primitives produced by layout and consumed by renderers.
//!
//! Coordinates are millimetres with a top-left origin; renderers flip them.

use crate::fonts::FontFace;
use docket_types::{Color, Rect};
use image::RgbaImage;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct TextElement {
    pub content: String,
    pub font: FontFace,
    /// Font size in points.
    pub font_size: f32,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    /// Line width in millimetres.
    pub width: f32,
    pub color: Color,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            width: 0.3,
            color: Color::BLACK,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RectElement {
    pub fill: Option<Color>,
    pub stroke: Option<Stroke>,
}

#[derive(Debug, Clone)]
pub struct ImageElement {
    pub image: Arc<RgbaImage>,
}

impl PartialEq for ImageElement {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.image, &other.image)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutElement {
    Text(TextElement),
    /// A horizontal line along the top edge of the element box.
    Rule(Stroke),
    Rectangle(RectElement),
    Image(ImageElement),
}

/// A layout element with its box on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedElement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub element: LayoutElement,
}

impl PositionedElement {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn text(&self) -> Option<&str> {
        match &self.element {
            LayoutElement::Text(text) => Some(&text.content),
            _ => None,
        }
    }
}
