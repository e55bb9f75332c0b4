//! The render cursor and the page list it writes into.

use crate::PositionedElement;
use crate::output::{LaidOutDocument, Page};
use docket_types::PageGeometry;

/// The current write position: a page index and a vertical offset on it.
///
/// Layout steps take a cursor by value and return the advanced one. `y` only
/// grows within a page and goes back to the top margin on a page break.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub y: f32,
    pub page: usize,
}

impl Cursor {
    pub fn advance(self, dy: f32) -> Cursor {
        debug_assert!(dy >= 0.0, "cursor moved backwards by {dy}");
        Cursor {
            y: self.y + dy.max(0.0),
            page: self.page,
        }
    }
}

/// Collects positioned elements per page and hands out cursors.
#[derive(Debug)]
pub struct PageBuilder {
    geometry: PageGeometry,
    pages: Vec<Page>,
}

impl PageBuilder {
    /// Starts a document with one empty page and a cursor at its top margin.
    pub fn new(geometry: PageGeometry) -> (Self, Cursor) {
        let builder = Self {
            geometry,
            pages: vec![Page::default()],
        };
        let cursor = Cursor {
            y: geometry.margin,
            page: 0,
        };
        (builder, cursor)
    }

    /// Whether `height` more millimetres fit above the bottom margin.
    pub fn fits(&self, cursor: Cursor, height: f32) -> bool {
        cursor.y + height <= self.geometry.content_bottom()
    }

    /// Appends a page and returns a cursor at its top margin.
    pub fn break_page(&mut self, cursor: Cursor) -> Cursor {
        self.pages.push(Page::default());
        let next = Cursor {
            y: self.geometry.margin,
            page: self.pages.len() - 1,
        };
        log::debug!(
            "Page break at y={:.2} on page {}; continuing on page {}.",
            cursor.y,
            cursor.page + 1,
            next.page + 1
        );
        next
    }

    /// Breaks to a new page unless `height` fits at the cursor.
    pub fn ensure_room(&mut self, cursor: Cursor, height: f32) -> Cursor {
        if self.fits(cursor, height) {
            cursor
        } else {
            self.break_page(cursor)
        }
    }

    /// Places an element on the cursor's page.
    pub fn place(&mut self, cursor: Cursor, element: PositionedElement) {
        if let Some(page) = self.pages.get_mut(cursor.page) {
            page.elements.push(element);
        }
    }

    pub fn finish(self) -> LaidOutDocument {
        LaidOutDocument {
            geometry: self.geometry,
            pages: self.pages,
        }
    }
}
