//! Output types from the layout engines.

use crate::PositionedElement;
use docket_types::PageGeometry;

/// One page of positioned elements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub elements: Vec<PositionedElement>,
}

impl Page {
    /// Text content of the page, in placement order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(PositionedElement::text)
    }
}

/// A fully laid-out document, ready for a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutDocument {
    pub geometry: PageGeometry,
    pub pages: Vec<Page>,
}

impl LaidOutDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}
