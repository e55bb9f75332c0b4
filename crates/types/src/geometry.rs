use serde::{Deserialize, Deserializer, de};

/// Millimetres covered by one CSS pixel at the 96 DPI reference resolution.
pub const MM_PER_PX: f32 = 25.4 / 96.0;

/// PDF points per millimetre.
pub const PT_PER_MM: f32 = 72.0 / 25.4;

/// Converts millimetres to PDF points.
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * PT_PER_MM
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Paper sizes, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PageSize {
    #[default]
    A4,
    Letter,
    Legal,
    Custom { width: f32, height: f32 },
}

impl<'de> Deserialize<'de> for PageSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum PageSizeDef {
            Name(String),
            Dimensions { width: f32, height: f32 },
        }

        match PageSizeDef::deserialize(deserializer)? {
            PageSizeDef::Name(name) => match name.to_ascii_lowercase().as_str() {
                "a4" => Ok(PageSize::A4),
                "letter" => Ok(PageSize::Letter),
                "legal" => Ok(PageSize::Legal),
                other => Err(de::Error::custom(format!("Unknown page size: {}", other))),
            },
            PageSizeDef::Dimensions { width, height } => Ok(PageSize::Custom { width, height }),
        }
    }
}

impl PageSize {
    /// Width and height in millimetres.
    pub fn dimensions_mm(&self) -> Size {
        match self {
            PageSize::A4 => Size::new(210.0, 297.0),
            PageSize::Letter => Size::new(215.9, 279.4),
            PageSize::Legal => Size::new(215.9, 355.6),
            PageSize::Custom { width, height } => Size::new(*width, *height),
        }
    }
}

/// A page with a uniform margin on all four sides. All values in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl PageGeometry {
    pub fn new(size: PageSize, margin: f32) -> Self {
        let Size { width, height } = size.dimensions_mm();
        Self { width, height, margin }
    }

    pub fn printable_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    pub fn printable_height(&self) -> f32 {
        self.height - 2.0 * self.margin
    }

    /// The y coordinate content must not pass.
    pub fn content_bottom(&self) -> f32 {
        self.height - self.margin
    }

    pub fn content_right(&self) -> f32 {
        self.width - self.margin
    }

    /// True when the printable area is non-empty and every value is finite.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite()
            && self.height.is_finite()
            && self.margin.is_finite()
            && self.margin >= 0.0
            && self.printable_width() > 0.0
            && self.printable_height() > 0.0
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::new(PageSize::A4, 10.0)
    }
}
