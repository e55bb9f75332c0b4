pub mod color;
pub mod geometry;
pub mod invoice;

pub use color::Color;
pub use geometry::{MM_PER_PX, PT_PER_MM, PageGeometry, PageSize, Rect, Size, mm_to_pt};
pub use invoice::{
    Brand, Category, Contact, Creator, Customer, Invoice, InvoiceId, LineItem, Product,
    ValidationError,
};
