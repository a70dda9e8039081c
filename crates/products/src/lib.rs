//! Products domain module (catalog).
//!
//! Business rules for catalog entries: field validation, title uniqueness and
//! the guard that keeps referenced products from being deleted. Storage is
//! reached only through the [`ProductRepository`] port.

pub mod catalog;
pub mod product;
pub mod repository;

pub use catalog::ProductCatalog;
pub use product::{IMAGE_URL_MESSAGE, LINE_ITEMS_PRESENT, Product, ProductId, ProductParams, min_price};
pub use repository::ProductRepository;
