//! Carts domain module.
//!
//! A cart aggregates line items; `Cart::add_product` finds the cart's line item
//! for a product and bumps it, or builds a new unsaved one. Persisting the
//! result is the caller's job, through the [`CartRepository`] port.

pub mod cart;
pub mod line_item;
pub mod repository;

pub use cart::{Cart, CartId};
pub use line_item::{DEFAULT_QUANTITY, LineItem, LineItemId};
pub use repository::CartRepository;
