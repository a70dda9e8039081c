//! Persistence port for carts and their line items.

use std::sync::Arc;

use storefront_core::StoreResult;
use storefront_products::ProductId;

use crate::cart::{Cart, CartId};
use crate::line_item::LineItem;

/// Storage operations carts need.
pub trait CartRepository: Send + Sync {
    fn find_cart(&self, id: CartId) -> StoreResult<Option<Cart>>;

    fn save_cart(&self, cart: &Cart) -> StoreResult<()>;

    /// Delete the cart and every line item it owns.
    ///
    /// Returns the number of line items removed, or `None` for an unknown cart.
    fn delete_cart(&self, id: CartId) -> StoreResult<Option<usize>>;

    /// First saved line item of `cart_id` whose product is `product_id`.
    fn find_line_item_by_product(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> StoreResult<Option<LineItem>>;

    /// Saved line items of the cart, in insertion order.
    fn line_items(&self, cart_id: CartId) -> StoreResult<Vec<LineItem>>;

    /// Insert (assigning an id) or update a line item.
    ///
    /// Rejects unknown carts and products with `StoreError::ForeignKey`.
    fn save_line_item(&self, item: LineItem) -> StoreResult<LineItem>;
}

impl<R> CartRepository for Arc<R>
where
    R: CartRepository + ?Sized,
{
    fn find_cart(&self, id: CartId) -> StoreResult<Option<Cart>> {
        (**self).find_cart(id)
    }

    fn save_cart(&self, cart: &Cart) -> StoreResult<()> {
        (**self).save_cart(cart)
    }

    fn delete_cart(&self, id: CartId) -> StoreResult<Option<usize>> {
        (**self).delete_cart(id)
    }

    fn find_line_item_by_product(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> StoreResult<Option<LineItem>> {
        (**self).find_line_item_by_product(cart_id, product_id)
    }

    fn line_items(&self, cart_id: CartId) -> StoreResult<Vec<LineItem>> {
        (**self).line_items(cart_id)
    }

    fn save_line_item(&self, item: LineItem) -> StoreResult<LineItem> {
        (**self).save_line_item(item)
    }
}
