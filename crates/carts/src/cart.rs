use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use storefront_core::{DomainError, DomainResult, Entity, RecordId, StoreResult};
use storefront_products::ProductId;

use crate::line_item::LineItem;
use crate::repository::CartRepository;

/// Cart identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartId(pub RecordId);

impl CartId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for CartId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Shopping cart. Its line items live in the repository, not in the struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    id: CartId,
    created_at: DateTime<Utc>,
}

impl Cart {
    pub fn new(id: CartId, created_at: DateTime<Utc>) -> Self {
        Self { id, created_at }
    }

    pub fn id_typed(&self) -> CartId {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Find-or-build the line item for `product_id`.
    ///
    /// A saved line item comes back with its quantity increased by one; otherwise
    /// a new unsaved line item with the default quantity is returned. Nothing is
    /// persisted and `product_id` is not checked: an unknown product only fails
    /// when the caller saves the result.
    pub fn add_product<R>(&self, line_items: &R, product_id: ProductId) -> StoreResult<LineItem>
    where
        R: CartRepository + ?Sized,
    {
        let item = match line_items.find_line_item_by_product(self.id, product_id)? {
            Some(mut existing) => {
                existing.increment();
                existing
            }
            None => LineItem::build(self.id, product_id),
        };

        debug!(
            cart_id = %self.id,
            product_id = %product_id,
            quantity = item.quantity(),
            new_record = item.is_new_record(),
            "product added to cart"
        );
        Ok(item)
    }

    pub fn line_items<R>(&self, repository: &R) -> StoreResult<Vec<LineItem>>
    where
        R: CartRepository + ?Sized,
    {
        repository.line_items(self.id)
    }

    /// Delete the cart together with its line items.
    ///
    /// Returns the number of line items removed, or `NotFound` when the cart
    /// was never saved or is already gone.
    pub fn destroy<R>(self, repository: &R) -> DomainResult<usize>
    where
        R: CartRepository + ?Sized,
    {
        let removed = repository
            .delete_cart(self.id)?
            .ok_or_else(|| DomainError::not_found::<Cart>(self.id))?;
        debug!(cart_id = %self.id, line_items = removed, "cart destroyed");
        Ok(removed)
    }
}

impl Entity for Cart {
    type Id = CartId;

    const NAME: &'static str = "cart";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
