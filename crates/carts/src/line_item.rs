use serde::{Deserialize, Serialize};

use storefront_core::RecordId;
use storefront_products::ProductId;

use crate::cart::CartId;

/// Quantity of a freshly built line item.
pub const DEFAULT_QUANTITY: u32 = 1;

/// Line item identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineItemId(pub RecordId);

impl LineItemId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for LineItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// One product's presence (and quantity) within a cart.
///
/// `id` is `None` until the line item has been saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    id: Option<LineItemId>,
    cart_id: CartId,
    product_id: ProductId,
    quantity: u32,
}

impl LineItem {
    /// New, unsaved line item with the default quantity.
    pub fn build(cart_id: CartId, product_id: ProductId) -> Self {
        Self {
            id: None,
            cart_id,
            product_id,
            quantity: DEFAULT_QUANTITY,
        }
    }

    /// Rehydrate a saved line item.
    pub fn persisted(id: LineItemId, cart_id: CartId, product_id: ProductId, quantity: u32) -> Self {
        Self {
            id: Some(id),
            cart_id,
            product_id,
            quantity,
        }
    }

    pub fn id(&self) -> Option<LineItemId> {
        self.id
    }

    pub fn cart_id(&self) -> CartId {
        self.cart_id
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn is_new_record(&self) -> bool {
        self.id.is_none()
    }

    /// Add one unit (in memory only).
    pub fn increment(&mut self) {
        self.quantity = self.quantity.saturating_add(1);
    }

    /// Assign the primary key chosen by the store on first save.
    pub fn with_id(mut self, id: LineItemId) -> Self {
        self.id = Some(id);
        self
    }
}
