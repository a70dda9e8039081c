//! Persistence port for the catalog.

use std::sync::Arc;

use storefront_core::StoreResult;

use crate::product::{Product, ProductId};

/// Storage operations the catalog needs.
///
/// Implementations must enforce title uniqueness atomically inside
/// `save_product` (reporting `StoreError::UniqueViolation { field: "title" }`)
/// so two concurrent creates cannot both succeed.
pub trait ProductRepository: Send + Sync {
    fn find_product(&self, id: ProductId) -> StoreResult<Option<Product>>;

    /// Exact, case-sensitive title lookup.
    fn find_product_by_title(&self, title: &str) -> StoreResult<Option<Product>>;

    fn list_products(&self) -> StoreResult<Vec<Product>>;

    /// Insert or update by primary key.
    fn save_product(&self, product: &Product) -> StoreResult<()>;

    /// Returns `false` when no product had that id.
    fn delete_product(&self, id: ProductId) -> StoreResult<bool>;

    /// Number of line items (in any cart) referencing the product.
    fn count_line_items(&self, product_id: ProductId) -> StoreResult<usize>;
}

impl<R> ProductRepository for Arc<R>
where
    R: ProductRepository + ?Sized,
{
    fn find_product(&self, id: ProductId) -> StoreResult<Option<Product>> {
        (**self).find_product(id)
    }

    fn find_product_by_title(&self, title: &str) -> StoreResult<Option<Product>> {
        (**self).find_product_by_title(title)
    }

    fn list_products(&self) -> StoreResult<Vec<Product>> {
        (**self).list_products()
    }

    fn save_product(&self, product: &Product) -> StoreResult<()> {
        (**self).save_product(product)
    }

    fn delete_product(&self, id: ProductId) -> StoreResult<bool> {
        (**self).delete_product(id)
    }

    fn count_line_items(&self, product_id: ProductId) -> StoreResult<usize> {
        (**self).count_line_items(product_id)
    }
}
