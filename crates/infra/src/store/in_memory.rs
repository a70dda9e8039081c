use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::trace;

use storefront_carts::{Cart, CartId, CartRepository, LineItem, LineItemId};
use storefront_core::{RecordId, StoreError, StoreResult};
use storefront_products::{Product, ProductId, ProductRepository};

#[derive(Debug, Default)]
struct Tables {
    products: HashMap<ProductId, Product>,
    carts: HashMap<CartId, Cart>,
    /// Insertion order is the lookup order for `find_line_item_by_product`.
    line_items: Vec<LineItem>,
}

/// In-memory relational store for products, carts and line items.
///
/// Intended for tests/dev. All tables sit behind one lock, so the unique
/// title index and the foreign-key checks see a consistent snapshot.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| StoreError::unavailable("lock poisoned"))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| StoreError::unavailable("lock poisoned"))
    }
}

impl ProductRepository for InMemoryStore {
    fn find_product(&self, id: ProductId) -> StoreResult<Option<Product>> {
        Ok(self.read()?.products.get(&id).cloned())
    }

    fn find_product_by_title(&self, title: &str) -> StoreResult<Option<Product>> {
        Ok(self
            .read()?
            .products
            .values()
            .find(|p| p.title() == title)
            .cloned())
    }

    fn list_products(&self) -> StoreResult<Vec<Product>> {
        Ok(self.read()?.products.values().cloned().collect())
    }

    fn save_product(&self, product: &Product) -> StoreResult<()> {
        let mut tables = self.write()?;

        let id = product.id_typed();
        let taken = tables
            .products
            .values()
            .any(|p| p.title() == product.title() && p.id_typed() != id);
        if taken {
            return Err(StoreError::UniqueViolation { field: "title" });
        }

        tables.products.insert(id, product.clone());
        trace!(product_id = %id, "product row written");
        Ok(())
    }

    // ON DELETE RESTRICT: referenced rows stay.
    fn delete_product(&self, id: ProductId) -> StoreResult<bool> {
        let mut tables = self.write()?;

        if tables.line_items.iter().any(|i| i.product_id() == id) {
            return Err(StoreError::foreign_key("product_id", id));
        }

        let removed = tables.products.remove(&id).is_some();
        trace!(product_id = %id, removed, "product row deleted");
        Ok(removed)
    }

    fn count_line_items(&self, product_id: ProductId) -> StoreResult<usize> {
        Ok(self
            .read()?
            .line_items
            .iter()
            .filter(|i| i.product_id() == product_id)
            .count())
    }
}

impl CartRepository for InMemoryStore {
    fn find_cart(&self, id: CartId) -> StoreResult<Option<Cart>> {
        Ok(self.read()?.carts.get(&id).cloned())
    }

    fn save_cart(&self, cart: &Cart) -> StoreResult<()> {
        self.write()?.carts.insert(cart.id_typed(), cart.clone());
        Ok(())
    }

    fn delete_cart(&self, id: CartId) -> StoreResult<Option<usize>> {
        let mut tables = self.write()?;

        if tables.carts.remove(&id).is_none() {
            return Ok(None);
        }

        let before = tables.line_items.len();
        tables.line_items.retain(|i| i.cart_id() != id);
        let removed = before - tables.line_items.len();

        trace!(cart_id = %id, line_items = removed, "cart row deleted");
        Ok(Some(removed))
    }

    fn find_line_item_by_product(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> StoreResult<Option<LineItem>> {
        Ok(self
            .read()?
            .line_items
            .iter()
            .find(|i| i.cart_id() == cart_id && i.product_id() == product_id)
            .cloned())
    }

    fn line_items(&self, cart_id: CartId) -> StoreResult<Vec<LineItem>> {
        Ok(self
            .read()?
            .line_items
            .iter()
            .filter(|i| i.cart_id() == cart_id)
            .cloned()
            .collect())
    }

    fn save_line_item(&self, item: LineItem) -> StoreResult<LineItem> {
        let mut tables = self.write()?;

        if !tables.carts.contains_key(&item.cart_id()) {
            return Err(StoreError::foreign_key("cart_id", item.cart_id()));
        }
        if !tables.products.contains_key(&item.product_id()) {
            return Err(StoreError::foreign_key("product_id", item.product_id()));
        }

        let saved = match item.id() {
            Some(id) => {
                match tables.line_items.iter_mut().find(|i| i.id() == Some(id)) {
                    Some(slot) => *slot = item.clone(),
                    None => tables.line_items.push(item.clone()),
                }
                item
            }
            None => {
                let saved = item.with_id(LineItemId::new(RecordId::new()));
                tables.line_items.push(saved.clone());
                saved
            }
        };

        trace!(
            cart_id = %saved.cart_id(),
            product_id = %saved.product_id(),
            quantity = saved.quantity(),
            "line item row written"
        );
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use storefront_products::ProductParams;

    fn product(title: &str) -> Product {
        let params = ProductParams::new(title, "desc", "x.png", "1.00");
        Product::build(ProductId::new(RecordId::new()), &params, Utc::now()).unwrap()
    }

    fn cart() -> Cart {
        Cart::new(CartId::new(RecordId::new()), Utc::now())
    }

    #[test]
    fn unique_title_index_rejects_second_row() {
        let store = InMemoryStore::new();
        store.save_product(&product("Dup")).unwrap();

        let err = store.save_product(&product("Dup")).unwrap_err();

        assert_eq!(err, StoreError::UniqueViolation { field: "title" });
    }

    #[test]
    fn resaving_a_product_keeps_its_title() {
        let store = InMemoryStore::new();
        let p = product("Same");
        store.save_product(&p).unwrap();

        assert!(store.save_product(&p).is_ok());
        assert_eq!(store.list_products().unwrap().len(), 1);
    }

    #[test]
    fn line_items_require_existing_cart_and_product() {
        let store = InMemoryStore::new();
        let c = cart();
        let p = product("Book");

        let err = store
            .save_line_item(LineItem::build(c.id_typed(), p.id_typed()))
            .unwrap_err();
        assert!(matches!(err, StoreError::ForeignKey { field: "cart_id", .. }));

        store.save_cart(&c).unwrap();
        let err = store
            .save_line_item(LineItem::build(c.id_typed(), p.id_typed()))
            .unwrap_err();
        assert!(matches!(err, StoreError::ForeignKey { field: "product_id", .. }));

        store.save_product(&p).unwrap();
        let saved = store
            .save_line_item(LineItem::build(c.id_typed(), p.id_typed()))
            .unwrap();
        assert!(!saved.is_new_record());
    }

    #[test]
    fn update_replaces_row_in_place() {
        let store = InMemoryStore::new();
        let c = cart();
        let p = product("Book");
        store.save_cart(&c).unwrap();
        store.save_product(&p).unwrap();

        let mut saved = store
            .save_line_item(LineItem::build(c.id_typed(), p.id_typed()))
            .unwrap();
        saved.increment();
        store.save_line_item(saved.clone()).unwrap();

        let items = store.line_items(c.id_typed()).unwrap();
        assert_eq!(items, vec![saved]);
    }

    #[test]
    fn referenced_products_cannot_be_deleted() {
        let store = InMemoryStore::new();
        let c = cart();
        let p = product("Book");
        store.save_cart(&c).unwrap();
        store.save_product(&p).unwrap();
        store
            .save_line_item(LineItem::build(c.id_typed(), p.id_typed()))
            .unwrap();

        assert_eq!(store.count_line_items(p.id_typed()).unwrap(), 1);
        assert!(matches!(
            store.delete_product(p.id_typed()),
            Err(StoreError::ForeignKey { field: "product_id", .. })
        ));
    }

    #[test]
    fn delete_unknown_cart_reports_none() {
        let store = InMemoryStore::new();
        assert_eq!(store.delete_cart(cart().id_typed()).unwrap(), None);
    }
}
