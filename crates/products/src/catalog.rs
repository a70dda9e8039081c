//! Catalog service: validated create/update and guarded destroy.
//!
//! The catalog composes the validator chain, the deletion guard and the
//! injected [`ProductRepository`]. Expected failures come back as
//! `DomainError::Validation` with the collected errors; nothing here panics
//! or retries.

use chrono::Utc;
use tracing::{debug, info, warn};

use storefront_core::validation::messages;
use storefront_core::{DomainError, DomainResult, RecordId, StoreError, ValidationErrors};

use crate::product::{self, LINE_ITEMS_PRESENT, Product, ProductId, ProductParams};
use crate::repository::ProductRepository;

#[derive(Debug, Clone)]
pub struct ProductCatalog<R> {
    repository: R,
}

impl<R> ProductCatalog<R>
where
    R: ProductRepository,
{
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Run the product rules without saving.
    pub fn validate(&self, params: &ProductParams, exclude: Option<ProductId>) -> DomainResult<()> {
        product::validators(&self.repository, exclude)
            .run(params)
            .inspect_err(|e| debug!(error = %e, title = %params.title, "product rejected"))
    }

    pub fn create(&self, params: &ProductParams) -> DomainResult<Product> {
        self.validate(params, None)?;

        let product = Product::build(ProductId::new(RecordId::new()), params, Utc::now())?;
        self.persist(&product)?;

        info!(product_id = %product.id_typed(), title = product.title(), "product created");
        Ok(product)
    }

    /// Replace all attributes of an existing product.
    pub fn update(&self, id: ProductId, params: &ProductParams) -> DomainResult<Product> {
        let mut product = self.find(id)?;
        self.validate(params, Some(id))?;

        product.assign(params, Utc::now())?;
        self.persist(&product)?;

        info!(product_id = %id, title = product.title(), "product updated");
        Ok(product)
    }

    /// Delete a product unless line items still reference it.
    ///
    /// A blocked destroy leaves the store untouched and reports the
    /// `Line Items present` base error.
    pub fn destroy(&self, id: ProductId) -> DomainResult<Product> {
        let product = self.find(id)?;

        let line_items = self.repository.count_line_items(id)?;
        if let Err(errors) = product.ensure_not_referenced(line_items) {
            warn!(product_id = %id, line_items, "product destroy blocked");
            return Err(DomainError::Validation(errors));
        }

        // A line item saved after the count trips the store's restrict check.
        match self.repository.delete_product(id) {
            Ok(true) => {}
            Ok(false) => return Err(DomainError::not_found::<Product>(id)),
            Err(StoreError::ForeignKey {
                field: "product_id", ..
            }) => {
                warn!(product_id = %id, "product destroy blocked by store");
                let mut errors = ValidationErrors::new();
                errors.add_to_base(LINE_ITEMS_PRESENT);
                return Err(DomainError::Validation(errors));
            }
            Err(e) => return Err(e.into()),
        }

        info!(product_id = %id, "product destroyed");
        Ok(product)
    }

    pub fn find(&self, id: ProductId) -> DomainResult<Product> {
        self.repository
            .find_product(id)?
            .ok_or_else(|| DomainError::not_found::<Product>(id))
    }

    /// All products, ordered by title.
    pub fn list(&self) -> DomainResult<Vec<Product>> {
        let mut products = self.repository.list_products()?;
        products.sort_by(|a, b| a.title().cmp(b.title()));
        Ok(products)
    }

    // The store's unique index is the final word on titles: a concurrent
    // insert that slipped past validation surfaces as a field error.
    fn persist(&self, product: &Product) -> DomainResult<()> {
        match self.repository.save_product(product) {
            Ok(()) => Ok(()),
            Err(StoreError::UniqueViolation { field }) => {
                let mut errors = ValidationErrors::new();
                errors.add(field, messages::TAKEN);
                Err(DomainError::Validation(errors))
            }
            Err(e) => Err(e.into()),
        }
    }
}
