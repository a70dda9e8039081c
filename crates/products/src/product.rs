use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storefront_core::validation::{
    messages, parse_decimal, FieldError, Format, NumericalityAtLeast, Presence,
};
use storefront_core::{
    DomainError, DomainResult, Entity, RecordId, ValidationErrors, ValidationOutcome, Validator,
    ValidatorChain,
};

use crate::repository::ProductRepository;

/// Message attached to `image_url` when the suffix is not an accepted image type.
pub const IMAGE_URL_MESSAGE: &str = "must be a URL for GIF, JPG or PNG image.";

/// Base error reported when a referenced product is destroyed.
pub const LINE_ITEMS_PRESENT: &str = "Line Items present";

// `\n?\z` also accepts a single trailing newline.
static IMAGE_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(gif|jpg|png)\n?\z").expect("image url pattern is a valid regex")
});

/// Smallest accepted price (0.01).
pub fn min_price() -> Decimal {
    Decimal::new(1, 2)
}

/// Product identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub RecordId);

impl ProductId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Caller-supplied product attributes, as entered.
///
/// `price` stays textual so that non-numeric input reaches validation instead
/// of failing at deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductParams {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub price: String,
}

impl ProductParams {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        image_url: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            image_url: image_url.into(),
            price: price.into(),
        }
    }
}

/// Catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    title: String,
    description: String,
    image_url: String,
    price: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Product {
    /// Build a product from attributes without running the validator chain.
    ///
    /// Only the price is checked, since it has to become a number.
    pub fn build(id: ProductId, params: &ProductParams, now: DateTime<Utc>) -> DomainResult<Self> {
        Ok(Self {
            id,
            title: params.title.clone(),
            description: params.description.clone(),
            image_url: params.image_url.clone(),
            price: parse_price(&params.price)?,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Current attributes in input form (useful for partial edits).
    pub fn to_params(&self) -> ProductParams {
        ProductParams {
            title: self.title.clone(),
            description: self.description.clone(),
            image_url: self.image_url.clone(),
            price: self.price.to_string(),
        }
    }

    /// Replace every attribute; `created_at` is kept.
    pub fn assign(&mut self, params: &ProductParams, now: DateTime<Utc>) -> DomainResult<()> {
        self.price = parse_price(&params.price)?;
        self.title = params.title.clone();
        self.description = params.description.clone();
        self.image_url = params.image_url.clone();
        self.updated_at = now;
        Ok(())
    }

    /// Deletion guard: a product still referenced by line items must stay.
    pub fn ensure_not_referenced(&self, line_item_count: usize) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if line_item_count > 0 {
            errors.add_to_base(LINE_ITEMS_PRESENT);
        }
        errors.into_result()
    }
}

impl Entity for Product {
    type Id = ProductId;

    const NAME: &'static str = "product";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn parse_price(raw: &str) -> DomainResult<Decimal> {
    parse_decimal(raw).ok_or_else(|| {
        DomainError::Validation(
            [FieldError::new("price", messages::NOT_A_NUMBER)]
                .into_iter()
                .collect(),
        )
    })
}

fn title(p: &ProductParams) -> &str {
    &p.title
}

fn description(p: &ProductParams) -> &str {
    &p.description
}

fn image_url(p: &ProductParams) -> &str {
    &p.image_url
}

fn price(p: &ProductParams) -> &str {
    &p.price
}

/// Title must not belong to another product.
struct UniqueTitle<'a, R: ?Sized> {
    repository: &'a R,
    exclude: Option<ProductId>,
}

impl<R> Validator<ProductParams> for UniqueTitle<'_, R>
where
    R: ProductRepository + ?Sized,
{
    fn validate(&self, params: &ProductParams) -> ValidationOutcome {
        match self.repository.find_product_by_title(&params.title)? {
            Some(existing) if Some(existing.id_typed()) != self.exclude => {
                Ok(vec![FieldError::new("title", messages::TAKEN)])
            }
            _ => Ok(vec![]),
        }
    }
}

/// Ordered product rules.
///
/// `exclude` is the id of the record being updated, so it does not collide
/// with its own title.
pub fn validators<'a, R>(repository: &'a R, exclude: Option<ProductId>) -> ValidatorChain<'a, ProductParams>
where
    R: ProductRepository + ?Sized,
{
    ValidatorChain::new()
        .with(Presence::new("title", title))
        .with(Presence::new("description", description))
        .with(Presence::new("image_url", image_url))
        .with(NumericalityAtLeast::new("price", price, min_price()))
        .with(UniqueTitle {
            repository,
            exclude,
        })
        .with(
            Format::new("image_url", image_url, IMAGE_URL_PATTERN.clone())
                .message(IMAGE_URL_MESSAGE)
                .allow_blank(),
        )
}
