//! `storefront-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the error model and the validation framework shared by the
//! catalog and cart modules.

pub mod entity;
pub mod error;
pub mod id;
pub mod validation;

pub use entity::Entity;
pub use error::{DomainError, DomainResult, StoreError, StoreResult};
pub use id::RecordId;
pub use validation::{FieldError, ValidationErrors, ValidationOutcome, Validator, ValidatorChain};
