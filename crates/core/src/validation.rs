//! Validation framework: ordered validator lists that collect field errors.
//!
//! Every entity declares its rules as a [`ValidatorChain`]. Running the chain
//! executes each validator in declaration order and collects *all* failures
//! before reporting, so callers can show every problem at once.

use core::fmt;
use core::str::FromStr;

use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{DomainError, DomainResult, StoreError, StoreResult};

/// Pseudo-field for errors that concern the record as a whole.
pub const BASE: &str = "base";

/// Standard messages shared by the built-in rules.
pub mod messages {
    pub const BLANK: &str = "can't be blank";
    pub const TAKEN: &str = "has already been taken";
    pub const NOT_A_NUMBER: &str = "is not a number";
    pub const INVALID: &str = "is invalid";
}

/// A single failed rule: which field, and what is wrong with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    pub fn base(message: impl Into<String>) -> Self {
        Self::new(BASE, message)
    }

    pub fn is_base(&self) -> bool {
        self.field == BASE
    }

    /// Message prefixed with the humanized field name (`Image url can't be blank`).
    ///
    /// Base errors render the bare message.
    pub fn full_message(&self) -> String {
        if self.is_base() {
            self.message.clone()
        } else {
            format!("{} {}", humanize(self.field), self.message)
        }
    }
}

fn humanize(field: &str) -> String {
    let field = field.strip_suffix("_id").unwrap_or(field);
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Ordered collection of field errors attached to a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn add_to_base(&mut self, message: impl Into<String>) {
        self.errors.push(FieldError::base(message));
    }

    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, FieldError> {
        self.errors.iter()
    }

    /// Messages recorded against `field`, in the order they were added.
    pub fn on(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    pub fn base(&self) -> Vec<&str> {
        self.on(BASE)
    }

    pub fn full_messages(&self) -> Vec<String> {
        self.errors.iter().map(FieldError::full_message).collect()
    }

    /// `Ok(())` when empty, otherwise the collected errors.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_messages().join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

impl Extend<FieldError> for ValidationErrors {
    fn extend<I: IntoIterator<Item = FieldError>>(&mut self, iter: I) {
        self.errors.extend(iter);
    }
}

impl FromIterator<FieldError> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = FieldError>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = core::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// What a single validator produces.
///
/// Only rules that consult a store (uniqueness) can fail with `Err`.
pub type ValidationOutcome = Result<Vec<FieldError>, StoreError>;

/// One validation rule over records of type `T`.
pub trait Validator<T: ?Sized> {
    fn validate(&self, record: &T) -> ValidationOutcome;
}

impl<T: ?Sized, F> Validator<T> for F
where
    F: Fn(&T) -> ValidationOutcome,
{
    fn validate(&self, record: &T) -> ValidationOutcome {
        self(record)
    }
}

/// Ordered list of validators for one entity.
pub struct ValidatorChain<'a, T: ?Sized> {
    validators: Vec<Box<dyn Validator<T> + 'a>>,
}

impl<'a, T: ?Sized> ValidatorChain<'a, T> {
    pub fn new() -> Self {
        Self {
            validators: Vec::new(),
        }
    }

    /// Append a validator; it runs after every validator added before it.
    pub fn with(mut self, validator: impl Validator<T> + 'a) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Run every validator and collect the errors.
    pub fn collect(&self, record: &T) -> StoreResult<ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for validator in &self.validators {
            errors.extend(validator.validate(record)?);
        }
        Ok(errors)
    }

    /// Run every validator; `Err(DomainError::Validation)` if any rule failed.
    pub fn run(&self, record: &T) -> DomainResult<()> {
        let errors = self.collect(record)?;
        errors.into_result().map_err(DomainError::Validation)
    }
}

impl<T: ?Sized> Default for ValidatorChain<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Field must be non-empty after trimming whitespace.
pub struct Presence<T: ?Sized> {
    field: &'static str,
    accessor: fn(&T) -> &str,
}

impl<T: ?Sized> Presence<T> {
    pub fn new(field: &'static str, accessor: fn(&T) -> &str) -> Self {
        Self { field, accessor }
    }
}

impl<T: ?Sized> Validator<T> for Presence<T> {
    fn validate(&self, record: &T) -> ValidationOutcome {
        if is_blank((self.accessor)(record)) {
            Ok(vec![FieldError::new(self.field, messages::BLANK)])
        } else {
            Ok(vec![])
        }
    }
}

/// Field must match a regular expression.
pub struct Format<T: ?Sized> {
    field: &'static str,
    accessor: fn(&T) -> &str,
    pattern: Regex,
    message: String,
    allow_blank: bool,
}

impl<T: ?Sized> Format<T> {
    pub fn new(field: &'static str, accessor: fn(&T) -> &str, pattern: Regex) -> Self {
        Self {
            field,
            accessor,
            pattern,
            message: messages::INVALID.to_string(),
            allow_blank: false,
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Skip the rule for blank values (presence is checked elsewhere).
    pub fn allow_blank(mut self) -> Self {
        self.allow_blank = true;
        self
    }
}

impl<T: ?Sized> Validator<T> for Format<T> {
    fn validate(&self, record: &T) -> ValidationOutcome {
        let value = (self.accessor)(record);
        if self.allow_blank && is_blank(value) {
            return Ok(vec![]);
        }
        if self.pattern.is_match(value) {
            Ok(vec![])
        } else {
            Ok(vec![FieldError::new(self.field, self.message.clone())])
        }
    }
}

/// Field must parse as a decimal number no smaller than `min`.
pub struct NumericalityAtLeast<T: ?Sized> {
    field: &'static str,
    accessor: fn(&T) -> &str,
    min: Decimal,
}

impl<T: ?Sized> NumericalityAtLeast<T> {
    pub fn new(field: &'static str, accessor: fn(&T) -> &str, min: Decimal) -> Self {
        Self {
            field,
            accessor,
            min,
        }
    }
}

impl<T: ?Sized> Validator<T> for NumericalityAtLeast<T> {
    fn validate(&self, record: &T) -> ValidationOutcome {
        match parse_decimal((self.accessor)(record)) {
            None => Ok(vec![FieldError::new(self.field, messages::NOT_A_NUMBER)]),
            Some(value) if value < self.min => Ok(vec![FieldError::new(
                self.field,
                format!("must be greater than or equal to {}", self.min),
            )]),
            Some(_) => Ok(vec![]),
        }
    }
}

/// Empty or whitespace only.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Parse user-entered numeric text (`"12.50"`, `" 3 "`, `"1e2"`).
///
/// Values outside the `Decimal` range (about 7.9e28) do not parse.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upload {
        name: String,
        size: String,
    }

    fn name(u: &Upload) -> &str {
        &u.name
    }

    fn size(u: &Upload) -> &str {
        &u.size
    }

    fn upload(name: &str, size: &str) -> Upload {
        Upload {
            name: name.to_string(),
            size: size.to_string(),
        }
    }

    #[test]
    fn presence_rejects_empty_and_whitespace() {
        let rule = Presence::new("name", name);
        assert_eq!(
            rule.validate(&upload("", "1")).unwrap(),
            vec![FieldError::new("name", "can't be blank")]
        );
        assert_eq!(rule.validate(&upload(" \t\n", "1")).unwrap().len(), 1);
        assert!(rule.validate(&upload("x", "1")).unwrap().is_empty());
    }

    #[test]
    fn format_respects_allow_blank() {
        let pattern = Regex::new(r"^[a-z]+$").unwrap();
        let strict = Format::new("name", name, pattern.clone());
        let lenient = Format::new("name", name, pattern).allow_blank();

        assert_eq!(
            strict.validate(&upload("", "1")).unwrap(),
            vec![FieldError::new("name", "is invalid")]
        );
        assert!(lenient.validate(&upload("", "1")).unwrap().is_empty());
        assert_eq!(lenient.validate(&upload("ABC", "1")).unwrap().len(), 1);
    }

    #[test]
    fn format_uses_custom_message() {
        let rule = Format::new("name", name, Regex::new("^x$").unwrap()).message("must be x");
        assert_eq!(rule.validate(&upload("y", "1")).unwrap()[0].message, "must be x");
    }

    #[test]
    fn numericality_distinguishes_non_numeric_from_too_small() {
        let rule = NumericalityAtLeast::new("size", size, Decimal::new(1, 2));

        assert_eq!(rule.validate(&upload("a", "abc")).unwrap()[0].message, "is not a number");
        assert_eq!(rule.validate(&upload("a", "")).unwrap()[0].message, "is not a number");
        assert_eq!(
            rule.validate(&upload("a", "0")).unwrap()[0].message,
            "must be greater than or equal to 0.01"
        );
        assert!(rule.validate(&upload("a", "0.01")).unwrap().is_empty());
        assert!(rule.validate(&upload("a", " 12.5 ")).unwrap().is_empty());
    }

    #[test]
    fn parse_decimal_accepts_scientific_notation() {
        assert_eq!(parse_decimal("1e2"), Some(Decimal::new(100, 0)));
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal("   "), None);
    }

    #[test]
    fn out_of_range_values_are_not_numbers() {
        let rule = NumericalityAtLeast::new("size", size, Decimal::new(1, 2));

        assert_eq!(parse_decimal("1e30"), None);
        assert_eq!(rule.validate(&upload("a", "1e30")).unwrap()[0].message, "is not a number");
        assert!(parse_decimal("1e20").is_some());
    }

    #[test]
    fn chain_runs_every_validator_in_order() {
        let chain = ValidatorChain::new()
            .with(Presence::new("name", name))
            .with(NumericalityAtLeast::new("size", size, Decimal::ONE));

        let err = chain.run(&upload("", "x")).unwrap_err();
        let errors = err.errors().unwrap();
        assert_eq!(
            errors.full_messages(),
            vec!["Name can't be blank".to_string(), "Size is not a number".to_string()]
        );
        assert!(chain.run(&upload("ok", "2")).is_ok());
    }

    #[test]
    fn chain_propagates_store_failures() {
        let chain = ValidatorChain::new()
            .with(|_: &Upload| -> ValidationOutcome { Err(StoreError::unavailable("down")) });

        let err = chain.run(&upload("a", "1")).unwrap_err();
        assert_eq!(err, DomainError::Store(StoreError::unavailable("down")));
    }

    #[test]
    fn base_errors_render_without_field_prefix() {
        let mut errors = ValidationErrors::new();
        errors.add_to_base("Line Items present");
        errors.add("image_url", "can't be blank");

        assert_eq!(errors.base(), vec!["Line Items present"]);
        assert_eq!(errors.to_string(), "Line Items present, Image url can't be blank");
    }

    #[test]
    fn humanize_drops_id_suffix() {
        assert_eq!(FieldError::new("product_id", "is invalid").full_message(), "Product is invalid");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: whitespace-only values are always blank.
            #[test]
            fn whitespace_is_blank(value in "[ \t\r\n]{0,16}") {
                prop_assert!(is_blank(&value));
            }

            /// Property: any integer amount of cents at or above one passes the 0.01 minimum.
            #[test]
            fn cents_at_or_above_minimum_pass(cents in 1i64..10_000_000) {
                let rule = NumericalityAtLeast::new("size", size, Decimal::new(1, 2));
                let raw = Decimal::new(cents, 2).to_string();
                prop_assert!(rule.validate(&upload("a", &raw)).unwrap().is_empty());
            }
        }
    }
}
