//! Entity trait: identity + a model name for logs and errors.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    /// Lower-case model name (`"product"`, `"cart"`, ...).
    const NAME: &'static str;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
