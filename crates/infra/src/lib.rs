//! Infrastructure layer: storage adapters behind the domain repository ports.

pub mod store;

pub use store::InMemoryStore;
