//! Storage adapters implementing the product and cart repository ports.

pub mod in_memory;

pub use in_memory::InMemoryStore;
