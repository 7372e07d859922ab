//! In-process storage backend

mod memory;

pub use memory::{InMemoryProductRepository, InMemoryRepositoryProvider, InMemoryUserRepository};
