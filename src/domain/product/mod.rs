//! Product aggregate
//!
//! A product belongs to exactly one user (its owner).

pub mod model;
pub mod repository;

mod dto;

pub use dto::{CreateProductDto, UpdateProductDto};
pub use model::{Product, ProductColumn, ProductListSchema};
pub use repository::ProductRepositoryInterface;
