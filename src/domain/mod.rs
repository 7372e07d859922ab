//! Domain layer: entities, list query construction and repository interfaces

pub mod product;
pub mod query;
pub mod repositories;
pub mod user;

pub use product::{
    CreateProductDto, Product, ProductColumn, ProductListSchema, ProductRepositoryInterface,
    UpdateProductDto,
};
pub use query::{
    ListPlan, ListQuery, ListSchema, OrderClause, PageWindow, SearchFilter, SortDirection, LIKE_ESCAPE,
};
pub use repositories::RepositoryProvider;
pub use user::{CreateUserDto, UpdateUserDto, User, UserColumn, UserListSchema, UserRepositoryInterface};

// Re-export DomainError from shared for convenience
pub use crate::shared::{DomainError, DomainResult};
