//! User aggregate
//!
//! Contains the User entity, DTOs, list schema and repository interface.

pub mod model;
pub mod repository;

mod dto;

pub use dto::{CreateUserDto, UpdateUserDto};
pub use model::{User, UserColumn, UserListSchema};
pub use repository::UserRepositoryInterface;
