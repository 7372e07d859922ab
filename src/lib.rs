//! # db-blueprints
//!
//! Users and Products CRUD service with a pluggable storage backend.
//!
//! ## Architecture
//!
//! - **domain**: entities, the list query builder and repository interfaces
//! - **application**: services orchestrating repositories (owner resolution, validation)
//! - **infrastructure**: SeaORM and in-memory repository backends
//! - **interfaces**: REST API with Swagger documentation
//! - **shared**: error taxonomy, pagination, graceful shutdown
//!
//! Control flow: HTTP → service → repository → query builder → storage.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use application::{ProductService, UserService};
pub use infrastructure::{
    init_database, DatabaseConfig, InMemoryRepositoryProvider, SeaOrmRepositoryProvider,
};
pub use interfaces::create_api_router;
pub use shared::{DomainError, DomainResult, Pagination};
