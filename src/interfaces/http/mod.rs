//! HTTP REST API
//!
//! - `common`: response envelope, error mapping, validated JSON
//! - `modules`: per-resource DTOs and handlers plus middleware
//! - `router`: route table and Swagger documentation

pub mod common;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiDoc, AppState};
