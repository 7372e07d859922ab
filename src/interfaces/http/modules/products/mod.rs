//! Products module: product CRUD and listing with owner resolution

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
