use async_trait::async_trait;

use super::{CreateProductDto, Product};
use crate::domain::query::ListQuery;
use crate::shared::DomainResult;

/// Products come back without `owner`; owner resolution is the service's job.
#[async_trait]
pub trait ProductRepositoryInterface: Send + Sync {
    async fn get_by_id(&self, id: i64) -> DomainResult<Option<Product>>;
    async fn create(&self, dto: CreateProductDto) -> DomainResult<Product>;
    async fn update(&self, product: Product) -> DomainResult<Product>;
    async fn delete(&self, id: i64) -> DomainResult<()>;
    async fn list(&self, query: &ListQuery) -> DomainResult<(Vec<Product>, i64)>;
}
