use async_trait::async_trait;

use super::{CreateUserDto, User};
use crate::domain::query::ListQuery;
use crate::shared::DomainResult;

#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    async fn get_by_id(&self, id: i64) -> DomainResult<Option<User>>;
    async fn create(&self, dto: CreateUserDto) -> DomainResult<User>;
    /// Rewrites every mutable field of the stored row with the same id.
    async fn update(&self, user: User) -> DomainResult<User>;
    async fn delete(&self, id: i64) -> DomainResult<()>;

    /// Returns the requested page and the total number of matching rows.
    async fn list(&self, query: &ListQuery) -> DomainResult<(Vec<User>, i64)>;
    async fn list_by_ids(&self, ids: &[i64]) -> DomainResult<Vec<User>>;
}
