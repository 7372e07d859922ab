//! Repository provider for the domain layer

use async_trait::async_trait;

use super::product::ProductRepositoryInterface;
use super::user::UserRepositoryInterface;
use crate::shared::DomainResult;

/// Provides access to all domain repositories.
///
/// One implementation per storage backend; services hold an
/// `Arc<dyn RepositoryProvider>` and request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let user = repos.users().get_by_id(1).await?;
///     let (products, total) = repos.products().list(&query).await?;
/// }
/// ```
#[async_trait]
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepositoryInterface;
    fn products(&self) -> &dyn ProductRepositoryInterface;

    /// Cheap round trip used by the health endpoint.
    async fn ping(&self) -> DomainResult<()>;
}
