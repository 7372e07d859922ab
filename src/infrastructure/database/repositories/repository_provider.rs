//! SeaORM implementation of RepositoryProvider

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};

use crate::domain::product::ProductRepositoryInterface;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::user::UserRepositoryInterface;
use crate::infrastructure::database::bounded;
use crate::shared::DomainResult;

use super::product_repository::SeaOrmProductRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let user = repos.users().get_by_id(1).await?;
/// let owners = repos.users().list_by_ids(&[1, 2]).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    users: SeaOrmUserRepository,
    products: SeaOrmProductRepository,
    db: DatabaseConnection,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            products: SeaOrmProductRepository::new(db.clone()),
            db,
        }
    }
}

#[async_trait]
impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepositoryInterface {
        &self.users
    }

    fn products(&self) -> &dyn ProductRepositoryInterface {
        &self.products
    }

    async fn ping(&self) -> DomainResult<()> {
        let backend = self.db.get_database_backend();
        bounded(
            "ping",
            self.db
                .execute(Statement::from_string(backend, "SELECT 1")),
        )
        .await?;
        Ok(())
    }
}
