use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, Set,
};
use tracing::debug;

use super::list_query::{filtered, ordered_window};
use crate::domain::{
    CreateUserDto, DomainError, DomainResult, ListPlan, ListQuery, User, UserColumn,
    UserListSchema, UserRepositoryInterface,
};
use crate::infrastructure::database::entities::user;
use crate::infrastructure::database::{bounded, db_err, timed};

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn user_model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        name: model.name,
        email: model.email,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn column(c: UserColumn) -> user::Column {
    match c {
        UserColumn::Id => user::Column::Id,
        UserColumn::Name => user::Column::Name,
        UserColumn::Email => user::Column::Email,
        UserColumn::CreatedAt => user::Column::CreatedAt,
        UserColumn::UpdatedAt => user::Column::UpdatedAt,
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepositoryInterface for SeaOrmUserRepository {
    async fn get_by_id(&self, id: i64) -> DomainResult<Option<User>> {
        let model = bounded("get user by id", user::Entity::find_by_id(id).one(&self.db)).await?;
        Ok(model.map(user_model_to_domain))
    }

    async fn create(&self, dto: CreateUserDto) -> DomainResult<User> {
        let now = Utc::now();
        let new_user = user::ActiveModel {
            id: NotSet,
            name: Set(dto.name),
            email: Set(dto.email),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = bounded("create user", new_user.insert(&self.db)).await?;
        debug!(user_id = model.id, "User row inserted");
        Ok(user_model_to_domain(model))
    }

    async fn update(&self, user: User) -> DomainResult<User> {
        let active = user::ActiveModel {
            id: Set(user.id),
            name: Set(user.name),
            email: Set(user.email),
            created_at: NotSet,
            updated_at: Set(Utc::now()),
        };

        match timed("update user", active.update(&self.db)).await? {
            Ok(model) => Ok(user_model_to_domain(model)),
            Err(DbErr::RecordNotUpdated) => Err(DomainError::not_found("User", user.id)),
            Err(e) => Err(db_err("update user", e)),
        }
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        let result = bounded("delete user", user::Entity::delete_by_id(id).exec(&self.db)).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("User", id));
        }

        Ok(())
    }

    async fn list(&self, query: &ListQuery) -> DomainResult<(Vec<User>, i64)> {
        let plan = ListPlan::build::<UserListSchema>(query);
        let select = filtered(user::Entity::find(), &plan, column);

        let total = bounded("count users", select.clone().count(&self.db)).await? as i64;
        if total == 0 {
            return Ok((Vec::new(), 0));
        }

        let (_, window) = plan.window(total);
        let models = bounded(
            "list users",
            ordered_window(select, &plan, window, column).all(&self.db),
        )
        .await?;

        Ok((models.into_iter().map(user_model_to_domain).collect(), total))
    }

    async fn list_by_ids(&self, ids: &[i64]) -> DomainResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = bounded(
            "list users by ids",
            user::Entity::find()
                .filter(user::Column::Id.is_in(ids.iter().copied()))
                .all(&self.db),
        )
        .await?;

        Ok(models.into_iter().map(user_model_to_domain).collect())
    }
}

#[cfg(test)]
mod tests {
    use sea_orm_migration::MigratorTrait;

    use super::*;
    use crate::infrastructure::database::migrator::Migrator;
    use crate::infrastructure::database::{init_database, DatabaseConfig};

    async fn repo() -> SeaOrmUserRepository {
        let db = init_database(&DatabaseConfig::sqlite_in_memory()).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        SeaOrmUserRepository::new(db)
    }

    async fn seed(repo: &SeaOrmUserRepository, name: &str, email: &str) -> User {
        repo.create(CreateUserDto {
            name: name.into(),
            email: email.into(),
        })
        .await
        .unwrap()
    }

    fn query(page: i64, size: i64) -> ListQuery {
        ListQuery {
            page,
            size,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_assigns_identity_and_timestamps() {
        let repo = repo().await;
        let alice = seed(&repo, "Alice", "alice@example.com").await;
        let bob = seed(&repo, "Bob", "bob@example.com").await;

        assert!(alice.id > 0);
        assert_ne!(alice.id, bob.id);
        assert_eq!(alice.created_at, alice.updated_at);

        let fetched = repo.get_by_id(alice.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Alice");
        assert_eq!(fetched.email, "alice@example.com");
    }

    #[tokio::test]
    async fn get_missing_user_is_none() {
        let repo = repo().await;
        assert!(repo.get_by_id(404).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_rewrites_fields_or_reports_not_found() {
        let repo = repo().await;
        let mut alice = seed(&repo, "Alice", "alice@example.com").await;

        alice.name = "Alicia".into();
        alice.email = "alicia@example.com".into();
        let updated = repo.update(alice.clone()).await.unwrap();
        assert_eq!(updated.name, "Alicia");
        assert_eq!(updated.created_at, alice.created_at);
        assert!(updated.updated_at >= alice.updated_at);

        let ghost = User { id: 999, ..alice };
        let err = repo.update(ghost).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn delete_missing_user_is_not_found_without_side_effects() {
        let repo = repo().await;
        seed(&repo, "Alice", "alice@example.com").await;

        let err = repo.delete(42).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "User", id: 42 }));

        let (_, total) = repo.list(&query(1, 10)).await.unwrap();
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn delete_removes_row() {
        let repo = repo().await;
        let alice = seed(&repo, "Alice", "alice@example.com").await;
        repo.delete(alice.id).await.unwrap();
        assert!(repo.get_by_id(alice.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_on_empty_table_returns_nothing() {
        let repo = repo().await;
        let (users, total) = repo.list(&query(1, 10)).await.unwrap();
        assert!(users.is_empty());
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn empty_count_skips_the_page_query() {
        use std::collections::BTreeMap;

        use sea_orm::{DbBackend, MockDatabase, Value};

        let db = MockDatabase::new(DbBackend::Sqlite)
            .append_query_results([[BTreeMap::from([("num_items", Value::from(0i32))])]])
            .into_connection();
        let repo = SeaOrmUserRepository::new(db.clone());

        let (users, total) = repo.list(&query(3, 10)).await.unwrap();
        assert!(users.is_empty());
        assert_eq!(total, 0);

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 1);
        let sql = &log[0].statements()[0].sql;
        assert!(sql.starts_with("SELECT COUNT(*)"), "{}", sql);
    }

    #[tokio::test]
    async fn duplicate_emails_are_stored() {
        let repo = repo().await;
        let first = seed(&repo, "Alice", "shared@example.com").await;
        let second = seed(&repo, "Alicia", "shared@example.com").await;
        assert_ne!(first.id, second.id);

        let (_, total) = repo
            .list(&ListQuery {
                search: Some("shared@".into()),
                ..query(1, 10)
            })
            .await
            .unwrap();
        assert_eq!(total, 2);
    }

    #[tokio::test]
    async fn like_wildcards_in_search_match_literally() {
        let repo = repo().await;
        seed(&repo, "snake_case", "snake@example.com").await;
        seed(&repo, "Bob", "bob@example.com").await;
        seed(&repo, "Carol", "carol@example.com").await;

        for (term, expected) in [("_", 1), ("%", 0), ("e_c", 1)] {
            let (users, total) = repo
                .list(&ListQuery {
                    search: Some(term.into()),
                    ..query(1, 10)
                })
                .await
                .unwrap();
            assert_eq!(total, expected, "term {:?}", term);
            assert!(users.iter().all(|u| u.name == "snake_case"));
        }
    }

    #[tokio::test]
    async fn list_searches_name_and_email() {
        let repo = repo().await;
        seed(&repo, "Alice", "alice@example.com").await;
        seed(&repo, "Bob", "bob@corp.io").await;
        seed(&repo, "Carol", "carol@example.com").await;

        let (users, total) = repo
            .list(&ListQuery {
                search: Some("example".into()),
                ..query(1, 10)
            })
            .await
            .unwrap();
        assert_eq!(total, 2);
        assert_eq!(users.len(), 2);

        let (users, _) = repo
            .list(&ListQuery {
                search: Some("bob".into()),
                ..query(1, 10)
            })
            .await
            .unwrap();
        assert_eq!(users[0].name, "Bob");
    }

    #[tokio::test]
    async fn list_pages_with_clamped_page_and_full_total() {
        let repo = repo().await;
        for i in 0..25 {
            seed(&repo, &format!("user{:02}", i), &format!("u{}@example.com", i)).await;
        }

        let (users, total) = repo.list(&query(4, 10)).await.unwrap();
        assert_eq!(total, 25);
        assert_eq!(users.len(), 5);
        assert_eq!(users[0].name, "user20");

        let (users, _) = repo
            .list(&ListQuery {
                take_all: true,
                ..query(2, 10)
            })
            .await
            .unwrap();
        assert_eq!(users.len(), 25);
    }

    #[tokio::test]
    async fn list_orders_by_allowed_column_only() {
        let repo = repo().await;
        seed(&repo, "Bob", "b@example.com").await;
        seed(&repo, "Alice", "a@example.com").await;
        seed(&repo, "Carol", "c@example.com").await;

        let (users, _) = repo
            .list(&ListQuery {
                order_by: Some("name".into()),
                order_desc: true,
                ..query(1, 10)
            })
            .await
            .unwrap();
        let names: Vec<_> = users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["Carol", "Bob", "Alice"]);

        let (users, _) = repo
            .list(&ListQuery {
                order_by: Some("name; DROP TABLE users".into()),
                ..query(1, 10)
            })
            .await
            .unwrap();
        let names: Vec<_> = users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["Bob", "Alice", "Carol"]);
    }

    #[tokio::test]
    async fn list_by_ids_handles_empty_and_missing_ids() {
        let repo = repo().await;
        let alice = seed(&repo, "Alice", "alice@example.com").await;
        let bob = seed(&repo, "Bob", "bob@example.com").await;

        assert!(repo.list_by_ids(&[]).await.unwrap().is_empty());

        let mut found = repo.list_by_ids(&[bob.id, alice.id, 777]).await.unwrap();
        found.sort_by_key(|u| u.id);
        assert_eq!(found, vec![alice, bob]);
    }
}
