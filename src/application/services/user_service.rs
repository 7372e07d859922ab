//! User business logic service

use std::sync::Arc;

use tracing::info;

use crate::domain::{
    CreateUserDto, DomainError, DomainResult, ListQuery, RepositoryProvider, UpdateUserDto, User,
};
use crate::shared::Pagination;

use super::normalize_query;

pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
}

impl UserService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn list_users(&self, query: ListQuery) -> DomainResult<(Vec<User>, Pagination)> {
        let query = normalize_query(query);
        let (users, total) = self.repos.users().list(&query).await?;
        let pagination =
            Pagination::compute(query.page, query.size, total).with_take_all(query.take_all);
        Ok((users, pagination))
    }

    pub async fn get_user(&self, id: i64) -> DomainResult<User> {
        self.repos
            .users()
            .get_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    pub async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        validate_name(&dto.name)?;
        validate_email(&dto.email)?;

        let user = self.repos.users().create(dto).await?;
        info!(user_id = user.id, "User created");
        Ok(user)
    }

    pub async fn update_user(&self, id: i64, dto: UpdateUserDto) -> DomainResult<User> {
        let mut user = self.get_user(id).await?;

        if let Some(name) = dto.name {
            validate_name(&name)?;
            user.name = name;
        }
        if let Some(email) = dto.email {
            validate_email(&email)?;
            user.email = email;
        }

        let user = self.repos.users().update(user).await?;
        info!(user_id = user.id, "User updated");
        Ok(user)
    }

    pub async fn delete_user(&self, id: i64) -> DomainResult<()> {
        self.repos.users().delete(id).await?;
        info!(user_id = id, "User deleted");
        Ok(())
    }
}

fn validate_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::Validation("User name must not be empty".into()));
    }
    Ok(())
}

fn validate_email(email: &str) -> DomainResult<()> {
    if !email.contains('@') {
        return Err(DomainError::Validation(format!(
            "Invalid email address: {}",
            email
        )));
    }
    Ok(())
}
