use chrono::{DateTime, Utc};

use crate::domain::query::ListSchema;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Columns a user list can be sorted or searched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserColumn {
    Id,
    Name,
    Email,
    CreatedAt,
    UpdatedAt,
}

pub struct UserListSchema;

impl ListSchema for UserListSchema {
    type Column = UserColumn;

    const DEFAULT_SORT: UserColumn = UserColumn::Id;
    const SEARCH_COLUMNS: &'static [UserColumn] = &[UserColumn::Name, UserColumn::Email];

    fn sort_column(key: &str) -> Option<UserColumn> {
        match key {
            "id" => Some(UserColumn::Id),
            "name" => Some(UserColumn::Name),
            "email" => Some(UserColumn::Email),
            "created_at" => Some(UserColumn::CreatedAt),
            "updated_at" => Some(UserColumn::UpdatedAt),
            _ => None,
        }
    }
}
