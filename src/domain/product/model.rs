use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::query::ListSchema;
use crate::domain::user::User;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Owning user, attached by the service after the fetch.
    pub owner: Option<User>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductColumn {
    Id,
    Name,
    Price,
    CreatedAt,
    UpdatedAt,
}

pub struct ProductListSchema;

impl ListSchema for ProductListSchema {
    type Column = ProductColumn;

    const DEFAULT_SORT: ProductColumn = ProductColumn::Id;
    const SEARCH_COLUMNS: &'static [ProductColumn] = &[ProductColumn::Name];

    fn sort_column(key: &str) -> Option<ProductColumn> {
        match key {
            "id" => Some(ProductColumn::Id),
            "name" => Some(ProductColumn::Name),
            "price" => Some(ProductColumn::Price),
            "created_at" => Some(ProductColumn::CreatedAt),
            "updated_at" => Some(ProductColumn::UpdatedAt),
            _ => None,
        }
    }
}
