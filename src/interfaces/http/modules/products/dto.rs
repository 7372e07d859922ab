//! Product DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{CreateProductDto, Product, UpdateProductDto};
use crate::interfaces::http::modules::users::UserDto;

/// Product API representation. `price` is a decimal string such as `"19.99"`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductDto {
    pub id: i64,
    pub name: String,
    #[schema(value_type = String, example = "19.99")]
    pub price: Decimal,
    pub owner_id: i64,
    /// Owning user; absent in lists when the owner no longer exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            price: p.price,
            owner_id: p.owner_id,
            owner: p.owner.map(UserDto::from),
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[schema(value_type = String, example = "19.99")]
    pub price: Decimal,
    #[validate(range(min = 1))]
    pub owner_id: i64,
}

impl From<CreateProductRequest> for CreateProductDto {
    fn from(r: CreateProductRequest) -> Self {
        Self {
            name: r.name,
            price: r.price,
            owner_id: r.owner_id,
        }
    }
}

/// Partial update; omitted fields keep their stored value. Ownership is fixed.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[schema(value_type = Option<String>, example = "24.99")]
    pub price: Option<Decimal>,
}

impl From<UpdateProductRequest> for UpdateProductDto {
    fn from(r: UpdateProductRequest) -> Self {
        Self {
            name: r.name,
            price: r.price,
        }
    }
}
