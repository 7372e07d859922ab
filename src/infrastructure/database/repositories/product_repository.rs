use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, PaginatorTrait, Set};
use tracing::debug;

use super::list_query::{filtered, ordered_window};
use crate::domain::{
    CreateProductDto, DomainError, DomainResult, ListPlan, ListQuery, Product, ProductColumn,
    ProductListSchema, ProductRepositoryInterface,
};
use crate::infrastructure::database::entities::product;
use crate::infrastructure::database::{bounded, db_err, timed};

pub struct SeaOrmProductRepository {
    db: DatabaseConnection,
}

impl SeaOrmProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn product_model_to_domain(model: product::Model) -> Product {
    Product {
        id: model.id,
        name: model.name,
        price: Decimal::new(model.price_cents, 2),
        owner_id: model.owner_id,
        created_at: model.created_at,
        updated_at: model.updated_at,
        owner: None,
    }
}

/// Prices are stored as whole cents; anything finer is truncated.
fn price_to_cents(price: Decimal) -> DomainResult<i64> {
    price
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|cents| cents.trunc().to_i64())
        .ok_or_else(|| DomainError::Validation(format!("Price {} is out of range", price)))
}

fn column(c: ProductColumn) -> product::Column {
    match c {
        ProductColumn::Id => product::Column::Id,
        ProductColumn::Name => product::Column::Name,
        ProductColumn::Price => product::Column::PriceCents,
        ProductColumn::CreatedAt => product::Column::CreatedAt,
        ProductColumn::UpdatedAt => product::Column::UpdatedAt,
    }
}

#[async_trait]
impl ProductRepositoryInterface for SeaOrmProductRepository {
    async fn get_by_id(&self, id: i64) -> DomainResult<Option<Product>> {
        let model =
            bounded("get product by id", product::Entity::find_by_id(id).one(&self.db)).await?;
        Ok(model.map(product_model_to_domain))
    }

    async fn create(&self, dto: CreateProductDto) -> DomainResult<Product> {
        let now = Utc::now();
        let new_product = product::ActiveModel {
            id: NotSet,
            name: Set(dto.name),
            price_cents: Set(price_to_cents(dto.price)?),
            owner_id: Set(dto.owner_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = bounded("create product", new_product.insert(&self.db)).await?;
        debug!(product_id = model.id, owner_id = model.owner_id, "Product row inserted");
        Ok(product_model_to_domain(model))
    }

    async fn update(&self, product: Product) -> DomainResult<Product> {
        let active = product::ActiveModel {
            id: Set(product.id),
            name: Set(product.name),
            price_cents: Set(price_to_cents(product.price)?),
            owner_id: Set(product.owner_id),
            created_at: NotSet,
            updated_at: Set(Utc::now()),
        };

        match timed("update product", active.update(&self.db)).await? {
            Ok(model) => Ok(product_model_to_domain(model)),
            Err(DbErr::RecordNotUpdated) => Err(DomainError::not_found("Product", product.id)),
            Err(e) => Err(db_err("update product", e)),
        }
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        let result =
            bounded("delete product", product::Entity::delete_by_id(id).exec(&self.db)).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Product", id));
        }

        Ok(())
    }

    async fn list(&self, query: &ListQuery) -> DomainResult<(Vec<Product>, i64)> {
        let plan = ListPlan::build::<ProductListSchema>(query);
        let select = filtered(product::Entity::find(), &plan, column);

        let total = bounded("count products", select.clone().count(&self.db)).await? as i64;
        if total == 0 {
            return Ok((Vec::new(), 0));
        }

        let (_, window) = plan.window(total);
        let models = bounded(
            "list products",
            ordered_window(select, &plan, window, column).all(&self.db),
        )
        .await?;

        Ok((models.into_iter().map(product_model_to_domain).collect(), total))
    }
}
