//! Product business logic service
//!
//! Products are stored with only their `owner_id`; this service attaches the
//! owning [`User`] after every read.

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::domain::{
    CreateProductDto, DomainError, DomainResult, ListQuery, Product, RepositoryProvider,
    UpdateProductDto, User,
};
use crate::shared::Pagination;

use super::normalize_query;

pub struct ProductService {
    repos: Arc<dyn RepositoryProvider>,
}

impl ProductService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Lists products with owners resolved in one batched lookup.
    ///
    /// A product whose owner cannot be found is returned with `owner: None`.
    pub async fn list_products(
        &self,
        query: ListQuery,
    ) -> DomainResult<(Vec<Product>, Pagination)> {
        let query = normalize_query(query);
        let (mut products, total) = self.repos.products().list(&query).await?;
        let pagination =
            Pagination::compute(query.page, query.size, total).with_take_all(query.take_all);

        if products.is_empty() {
            return Ok((products, pagination));
        }

        let mut owner_ids: Vec<i64> = products.iter().map(|p| p.owner_id).collect();
        owner_ids.sort_unstable();
        owner_ids.dedup();

        let owners: HashMap<i64, User> = self
            .repos
            .users()
            .list_by_ids(&owner_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        for product in &mut products {
            product.owner = owners.get(&product.owner_id).cloned();
            if product.owner.is_none() {
                warn!(
                    product_id = product.id,
                    owner_id = product.owner_id,
                    "Product owner not found"
                );
            }
        }

        Ok((products, pagination))
    }

    /// Fetches one product together with its owner. A dangling owner is an error.
    pub async fn get_product(&self, id: i64) -> DomainResult<Product> {
        let product = self.find_product(id).await?;
        self.with_owner(product).await
    }

    pub async fn create_product(&self, dto: CreateProductDto) -> DomainResult<Product> {
        validate_name(&dto.name)?;
        validate_price(dto.price)?;

        let owner = self
            .repos
            .users()
            .get_by_id(dto.owner_id)
            .await?
            .ok_or_else(|| {
                DomainError::Validation(format!("Owner {} does not exist", dto.owner_id))
            })?;

        let mut product = self.repos.products().create(dto).await?;
        info!(product_id = product.id, owner_id = owner.id, "Product created");
        product.owner = Some(owner);
        Ok(product)
    }

    pub async fn update_product(&self, id: i64, dto: UpdateProductDto) -> DomainResult<Product> {
        let mut product = self.find_product(id).await?;

        if let Some(name) = dto.name {
            validate_name(&name)?;
            product.name = name;
        }
        if let Some(price) = dto.price {
            validate_price(price)?;
            product.price = price;
        }

        let product = self.repos.products().update(product).await?;
        info!(product_id = product.id, "Product updated");
        self.with_owner(product).await
    }

    pub async fn delete_product(&self, id: i64) -> DomainResult<()> {
        self.repos.products().delete(id).await?;
        info!(product_id = id, "Product deleted");
        Ok(())
    }

    async fn find_product(&self, id: i64) -> DomainResult<Product> {
        self.repos
            .products()
            .get_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Product", id))
    }

    async fn with_owner(&self, mut product: Product) -> DomainResult<Product> {
        let owner = self
            .repos
            .users()
            .get_by_id(product.owner_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", product.owner_id))?;
        product.owner = Some(owner);
        Ok(product)
    }
}

fn validate_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::Validation(
            "Product name must not be empty".into(),
        ));
    }
    Ok(())
}

fn validate_price(price: Decimal) -> DomainResult<()> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(DomainError::Validation(format!(
            "Price must not be negative: {}",
            price
        )));
    }
    if price.normalize().scale() > 2 {
        return Err(DomainError::Validation(format!(
            "Price must have at most two decimal places: {}",
            price
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CreateUserDto;
    use crate::infrastructure::InMemoryRepositoryProvider;

    struct Fixture {
        repos: Arc<InMemoryRepositoryProvider>,
        service: ProductService,
    }

    fn fixture() -> Fixture {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let service = ProductService::new(repos.clone());
        Fixture { repos, service }
    }

    async fn owner(repos: &InMemoryRepositoryProvider, name: &str) -> User {
        repos
            .users()
            .create(CreateUserDto {
                name: name.into(),
                email: format!("{}@example.com", name.to_lowercase()),
            })
            .await
            .unwrap()
    }

    fn product(name: &str, cents: i64, owner_id: i64) -> CreateProductDto {
        CreateProductDto {
            name: name.into(),
            price: Decimal::new(cents, 2),
            owner_id,
        }
    }

    fn first_page() -> ListQuery {
        ListQuery {
            page: 1,
            size: 10,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn list_attaches_owners() {
        let f = fixture();
        let alice = owner(&f.repos, "Alice").await;
        let bob = owner(&f.repos, "Bob").await;
        f.service.create_product(product("Lamp", 1999, alice.id)).await.unwrap();
        f.service.create_product(product("Desk", 12000, bob.id)).await.unwrap();
        f.service.create_product(product("Chair", 4500, alice.id)).await.unwrap();

        let (products, pagination) = f.service.list_products(first_page()).await.unwrap();
        assert_eq!(pagination.total_count, 3);
        for p in &products {
            let owner = p.owner.as_ref().unwrap();
            assert_eq!(owner.id, p.owner_id);
        }
        assert_eq!(products[1].owner.as_ref().unwrap().name, "Bob");
    }

    #[tokio::test]
    async fn list_tolerates_missing_owner() {
        let f = fixture();
        let alice = owner(&f.repos, "Alice").await;
        let lamp = f.service.create_product(product("Lamp", 1999, alice.id)).await.unwrap();

        // Point the stored row at a user that does not exist.
        f.repos
            .products()
            .update(Product {
                owner_id: 404,
                ..lamp
            })
            .await
            .unwrap();

        let (products, _) = f.service.list_products(first_page()).await.unwrap();
        assert_eq!(products.len(), 1);
        assert!(products[0].owner.is_none());
    }

    #[tokio::test]
    async fn get_requires_owner() {
        let f = fixture();
        let alice = owner(&f.repos, "Alice").await;
        let lamp = f.service.create_product(product("Lamp", 1999, alice.id)).await.unwrap();

        let fetched = f.service.get_product(lamp.id).await.unwrap();
        assert_eq!(fetched.owner.unwrap().id, alice.id);

        f.repos
            .products()
            .update(Product {
                owner_id: 404,
                ..fetched.clone()
            })
            .await
            .unwrap();
        let err = f.service.get_product(lamp.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "User", id: 404 }));

        let err = f.service.get_product(999).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Product", id: 999 }));
    }

    #[tokio::test]
    async fn create_validates_input_and_owner() {
        let f = fixture();
        let alice = owner(&f.repos, "Alice").await;

        for dto in [
            product("", 100, alice.id),
            product("Lamp", -1, alice.id),
            CreateProductDto {
                price: Decimal::new(10001, 3),
                ..product("Lamp", 0, alice.id)
            },
            product("Lamp", 100, 12345),
        ] {
            let err = f.service.create_product(dto).await.unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)), "{:?}", err);
        }

        let free = f.service.create_product(product("Sticker", 0, alice.id)).await.unwrap();
        assert!(free.price.is_zero());
        assert_eq!(free.owner.unwrap().name, "Alice");
    }

    #[tokio::test]
    async fn update_merges_and_keeps_owner() {
        let f = fixture();
        let alice = owner(&f.repos, "Alice").await;
        let lamp = f.service.create_product(product("Lamp", 1999, alice.id)).await.unwrap();

        let updated = f
            .service
            .update_product(
                lamp.id,
                UpdateProductDto {
                    price: Some(Decimal::new(2499, 2)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Lamp");
        assert_eq!(updated.price, Decimal::new(2499, 2));
        assert_eq!(updated.owner.unwrap().id, alice.id);

        let err = f
            .service
            .update_product(lamp.id + 1, UpdateProductDto::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn delete_missing_product_is_not_found() {
        let f = fixture();
        assert!(f.service.delete_product(1).await.unwrap_err().is_not_found());
    }
}
