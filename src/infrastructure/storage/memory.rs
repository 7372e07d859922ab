//! In-memory storage implementation

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;

use crate::domain::{
    CreateProductDto, CreateUserDto, DomainError, DomainResult, ListPlan, ListQuery, ListSchema,
    Product, ProductColumn, ProductListSchema, ProductRepositoryInterface, RepositoryProvider,
    User, UserColumn, UserListSchema, UserRepositoryInterface,
};

/// Tables shared by the in-memory repositories.
///
/// Ids start at 1 and are never reused, like an autoincrement column.
struct Tables {
    users: DashMap<i64, User>,
    products: DashMap<i64, Product>,
    user_counter: AtomicI64,
    product_counter: AtomicI64,
}

impl Tables {
    fn new() -> Self {
        Self {
            users: DashMap::new(),
            products: DashMap::new(),
            user_counter: AtomicI64::new(1),
            product_counter: AtomicI64::new(1),
        }
    }
}

/// Comparable value of one column.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum FieldValue<'a> {
    Int(i64),
    Text(&'a str),
    Money(Decimal),
    Time(DateTime<Utc>),
}

trait Row<C> {
    fn id(&self) -> i64;
    fn value(&self, column: C) -> FieldValue<'_>;
}

impl Row<UserColumn> for User {
    fn id(&self) -> i64 {
        self.id
    }

    fn value(&self, column: UserColumn) -> FieldValue<'_> {
        match column {
            UserColumn::Id => FieldValue::Int(self.id),
            UserColumn::Name => FieldValue::Text(&self.name),
            UserColumn::Email => FieldValue::Text(&self.email),
            UserColumn::CreatedAt => FieldValue::Time(self.created_at),
            UserColumn::UpdatedAt => FieldValue::Time(self.updated_at),
        }
    }
}

impl Row<ProductColumn> for Product {
    fn id(&self) -> i64 {
        self.id
    }

    fn value(&self, column: ProductColumn) -> FieldValue<'_> {
        match column {
            ProductColumn::Id => FieldValue::Int(self.id),
            ProductColumn::Name => FieldValue::Text(&self.name),
            ProductColumn::Price => FieldValue::Money(self.price),
            ProductColumn::CreatedAt => FieldValue::Time(self.created_at),
            ProductColumn::UpdatedAt => FieldValue::Time(self.updated_at),
        }
    }
}

/// Filters, sorts and windows a snapshot of rows the same way the SQL
/// backend does. Ties on the sort column are broken by id.
fn select_page<S, T>(rows: impl Iterator<Item = T>, query: &ListQuery) -> (Vec<T>, i64)
where
    S: ListSchema,
    T: Row<S::Column>,
{
    let plan = ListPlan::build::<S>(query);

    let mut rows: Vec<T> = rows
        .filter(|row| match &plan.filter {
            Some(filter) => filter.columns().iter().any(|&c| {
                matches!(row.value(c), FieldValue::Text(text) if filter.matches(text))
            }),
            None => true,
        })
        .collect();

    let total = rows.len() as i64;
    if total == 0 {
        return (Vec::new(), 0);
    }

    let column = plan.order.column;
    let desc = plan.order.is_desc();
    rows.sort_by(|a, b| {
        let ordering = a
            .value(column)
            .cmp(&b.value(column))
            .then_with(|| a.id().cmp(&b.id()));
        if desc {
            ordering.reverse()
        } else {
            ordering
        }
    });

    let (_, window) = plan.window(total);
    let rows = match window {
        Some(window) => rows
            .into_iter()
            .skip(window.offset as usize)
            .take(window.limit as usize)
            .collect(),
        None => rows,
    };

    (rows, total)
}

pub struct InMemoryUserRepository {
    tables: Arc<Tables>,
}

#[async_trait]
impl UserRepositoryInterface for InMemoryUserRepository {
    async fn get_by_id(&self, id: i64) -> DomainResult<Option<User>> {
        Ok(self.tables.users.get(&id).map(|u| u.clone()))
    }

    async fn create(&self, dto: CreateUserDto) -> DomainResult<User> {
        let id = self.tables.user_counter.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let user = User {
            id,
            name: dto.name,
            email: dto.email,
            created_at: now,
            updated_at: now,
        };
        self.tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> DomainResult<User> {
        let mut stored = self
            .tables
            .users
            .get_mut(&user.id)
            .ok_or_else(|| DomainError::not_found("User", user.id))?;

        stored.name = user.name;
        stored.email = user.email;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        self.tables
            .users
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("User", id))?;

        // Owned products go with their owner.
        self.tables.products.retain(|_, p| p.owner_id != id);
        Ok(())
    }

    async fn list(&self, query: &ListQuery) -> DomainResult<(Vec<User>, i64)> {
        let snapshot = self.tables.users.iter().map(|u| u.value().clone());
        Ok(select_page::<UserListSchema, _>(snapshot, query))
    }

    async fn list_by_ids(&self, ids: &[i64]) -> DomainResult<Vec<User>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.tables.users.get(id).map(|u| u.clone()))
            .collect())
    }
}

pub struct InMemoryProductRepository {
    tables: Arc<Tables>,
}

#[async_trait]
impl ProductRepositoryInterface for InMemoryProductRepository {
    async fn get_by_id(&self, id: i64) -> DomainResult<Option<Product>> {
        Ok(self.tables.products.get(&id).map(|p| p.clone()))
    }

    async fn create(&self, dto: CreateProductDto) -> DomainResult<Product> {
        if !self.tables.users.contains_key(&dto.owner_id) {
            return Err(DomainError::storage(
                "create product",
                format!("owner {} does not exist", dto.owner_id),
            ));
        }

        let id = self.tables.product_counter.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let product = Product {
            id,
            name: dto.name,
            price: dto.price,
            owner_id: dto.owner_id,
            created_at: now,
            updated_at: now,
            owner: None,
        };
        self.tables.products.insert(id, product.clone());
        Ok(product)
    }

    async fn update(&self, product: Product) -> DomainResult<Product> {
        let mut stored = self
            .tables
            .products
            .get_mut(&product.id)
            .ok_or_else(|| DomainError::not_found("Product", product.id))?;

        stored.name = product.name;
        stored.price = product.price;
        stored.owner_id = product.owner_id;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        self.tables
            .products
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("Product", id))
    }

    async fn list(&self, query: &ListQuery) -> DomainResult<(Vec<Product>, i64)> {
        let snapshot = self.tables.products.iter().map(|p| p.value().clone());
        Ok(select_page::<ProductListSchema, _>(snapshot, query))
    }
}

/// Repository provider kept entirely in process memory.
///
/// Used for development runs without a database file and by the service and
/// HTTP tests.
pub struct InMemoryRepositoryProvider {
    users: InMemoryUserRepository,
    products: InMemoryProductRepository,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        let tables = Arc::new(Tables::new());
        Self {
            users: InMemoryUserRepository {
                tables: tables.clone(),
            },
            products: InMemoryProductRepository { tables },
        }
    }
}

impl Default for InMemoryRepositoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RepositoryProvider for InMemoryRepositoryProvider {
    fn users(&self) -> &dyn UserRepositoryInterface {
        &self.users
    }

    fn products(&self) -> &dyn ProductRepositoryInterface {
        &self.products
    }

    async fn ping(&self) -> DomainResult<()> {
        Ok(())
    }
}
