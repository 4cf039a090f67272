use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{ProductError, ProductResult};
use crate::models::{NewProduct, Product, ProductFilter, UpdateProduct};

/// Repository trait for Product persistence.
///
/// Reads never filter on their own: soft-deleted rows are returned like any
/// other and the service decides what callers may see. `update` and
/// `deactivate` are atomic per product, so a concurrent update can never
/// bring a deactivated product back.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Store a new product and return it with its assigned id
    async fn insert(&self, product: NewProduct) -> ProductResult<Product>;

    /// Get a product by ID, active or not
    async fn get_by_id(&self, id: i32) -> ProductResult<Option<Product>>;

    /// Exact, case-sensitive name lookup across all products
    async fn get_by_name(&self, name: &str) -> ProductResult<Option<Product>>;

    /// Apply `update` to the active product `id` in one step.
    ///
    /// `None` when the product is missing or inactive.
    async fn update(&self, id: i32, update: UpdateProduct) -> ProductResult<Option<Product>>;

    /// Mark the product inactive; `false` only when `id` was never stored
    async fn deactivate(&self, id: i32) -> ProductResult<bool>;

    /// Products matching `filter`, ordered by name then id
    async fn scan(&self, filter: ProductFilter) -> ProductResult<Vec<Product>>;

    /// Verify the backing store is reachable
    async fn health_check(&self) -> ProductResult<()>;
}

#[derive(Debug, Default)]
struct Store {
    products: HashMap<i32, Product>,
    last_id: i32,
}

/// In-memory implementation of ProductRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-populated with the three catalog samples (ids 1-3)
    pub fn seeded() -> Self {
        let now = Utc::now();
        let samples = [
            ("Laptop", "High-performance laptop", 25_000, 10),
            ("Mouse", "Wireless optical mouse", 500, 50),
            ("Keyboard", "Mechanical keyboard", 1_200, 30),
        ];

        let mut store = Store::default();
        for (name, description, price, stock) in samples {
            store.last_id += 1;
            let product = NewProduct {
                name: name.to_string(),
                description: Some(description.to_string()),
                price: Decimal::new(price * 100, 2),
                stock,
                created_date: now,
                is_active: true,
            }
            .with_id(store.last_id);
            store.products.insert(product.id, product);
        }

        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn insert(&self, product: NewProduct) -> ProductResult<Product> {
        let mut store = self.store.write().await;

        if store.products.values().any(|p| p.name == product.name) {
            return Err(ProductError::DuplicateName(product.name));
        }

        store.last_id += 1;
        let product = product.with_id(store.last_id);
        store.products.insert(product.id, product.clone());

        Ok(product)
    }

    async fn get_by_id(&self, id: i32) -> ProductResult<Option<Product>> {
        let store = self.store.read().await;
        Ok(store.products.get(&id).cloned())
    }

    async fn get_by_name(&self, name: &str) -> ProductResult<Option<Product>> {
        let store = self.store.read().await;
        Ok(store.products.values().find(|p| p.name == name).cloned())
    }

    async fn update(&self, id: i32, update: UpdateProduct) -> ProductResult<Option<Product>> {
        let mut store = self.store.write().await;

        let Some(current) = store.products.get(&id).filter(|p| p.is_active) else {
            return Ok(None);
        };

        let mut product = current.clone();
        product.apply_update(update);

        let name_taken = store
            .products
            .values()
            .any(|p| p.id != id && p.name == product.name);
        if name_taken {
            return Err(ProductError::DuplicateName(product.name));
        }

        store.products.insert(id, product.clone());
        Ok(Some(product))
    }

    async fn deactivate(&self, id: i32) -> ProductResult<bool> {
        let mut store = self.store.write().await;

        match store.products.get_mut(&id) {
            Some(product) => {
                product.is_active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn scan(&self, filter: ProductFilter) -> ProductResult<Vec<Product>> {
        let store = self.store.read().await;

        let mut result: Vec<Product> = store
            .products
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();

        result.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        Ok(result)
    }

    async fn health_check(&self) -> ProductResult<()> {
        Ok(())
    }
}
