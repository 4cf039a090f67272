use chrono::Utc;
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, NewProduct, ProductFilter, ProductResponse, UpdateProduct};
use crate::repository::ProductRepository;

/// Service layer for Product business logic.
///
/// Inactive products are invisible to every read and write except delete,
/// which reports success for them. Read-modify-write steps run inside the
/// repository so concurrent requests on one product cannot interleave.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// All active products ordered by name
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> ProductResult<Vec<ProductResponse>> {
        let products = self.repository.scan(ProductFilter::active()).await?;
        Ok(products.into_iter().map(Into::into).collect())
    }

    /// An active product by ID
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: i32) -> ProductResult<Option<ProductResponse>> {
        let product = self.repository.get_by_id(id).await?;
        Ok(product.filter(|p| p.is_active).map(Into::into))
    }

    /// Create a new product with a unique name
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<ProductResponse> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        if self.repository.get_by_name(&input.name).await?.is_some() {
            return Err(ProductError::DuplicateName(input.name));
        }

        let product = NewProduct::new(input, Utc::now());
        self.repository.insert(product).await.map(Into::into)
    }

    /// Apply a partial update to an active product.
    ///
    /// Returns `None` when the product is missing or inactive. Renaming onto
    /// another product's name fails with `DuplicateName`.
    #[instrument(skip(self, input))]
    pub async fn update_product(
        &self,
        id: i32,
        input: UpdateProduct,
    ) -> ProductResult<Option<ProductResponse>> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        let updated = self.repository.update(id, input).await?;
        Ok(updated.map(Into::into))
    }

    /// Soft delete: mark the product inactive.
    ///
    /// Returns `false` only when no product with this id was ever stored.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: i32) -> ProductResult<bool> {
        self.repository.deactivate(id).await
    }

    /// Active products whose name or description contains `term`
    #[instrument(skip(self))]
    pub async fn search_products(&self, term: &str) -> ProductResult<Vec<ProductResponse>> {
        if term.trim().is_empty() {
            return Err(ProductError::Validation(
                "Search term must not be empty".to_string(),
            ));
        }

        let products = self
            .repository
            .scan(ProductFilter::active().containing(term))
            .await?;
        Ok(products.into_iter().map(Into::into).collect())
    }

    /// Check the backing store is reachable
    pub async fn health_check(&self) -> ProductResult<()> {
        self.repository.health_check().await
    }
}
