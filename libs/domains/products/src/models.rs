use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// Largest value a `decimal(18,2)` column can hold
const MAX_PRICE: Decimal = Decimal::from_parts(2_808_348_671, 232_830_643, 0, false, 2); // 9999999999999999.99

/// Product entity as held by the store
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Store-assigned identifier
    pub id: i32,
    /// Unique across all products, active or not
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    /// Set once on creation
    pub created_date: DateTime<Utc>,
    /// `false` once the product has been deleted
    pub is_active: bool,
}

impl Product {
    /// Apply a partial update.
    ///
    /// A blank `name` is ignored. `description` is replaced whenever it is
    /// present, even with an empty string.
    pub fn apply_update(&mut self, update: UpdateProduct) {
        if let Some(name) = update.name.filter(|n| !n.trim().is_empty()) {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(price) = update.price {
            self.price = price.round_dp(2);
        }
        if let Some(stock) = update.stock {
            self.stock = stock;
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
    }
}

/// Read shape returned by every successful read and write
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Laptop")]
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 25000.0)]
    pub price: Decimal,
    pub stock: i32,
    pub created_date: DateTime<Utc>,
    pub is_active: bool,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            stock: product.stock,
            created_date: product.created_date,
            is_active: product.is_active,
        }
    }
}

/// A product that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub created_date: DateTime<Utc>,
    pub is_active: bool,
}

impl NewProduct {
    pub fn new(input: CreateProduct, created_date: DateTime<Utc>) -> Self {
        Self {
            name: input.name,
            description: input.description,
            price: input.price.round_dp(2),
            stock: input.stock,
            created_date,
            is_active: input.is_active,
        }
    }

    /// Attach the identifier assigned by the store
    pub fn with_id(self, id: i32) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            stock: self.stock,
            created_date: self.created_date,
            is_active: self.is_active,
        }
    }
}

/// DTO for creating a new product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    #[schema(example = "Monitor")]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = f64, example = 3000.0)]
    pub price: Decimal,
    #[validate(range(min = 0))]
    pub stock: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// DTO for updating an existing product; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    /// New name; an empty or whitespace-only value leaves the name unchanged
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = Option<f64>)]
    pub price: Option<Decimal>,
    #[validate(range(min = 0))]
    pub stock: Option<i32>,
    pub is_active: Option<bool>,
}

/// Store-level scan filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    /// Restrict to active (or inactive) products
    pub active: Option<bool>,
    /// Case-sensitive substring of the name or the description
    pub contains: Option<String>,
}

impl ProductFilter {
    pub fn active() -> Self {
        Self {
            active: Some(true),
            contains: None,
        }
    }

    pub fn containing(mut self, term: impl Into<String>) -> Self {
        self.contains = Some(term.into());
        self
    }

    /// In-memory evaluation, mirrors the SQL produced by the Postgres store
    pub fn matches(&self, product: &Product) -> bool {
        if self.active.is_some_and(|active| product.is_active != active) {
            return false;
        }
        match self.contains.as_deref() {
            Some(term) => {
                product.name.contains(term)
                    || product
                        .description
                        .as_deref()
                        .is_some_and(|d| d.contains(term))
            }
            None => true,
        }
    }
}

/// Query string for `GET /search`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct SearchQuery {
    /// Case-sensitive text matched against name and description
    pub search_term: Option<String>,
}

fn default_active() -> bool {
    true
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be blank".into()));
    }
    Ok(())
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ValidationError::new("range").with_message("must not be negative".into()));
    }
    if price.round_dp(2) > MAX_PRICE {
        return Err(ValidationError::new("range").with_message("exceeds decimal(18,2)".into()));
    }
    Ok(())
}
