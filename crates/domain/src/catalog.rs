//! Catalog service: create, update, and delete products with stock.

use common::ProductCategory;
use serde::{Deserialize, Serialize};
use store::{ChangeSet, Product, Stock, Store, StoreError};

use crate::error::{DomainError, Result};

/// Primitive product fields as received from the request layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductInput {
    pub code: String,
    pub name: String,
    /// Wire value, validated against [`ProductCategory::VALID_VALUES`].
    pub category: i16,
    pub price: i64,
    pub units: i64,
    pub description: Option<String>,
}

impl ProductInput {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        category: i16,
        price: i64,
        units: i64,
        description: Option<String>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            category,
            price,
            units,
            description,
        }
    }
}

/// Validates the primitive fields and resolves the category.
fn validate_input(input: &ProductInput) -> Result<ProductCategory> {
    if input.code.trim().is_empty() {
        return Err(DomainError::Validation("product code is invalid".to_string()));
    }
    if input.name.trim().is_empty() {
        return Err(DomainError::Validation("product name is invalid".to_string()));
    }
    let category = ProductCategory::from_value(input.category).ok_or_else(|| {
        DomainError::Validation(format!(
            "category must be a valid value => {:?}",
            ProductCategory::VALID_VALUES
        ))
    })?;
    if input.price < 0 {
        return Err(DomainError::Validation("product price is negative".to_string()));
    }
    if input.units < 0 {
        return Err(DomainError::Validation("stock units are negative".to_string()));
    }
    Ok(category)
}

/// Service owning product and stock lifecycle.
pub struct Catalog<S: Store> {
    store: S,
}

impl<S: Store> Catalog<S> {
    /// Creates a new catalog service over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates a product and its stock row atomically.
    ///
    /// Fails with a validation error on empty code/name, unknown
    /// category, or negative price/units, and with a duplicate error if
    /// the product code already exists.
    #[tracing::instrument(skip(self, input), fields(code = %input.code))]
    pub async fn add_product(&self, input: ProductInput) -> Result<Product> {
        let category = validate_input(&input)?;

        let product = Product::new(
            input.code.trim(),
            input.name.trim(),
            category,
            input.price,
            input.description,
        );
        let stock = Stock::new(product.code.clone(), input.units);

        let changes = ChangeSet::new()
            .insert_product(product.clone())
            .insert_stock(stock);

        self.store.commit(changes).await.map_err(|e| {
            tracing::error!(error = %e, code = %product.code, "error adding a new product");
            match e {
                StoreError::UniqueViolation { .. } => {
                    DomainError::Duplicate("error adding a new product".to_string())
                }
                _ => DomainError::Validation("error adding a new product".to_string()),
            }
        })?;

        Ok(product)
    }

    /// Overwrites a product's fields and its stock units atomically.
    ///
    /// Fails with a not-found error if no stock row exists for the code.
    #[tracing::instrument(skip(self, input), fields(code = %input.code))]
    pub async fn update_product(&self, input: ProductInput) -> Result<Product> {
        let category = validate_input(&input)?;
        let code = input.code.trim().to_string();

        let (mut product, mut stock) = self
            .store
            .stock_with_product(&code)
            .await
            .map_err(|e| store_failure(e, "error updating a product"))?
            .ok_or_else(|| {
                DomainError::NotFound(format!(
                    "error updating a product. product code {code} does not exist"
                ))
            })?;

        product.name = input.name.trim().to_string();
        product.category = category;
        product.price = input.price;
        product.description = input.description;
        product.touch();
        stock.units = input.units;
        stock.touch();

        let changes = ChangeSet::new()
            .update_product(product.clone())
            .update_stock(stock);

        self.store
            .commit(changes)
            .await
            .map_err(|e| store_failure(e, "error updating a product"))?;

        Ok(product)
    }

    /// Deletes a product; its stock row cascades with it.
    #[tracing::instrument(skip(self))]
    pub async fn delete_product(&self, code: &str) -> Result<()> {
        let product = self
            .store
            .product(code)
            .await
            .map_err(|e| store_failure(e, "error removing a product"))?;

        if product.is_none() {
            return Err(DomainError::NotFound(format!(
                "error removing a product. product code {code} does not exist"
            )));
        }

        self.store
            .commit(ChangeSet::new().delete_product(code))
            .await
            .map_err(|e| store_failure(e, "error removing a product"))
    }
}

fn store_failure(e: StoreError, message: &str) -> DomainError {
    tracing::error!(error = %e, "{message}");
    DomainError::Validation(message.to_string())
}
