//! Product repository.

use async_trait::async_trait;
use tokio::sync::RwLock;

use vitrine_core::ProductId;

use super::RepositoryError;
use crate::models::product::{NewProduct, Product};

/// Storage for the catalog. Listing order is newest first.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Every product, newest first.
    async fn list(&self) -> Result<Vec<Product>, RepositoryError>;

    /// Get a product by ID.
    async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Create a product with the next free ID.
    async fn create(&self, product: NewProduct) -> Result<Product, RepositoryError>;

    /// Store a product whose ID is already known (seeding). Appended at the
    /// end of the listing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the ID is taken.
    async fn insert(&self, product: Product) -> Result<(), RepositoryError>;

    /// Replace a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this ID.
    async fn update(&self, product: Product) -> Result<Product, RepositoryError>;

    /// Remove a product. Returns whether anything was removed.
    async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError>;
}

#[derive(Debug, Default)]
struct ProductTable {
    rows: Vec<Product>,
    last_id: i64,
}

/// In-memory catalog.
#[derive(Debug, Default)]
pub struct MemoryProductRepository {
    table: RwLock<ProductTable>,
}

impl MemoryProductRepository {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.table.read().await.rows.clone())
    }

    async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let table = self.table.read().await;
        Ok(table.rows.iter().find(|p| p.id == id).cloned())
    }

    async fn create(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        let mut table = self.table.write().await;
        table.last_id += 1;
        let product = product.with_id(ProductId::new(table.last_id));
        table.rows.insert(0, product.clone());
        Ok(product)
    }

    async fn insert(&self, product: Product) -> Result<(), RepositoryError> {
        let mut table = self.table.write().await;
        if table.rows.iter().any(|p| p.id == product.id) {
            return Err(RepositoryError::Conflict(format!(
                "product {} already exists",
                product.id
            )));
        }
        table.last_id = table.last_id.max(product.id.as_i64());
        table.rows.push(product);
        Ok(())
    }

    async fn update(&self, product: Product) -> Result<Product, RepositoryError> {
        let mut table = self.table.write().await;
        let slot = table
            .rows
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = product.clone();
        Ok(product)
    }

    async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let mut table = self.table.write().await;
        let before = table.rows.len();
        table.rows.retain(|p| p.id != id);
        Ok(table.rows.len() != before)
    }
}
