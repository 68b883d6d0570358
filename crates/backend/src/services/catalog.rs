//! Product catalog management.

use thiserror::Error;

use vitrine_core::{Money, ProductId};

use crate::db::{ProductRepository, RepositoryError};
use crate::models::product::{NewProduct, Product};

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("product not found: {0}")]
    NotFound(ProductId),

    #[error("invalid product: {0}")]
    InvalidProduct(String),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

fn validate(name: &str, price: Money) -> Result<String, CatalogError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CatalogError::InvalidProduct(
            "name cannot be empty".to_owned(),
        ));
    }
    if price < Money::ZERO {
        return Err(CatalogError::InvalidProduct(
            "price cannot be negative".to_owned(),
        ));
    }
    Ok(name.to_owned())
}

/// Catalog service. Write access is gated by the admin panel, not here.
pub struct CatalogService<'a> {
    products: &'a dyn ProductRepository,
}

impl<'a> CatalogService<'a> {
    #[must_use]
    pub fn new(products: &'a dyn ProductRepository) -> Self {
        Self { products }
    }

    /// Every product, newest first.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the store fails.
    pub async fn list(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.list().await?)
    }

    /// Products visible on the storefront.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the store fails.
    pub async fn list_active(&self) -> Result<Vec<Product>, CatalogError> {
        let mut products = self.products.list().await?;
        products.retain(|p| p.active);
        Ok(products)
    }

    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the store fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
        Ok(self.products.get_by_id(id).await?)
    }

    /// Add a product with the next free id.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidProduct` for an empty name or negative price.
    pub async fn create(&self, mut product: NewProduct) -> Result<Product, CatalogError> {
        product.name = validate(&product.name, product.price)?;
        let product = self.products.create(product).await?;
        tracing::info!(product_id = %product.id, name = %product.name, "Product created");
        Ok(product)
    }

    /// Replace a product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` for an unknown id.
    /// Returns `CatalogError::InvalidProduct` for an empty name or negative price.
    pub async fn update(&self, mut product: Product) -> Result<Product, CatalogError> {
        product.name = validate(&product.name, product.price)?;
        let id = product.id;
        let product = self.products.update(product).await.map_err(|e| match e {
            RepositoryError::NotFound => CatalogError::NotFound(id),
            other => CatalogError::Repository(other),
        })?;
        tracing::info!(product_id = %id, active = product.active, "Product updated");
        Ok(product)
    }

    /// Remove a product. Returns `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the store fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, CatalogError> {
        let removed = self.products.delete(id).await?;
        if removed {
            tracing::info!(product_id = %id, "Product deleted");
        }
        Ok(removed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryProductRepository;

    fn scarf(active: bool) -> NewProduct {
        NewProduct {
            name: " Echarpe Fios de Ouro ".to_owned(),
            price: Money::from_minor(45_000),
            image: String::new(),
            description: String::new(),
            stock: 20,
            active,
        }
    }

    #[tokio::test]
    async fn test_create_trims_and_lists_active_only() {
        let repo = MemoryProductRepository::new();
        let catalog = CatalogService::new(&repo);

        let visible = catalog.create(scarf(true)).await.unwrap();
        catalog.create(scarf(false)).await.unwrap();

        assert_eq!(visible.name, "Echarpe Fios de Ouro");
        assert_eq!(catalog.list().await.unwrap().len(), 2);
        let active = catalog.list_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, visible.id);
    }

    #[tokio::test]
    async fn test_rejects_invalid_products() {
        let repo = MemoryProductRepository::new();
        let catalog = CatalogService::new(&repo);

        let mut unnamed = scarf(true);
        unnamed.name = "  ".to_owned();
        assert!(matches!(
            catalog.create(unnamed).await,
            Err(CatalogError::InvalidProduct(_))
        ));

        let mut negative = scarf(true);
        negative.price = Money::from_minor(-1);
        assert!(matches!(
            catalog.create(negative).await,
            Err(CatalogError::InvalidProduct(_))
        ));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = MemoryProductRepository::new();
        let catalog = CatalogService::new(&repo);
        let mut product = catalog.create(scarf(true)).await.unwrap();

        product.stock = 3;
        assert_eq!(catalog.update(product.clone()).await.unwrap().stock, 3);

        assert!(catalog.delete(product.id).await.unwrap());
        assert!(!catalog.delete(product.id).await.unwrap());
        assert!(matches!(
            catalog.update(product).await,
            Err(CatalogError::NotFound(_))
        ));
    }
}
