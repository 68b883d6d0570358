//! Catalog product types.

use serde::{Deserialize, Serialize};

use vitrine_core::{Money, ProductId};

/// A catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Unit price in minor units.
    pub price: Money,
    /// Image URL.
    pub image: String,
    pub description: String,
    /// Units on hand. Not decremented by checkout.
    pub stock: u32,
    /// Whether the storefront shows this product.
    pub active: bool,
}

/// A product before the catalog assigns its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub price: Money,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub stock: u32,
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_active() -> bool {
    true
}

impl NewProduct {
    /// Attach an id, producing the stored product.
    #[must_use]
    pub fn with_id(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            image: self.image,
            description: self.description,
            stock: self.stock,
            active: self.active,
        }
    }
}
