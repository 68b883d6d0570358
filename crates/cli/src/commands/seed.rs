//! Seed file loading and validation.
//!
//! A seed file is YAML describing site settings, products, users and
//! historical orders. Amounts are integer centavos.

use std::collections::HashSet;
use std::path::Path;

use thiserror::Error;
use tracing::{error, info, warn};

use vitrine_backend::SeedData;
use vitrine_backend::services::orders::order_total;

/// The seed shipped with the binary.
pub const BUILTIN_SEED: &str = include_str!("../../data/seed.yaml");

#[derive(Debug, Error)]
pub enum SeedFileError {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid seed file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Read and parse a seed, falling back to the built-in one.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable or not a valid seed.
pub async fn load(path: Option<&Path>) -> Result<SeedData, SeedFileError> {
    let Some(path) = path else {
        info!("Using built-in seed");
        return Ok(serde_yaml::from_str(BUILTIN_SEED)?);
    };

    if !path.exists() {
        return Err(SeedFileError::NotFound(path.display().to_string()));
    }

    info!(path = %path.display(), "Loading seed from file");
    let content = tokio::fs::read_to_string(path).await?;
    Ok(serde_yaml::from_str(&content)?)
}

/// Problems that parse fine but would leave the store inconsistent.
pub fn validate(seed: &SeedData) -> Vec<String> {
    let mut problems = Vec::new();

    let mut product_ids = HashSet::new();
    for product in &seed.products {
        if !product_ids.insert(product.id) {
            problems.push(format!("duplicate product id {}", product.id));
        }
        if product.name.trim().is_empty() {
            problems.push(format!("product {} has an empty name", product.id));
        }
    }

    let mut logins = HashSet::new();
    for user in &seed.users {
        if !logins.insert(user.username.to_lowercase()) {
            problems.push(format!("duplicate username {}", user.username));
        }
        if !logins.insert(user.email.as_str().to_lowercase()) {
            problems.push(format!("duplicate email {}", user.email));
        }
    }

    let mut order_ids = HashSet::new();
    for order in &seed.orders {
        if !order_ids.insert(order.id.as_str()) {
            problems.push(format!("duplicate order id {}", order.id));
        }

        // Users are numbered from 1 in file order.
        let user_count = i64::try_from(seed.users.len()).unwrap_or(i64::MAX);
        if !(1..=user_count).contains(&order.user_id.as_i64()) {
            problems.push(format!(
                "order {} belongs to unknown user {}",
                order.id, order.user_id
            ));
        }

        match order_total(&order.items) {
            Ok(total) if total == order.total => {}
            Ok(total) => problems.push(format!(
                "order {} total {} does not match its items ({})",
                order.id, order.total, total
            )),
            Err(e) => problems.push(format!("order {}: {e}", order.id)),
        }
    }

    problems
}

/// Parse and cross-check a seed file.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or fails validation.
pub async fn check(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let seed = load(Some(path)).await?;

    info!(
        products = seed.products.len(),
        users = seed.users.len(),
        orders = seed.orders.len(),
        settings = seed.settings.is_some(),
        "Parsed seed"
    );

    let unknown_products: Vec<_> = seed
        .orders
        .iter()
        .flat_map(|o| &o.items)
        .filter(|item| !seed.products.iter().any(|p| p.id == item.product_id))
        .map(|item| item.product_id)
        .collect();
    for id in unknown_products {
        // Order lines are snapshots, so this is allowed.
        warn!(product_id = %id, "Order line refers to a product not in the seed");
    }

    let problems = validate(&seed);
    if !problems.is_empty() {
        error!("Seed validation failed:");
        for problem in &problems {
            error!("  - {problem}");
        }
        return Err(format!("{} validation errors found", problems.len()).into());
    }

    info!("Seed is valid");
    Ok(())
}
