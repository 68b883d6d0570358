//! Scripted storefront session.
//!
//! Seeds an in-process backend, then walks one order through its whole
//! lifecycle the way the UI would: browse, log in, check out, fulfil,
//! recover the password and read the dashboard. Notifications go to the log.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use vitrine_backend::config::LatencyProfile;
use vitrine_backend::models::{Address, CustomerSnapshot, NewOrder, OrderItem};
use vitrine_backend::notifications::LoggingGateway;
use vitrine_backend::{AppState, BackendConfig, SystemClock};
use vitrine_core::{Channel, OrderStatus, PaymentMethod};

use super::seed;

/// Options for one scripted session.
pub struct DemoOptions {
    pub seed: Option<PathBuf>,
    pub login: String,
    pub password: String,
    pub simulate_latency: bool,
}

/// Run the session.
///
/// # Errors
///
/// Returns an error if the configuration or seed is invalid, or if any step
/// of the session fails.
pub async fn run(options: DemoOptions) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = BackendConfig::from_env()?;
    if !options.simulate_latency {
        config.latency = LatencyProfile::none();
    }
    let currency = config.currency;

    let state = AppState::in_memory(config, Arc::new(LoggingGateway), Arc::new(SystemClock));
    let summary = state
        .apply_seed(seed::load(options.seed.as_deref()).await?)
        .await?;
    info!(?summary, "Backend seeded");

    // Storefront browsing
    let products = state.list_active_products().await?;
    info!(count = products.len(), "Storefront catalog loaded");

    // Customer login
    let session = state.login(&options.login, &options.password).await?;
    let user = session.user;
    info!(user_id = %user.id, name = %user.name, "Customer signed in");

    // Checkout with the first two products in the catalog
    let items: Vec<OrderItem> = products
        .iter()
        .take(2)
        .map(|p| OrderItem {
            product_id: p.id,
            name: p.name.clone(),
            quantity: 1,
            unit_price: p.price,
        })
        .collect();
    let order = state
        .create_order(NewOrder {
            user_id: user.id,
            customer: CustomerSnapshot {
                name: user.name.clone(),
                email: Some(user.email.clone()),
                phone: user.phone.clone(),
            },
            address: Address {
                street: "Rua Oscar Freire 900".to_owned(),
                city: "São Paulo".to_owned(),
                state: "SP".to_owned(),
                zip: "01426-001".to_owned(),
            },
            items,
            payment_method: PaymentMethod::Pix,
        })
        .await?;
    info!(order_id = %order.id, total = %order.total.format(currency), "Order placed");

    // Fulfilment from the admin panel
    state
        .update_order_status(&order.id, OrderStatus::Paid, None)
        .await?;
    state
        .update_order_status(&order.id, OrderStatus::Shipped, Some("GBR-000001".to_owned()))
        .await?;
    state
        .update_order_status(&order.id, OrderStatus::Delivered, None)
        .await?;

    let history = state.list_orders_for_user(user.id).await?;
    info!(orders = history.len(), "Customer order history");

    // Forgotten password
    let channel = if user.phone.is_some() {
        Channel::Phone
    } else {
        Channel::Email
    };
    state.request_recovery(&options.login, channel).await?;

    // Dashboard
    let stats = state.stats().await?;
    info!(
        users = stats.total_users,
        orders = stats.total_orders,
        revenue = %stats.total_revenue.format(currency),
        "Dashboard"
    );

    let purged = state.purge_expired_tokens().await?;
    info!(purged, "Session finished");
    Ok(())
}
