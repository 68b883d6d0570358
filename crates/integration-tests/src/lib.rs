//! Integration tests for Vitrine.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p vitrine-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `login_throttle` - Brute-force lockout and its expiry
//! - `password_recovery` - Code issuance, redemption and expiry
//! - `order_lifecycle` - Checkout, status changes and notifications
//! - `accounts` - Registration, login and password change
//! - `catalog_admin` - Product CRUD, settings and dashboard stats
//!
//! Every test drives the public [`AppState`] API with no latency, minimal
//! password hashing, a manual clock and a recording notification gateway.

use std::sync::Arc;

use vitrine_backend::config::AdminAlertConfig;
use vitrine_backend::models::{
    Address, CustomerSnapshot, LoginSuccess, NewOrder, NewProduct, OrderItem, RegisterRequest,
};
use vitrine_backend::notifications::RecordingGateway;
use vitrine_backend::{AppState, BackendConfig, ManualClock};
use vitrine_core::{Email, Money, PaymentMethod, ProductId, UserId};

/// Phone that receives new-sale alerts in tests.
pub const ADMIN_PHONE: &str = "5511986628325";
/// Email that receives new-sale alerts in tests.
pub const ADMIN_EMAIL: &str = "gbrestilos@hotmail.com";

/// A backend plus handles on its clock and notification transport.
pub struct TestContext {
    pub state: AppState,
    pub clock: Arc<ManualClock>,
    pub gateway: Arc<RecordingGateway>,
}

impl TestContext {
    /// Backend with no admin alert recipients.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(BackendConfig::for_tests())
    }

    /// Backend that copies every sale to [`ADMIN_PHONE`] and [`ADMIN_EMAIL`].
    ///
    /// # Panics
    ///
    /// Never; the admin email is a valid constant.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn with_admin_alerts() -> Self {
        Self::with_config(BackendConfig {
            admin_alerts: AdminAlertConfig {
                phone: Some(ADMIN_PHONE.to_owned()),
                email: Some(Email::parse(ADMIN_EMAIL).unwrap()),
            },
            ..BackendConfig::for_tests()
        })
    }

    #[must_use]
    pub fn with_config(config: BackendConfig) -> Self {
        let clock = Arc::new(ManualClock::default());
        let gateway = Arc::new(RecordingGateway::new());
        let state = AppState::in_memory(config, gateway.clone(), clock.clone());
        Self {
            state,
            clock,
            gateway,
        }
    }

    /// Register a customer account.
    ///
    /// # Panics
    ///
    /// Panics if registration fails.
    #[allow(clippy::unwrap_used)]
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        phone: Option<&str>,
        password: &str,
    ) -> LoginSuccess {
        self.state
            .register(
                RegisterRequest {
                    username: username.to_owned(),
                    email: email.to_owned(),
                    name: username.to_owned(),
                    phone: phone.map(str::to_owned),
                },
                password,
            )
            .await
            .unwrap()
    }

    /// Add an active product to the catalog.
    ///
    /// # Panics
    ///
    /// Panics if the product is rejected.
    #[allow(clippy::unwrap_used)]
    pub async fn add_product(&self, name: &str, price: i64) -> ProductId {
        self.state
            .create_product(NewProduct {
                name: name.to_owned(),
                price: Money::from_minor(price),
                image: String::new(),
                description: String::new(),
                stock: 10,
                active: true,
            })
            .await
            .unwrap()
            .id
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// One order line.
#[must_use]
pub fn line(product_id: ProductId, name: &str, unit_price: i64, quantity: u32) -> OrderItem {
    OrderItem {
        product_id,
        name: name.to_owned(),
        quantity,
        unit_price: Money::from_minor(unit_price),
    }
}

/// A PIX checkout for `user_id` with the given contacts and lines.
#[must_use]
pub fn checkout(
    user_id: UserId,
    email: Option<Email>,
    phone: Option<&str>,
    items: Vec<OrderItem>,
) -> NewOrder {
    NewOrder {
        user_id,
        customer: CustomerSnapshot {
            name: "Maria Oliveira".to_owned(),
            email,
            phone: phone.map(str::to_owned),
        },
        address: Address {
            street: "Av Paulista 2000".to_owned(),
            city: "São Paulo".to_owned(),
            state: "SP".to_owned(),
            zip: "01310-200".to_owned(),
        },
        items,
        payment_method: PaymentMethod::Pix,
    }
}
