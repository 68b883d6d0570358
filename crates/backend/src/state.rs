//! Application state and the backend's public operations.
//!
//! The UI calls the methods on [`AppState`]. Each one sleeps for its
//! configured latency, runs its service inside the shared critical section,
//! then sends notifications after the section is released.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard};

use vitrine_core::{Channel, OrderId, OrderStatus, ProductId, UserId};

use crate::clock::Clock;
use crate::config::BackendConfig;
use crate::db::{
    MemoryOrderRepository, MemoryPasswordResetRepository, MemoryProductRepository,
    MemorySettingsRepository, MemoryUserRepository, OrderRepository, PasswordResetRepository,
    ProductRepository, SettingsRepository, UserRepository,
};
use crate::error::{AppError, Result, add_breadcrumb, set_sentry_user};
use crate::models::{
    AdminStats, LoginSuccess, NewOrder, NewProduct, Order, Product, RegisterRequest, SiteSettings,
};
use crate::notifications::{NotificationGateway, Notifier};
use crate::services::{
    AdminService, AuthService, CatalogService, LoginThrottle, OrderService, RecoveryService,
};

/// The entity stores behind the backend.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub resets: Arc<dyn PasswordResetRepository>,
    pub settings: Arc<dyn SettingsRepository>,
}

impl Repositories {
    /// Fresh, empty in-memory stores with default settings.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(MemoryUserRepository::new()),
            products: Arc::new(MemoryProductRepository::new()),
            orders: Arc::new(MemoryOrderRepository::new()),
            resets: Arc::new(MemoryPasswordResetRepository::new()),
            settings: Arc::new(MemorySettingsRepository::new(SiteSettings::default())),
        }
    }
}

/// Application state shared by every caller.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: BackendConfig,
    repos: Repositories,
    gateway: Arc<dyn NotificationGateway>,
    clock: Arc<dyn Clock>,
    throttle: LoginThrottle,
    critical: Mutex<()>,
}

async fn simulate_latency(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// Convert a service result, logging and reporting the failure.
fn observe<T, E>(operation: &'static str, result: std::result::Result<T, E>) -> Result<T>
where
    AppError: From<E>,
{
    result.map_err(|e| {
        let err = AppError::from(e);
        err.report(operation);
        err
    })
}

impl AppState {
    /// Create the state over the given stores.
    #[must_use]
    pub fn new(
        config: BackendConfig,
        repos: Repositories,
        gateway: Arc<dyn NotificationGateway>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let throttle = LoginThrottle::new(config.login);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                repos,
                gateway,
                clock,
                throttle,
                critical: Mutex::new(()),
            }),
        }
    }

    /// Create the state over fresh in-memory stores.
    #[must_use]
    pub fn in_memory(
        config: BackendConfig,
        gateway: Arc<dyn NotificationGateway>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::new(config, Repositories::in_memory(), gateway, clock)
    }

    #[must_use]
    pub fn config(&self) -> &BackendConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn repositories(&self) -> &Repositories {
        &self.inner.repos
    }

    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.inner.clock.as_ref()
    }

    /// Current failure count for a login identifier.
    #[must_use]
    pub fn failed_logins(&self, identifier: &str) -> u32 {
        self.inner.throttle.failures(identifier)
    }

    /// Enter the critical section shared by all mutations.
    pub(crate) async fn lock(&self) -> MutexGuard<'_, ()> {
        self.inner.critical.lock().await
    }

    fn auth(&self) -> AuthService<'_> {
        AuthService::new(
            self.inner.repos.users.as_ref(),
            &self.inner.throttle,
            self.inner.clock.as_ref(),
            self.inner.config.password_hashing,
        )
    }

    fn recovery(&self) -> RecoveryService<'_> {
        RecoveryService::new(
            self.inner.repos.users.as_ref(),
            self.inner.repos.resets.as_ref(),
            self.inner.clock.as_ref(),
            self.inner.config.password_hashing,
            self.inner.config.recovery_ttl,
        )
    }

    fn orders(&self) -> OrderService<'_> {
        OrderService::new(self.inner.repos.orders.as_ref(), self.inner.clock.as_ref())
    }

    fn catalog(&self) -> CatalogService<'_> {
        CatalogService::new(self.inner.repos.products.as_ref())
    }

    fn admin(&self) -> AdminService<'_> {
        AdminService::new(
            self.inner.repos.users.as_ref(),
            self.inner.repos.orders.as_ref(),
            self.inner.repos.settings.as_ref(),
            self.inner.config.recent_orders,
        )
    }

    async fn notifier(&self) -> Notifier<'_> {
        let site_name = match self.inner.repos.settings.get().await {
            Ok(settings) => settings.site_name,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read site name, using default");
                SiteSettings::default().site_name
            }
        };
        Notifier::new(
            self.inner.gateway.as_ref(),
            &self.inner.config.admin_alerts,
            self.inner.config.currency,
            site_name,
        )
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    /// Log in with username or email.
    ///
    /// # Errors
    ///
    /// `Throttled` while the identifier is locked out, `InvalidCredential`
    /// for a wrong identifier or password.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<LoginSuccess> {
        simulate_latency(self.inner.config.latency.auth).await;

        let result = {
            let _guard = self.lock().await;
            self.auth().login(identifier, password).await
        };
        let success = observe("login", result)?;

        set_sentry_user(&success.user.id, Some(&success.user.username));
        tracing::info!(user_id = %success.user.id, "User logged in");
        Ok(success)
    }

    /// Create a customer account and sign it in.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a malformed email or empty username/password,
    /// `Conflict` when the username or email is taken.
    pub async fn register(&self, request: RegisterRequest, password: &str) -> Result<LoginSuccess> {
        simulate_latency(self.inner.config.latency.auth).await;

        let result = {
            let _guard = self.lock().await;
            self.auth().register(request, password).await
        };
        let success = observe("register", result)?;

        set_sentry_user(&success.user.id, Some(&success.user.username));
        Ok(success)
    }

    /// Change a signed-in user's password.
    ///
    /// # Errors
    ///
    /// `InvalidCredential` if the current password is wrong or the user is unknown.
    pub async fn change_password(
        &self,
        user_id: UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<()> {
        simulate_latency(self.inner.config.latency.auth).await;

        let _guard = self.lock().await;
        let result = self
            .auth()
            .change_password(user_id, current_password, new_password)
            .await;
        observe("change_password", result)
    }

    /// Send a recovery code to the account's email or phone.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown identifier, `MissingChannel` when the phone
    /// channel is chosen and the account has no phone.
    pub async fn request_recovery(&self, identifier: &str, channel: Channel) -> Result<()> {
        simulate_latency(self.inner.config.latency.auth).await;

        let result = {
            let _guard = self.lock().await;
            self.recovery().request(identifier, channel).await
        };
        let issued = observe("request_recovery", result)?;

        self.notifier()
            .await
            .recovery_code(&issued.user, issued.channel, &issued.code)
            .await;
        Ok(())
    }

    /// Redeem a recovery code and set a new password.
    ///
    /// # Errors
    ///
    /// `InvalidOrExpiredToken` unless the code is active, `NotFound` if its
    /// owner no longer exists.
    pub async fn redeem_recovery(&self, code: &str, new_password: &str) -> Result<()> {
        simulate_latency(self.inner.config.latency.auth).await;

        let _guard = self.lock().await;
        let result = self.recovery().redeem(code, new_password).await;
        observe("redeem_recovery", result).map(|_| ())
    }

    /// Drop used and expired recovery codes. Returns how many were removed.
    ///
    /// # Errors
    ///
    /// `Internal` if the store fails.
    pub async fn purge_expired_tokens(&self) -> Result<usize> {
        let _guard = self.lock().await;
        let result = self.recovery().purge_expired().await;
        observe("purge_expired_tokens", result)
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Place an order and notify the customer and the store owner.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an empty cart, a zero quantity or an overflowing total.
    pub async fn create_order(&self, new_order: NewOrder) -> Result<Order> {
        simulate_latency(self.inner.config.latency.order_create).await;

        let result = {
            let _guard = self.lock().await;
            self.orders().create(new_order).await
        };
        let order = observe("create_order", result)?;

        add_breadcrumb("order", "Order created", &[("order_id", order.id.as_str())]);
        self.notifier().await.order_placed(&order).await;
        Ok(order)
    }

    /// Set an order's status and notify the customer.
    ///
    /// Every call notifies, even when the status does not change.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown order id.
    pub async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
        tracking_code: Option<String>,
    ) -> Result<Order> {
        simulate_latency(self.inner.config.latency.order_update).await;

        let result = {
            let _guard = self.lock().await;
            self.orders().update_status(id, status, tracking_code).await
        };
        let order = observe("update_order_status", result)?;

        add_breadcrumb(
            "order",
            "Order status updated",
            &[("order_id", order.id.as_str()), ("status", status.as_str())],
        );
        self.notifier().await.status_changed(&order).await;
        Ok(order)
    }

    /// All orders, newest first.
    ///
    /// # Errors
    ///
    /// `Internal` if the store fails.
    pub async fn list_orders(&self) -> Result<Vec<Order>> {
        simulate_latency(self.inner.config.latency.order_list).await;
        observe("list_orders", self.orders().list_all().await)
    }

    /// A user's orders, newest first.
    ///
    /// # Errors
    ///
    /// `Internal` if the store fails.
    pub async fn list_orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>> {
        simulate_latency(self.inner.config.latency.order_list).await;
        observe("list_orders_for_user", self.orders().list_for_user(user_id).await)
    }

    /// # Errors
    ///
    /// `Internal` if the store fails.
    pub async fn get_order(&self, id: &OrderId) -> Result<Option<Order>> {
        simulate_latency(self.inner.config.latency.order_read).await;
        observe("get_order", self.orders().get(id).await)
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Every product, for the admin panel.
    ///
    /// # Errors
    ///
    /// `Internal` if the store fails.
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        simulate_latency(self.inner.config.latency.product_list).await;
        observe("list_products", self.catalog().list().await)
    }

    /// Products visible on the storefront.
    ///
    /// # Errors
    ///
    /// `Internal` if the store fails.
    pub async fn list_active_products(&self) -> Result<Vec<Product>> {
        simulate_latency(self.inner.config.latency.product_list).await;
        observe("list_active_products", self.catalog().list_active().await)
    }

    /// # Errors
    ///
    /// `Internal` if the store fails.
    pub async fn get_product(&self, id: ProductId) -> Result<Option<Product>> {
        simulate_latency(self.inner.config.latency.product_read).await;
        observe("get_product", self.catalog().get(id).await)
    }

    /// # Errors
    ///
    /// `InvalidInput` for an empty name or negative price.
    pub async fn create_product(&self, product: NewProduct) -> Result<Product> {
        let _guard = self.lock().await;
        observe("create_product", self.catalog().create(product).await)
    }

    /// # Errors
    ///
    /// `NotFound` for an unknown product, `InvalidInput` for bad fields.
    pub async fn update_product(&self, product: Product) -> Result<Product> {
        let _guard = self.lock().await;
        observe("update_product", self.catalog().update(product).await)
    }

    /// Returns `false` when nothing was removed.
    ///
    /// # Errors
    ///
    /// `Internal` if the store fails.
    pub async fn delete_product(&self, id: ProductId) -> Result<bool> {
        let _guard = self.lock().await;
        observe("delete_product", self.catalog().delete(id).await)
    }

    // =========================================================================
    // Admin
    // =========================================================================

    /// Dashboard totals, recomputed on every call.
    ///
    /// # Errors
    ///
    /// `Internal` if a store fails.
    pub async fn stats(&self) -> Result<AdminStats> {
        simulate_latency(self.inner.config.latency.admin_stats).await;

        let _guard = self.lock().await;
        observe("stats", self.admin().stats().await)
    }

    /// # Errors
    ///
    /// `Internal` if the store fails.
    pub async fn settings(&self) -> Result<SiteSettings> {
        observe("settings", self.admin().settings().await)
    }

    /// Replace the site settings.
    ///
    /// # Errors
    ///
    /// `Internal` if the store fails.
    pub async fn save_settings(&self, settings: SiteSettings) -> Result<SiteSettings> {
        let _guard = self.lock().await;
        observe("save_settings", self.admin().save_settings(settings).await)
    }
}
