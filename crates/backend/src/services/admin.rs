//! Admin dashboard: stats and site settings.

use vitrine_core::Money;

use crate::db::{OrderRepository, RepositoryError, SettingsRepository, UserRepository};
use crate::models::settings::SiteSettings;
use crate::models::stats::AdminStats;

/// Admin panel reads and settings writes.
pub struct AdminService<'a> {
    users: &'a dyn UserRepository,
    orders: &'a dyn OrderRepository,
    settings: &'a dyn SettingsRepository,
    recent_orders: usize,
}

impl<'a> AdminService<'a> {
    #[must_use]
    pub fn new(
        users: &'a dyn UserRepository,
        orders: &'a dyn OrderRepository,
        settings: &'a dyn SettingsRepository,
        recent_orders: usize,
    ) -> Self {
        Self {
            users,
            orders,
            settings,
            recent_orders,
        }
    }

    /// Totals over every order and account, computed fresh on each call.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if a store fails.
    pub async fn stats(&self) -> Result<AdminStats, RepositoryError> {
        let total_users = self.users.count().await?;
        let orders = self.orders.list().await?;

        let total_revenue: Money = orders.iter().map(|o| o.total).sum();
        let total_orders = orders.len();
        let recent_orders = orders.into_iter().take(self.recent_orders).collect();

        Ok(AdminStats {
            total_users,
            total_orders,
            total_revenue,
            recent_orders,
        })
    }

    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails.
    pub async fn settings(&self) -> Result<SiteSettings, RepositoryError> {
        self.settings.get().await
    }

    /// Replace the site settings wholesale.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails.
    pub async fn save_settings(&self, settings: SiteSettings) -> Result<SiteSettings, RepositoryError> {
        self.settings.save(settings.clone()).await?;
        tracing::info!(
            site_name = %settings.site_name,
            maintenance_mode = settings.maintenance_mode,
            "Site settings saved"
        );
        Ok(settings)
    }
}
