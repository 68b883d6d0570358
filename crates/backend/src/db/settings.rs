//! Site settings storage.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::RepositoryError;
use crate::models::settings::SiteSettings;

/// Storage for the site settings singleton.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Current settings.
    async fn get(&self) -> Result<SiteSettings, RepositoryError>;

    /// Replace the settings wholesale.
    async fn save(&self, settings: SiteSettings) -> Result<(), RepositoryError>;
}

/// In-memory settings holder.
#[derive(Debug, Default)]
pub struct MemorySettingsRepository {
    current: RwLock<SiteSettings>,
}

impl MemorySettingsRepository {
    /// Start from the given settings.
    #[must_use]
    pub fn new(initial: SiteSettings) -> Self {
        Self {
            current: RwLock::new(initial),
        }
    }
}

#[async_trait]
impl SettingsRepository for MemorySettingsRepository {
    async fn get(&self) -> Result<SiteSettings, RepositoryError> {
        Ok(self.current.read().await.clone())
    }

    async fn save(&self, settings: SiteSettings) -> Result<(), RepositoryError> {
        *self.current.write().await = settings;
        Ok(())
    }
}
