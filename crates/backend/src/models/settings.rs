//! Site-wide settings edited from the admin panel.

use serde::{Deserialize, Serialize};

use vitrine_core::Email;

/// Singleton storefront configuration read by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteSettings {
    /// Store name, also used to sign outgoing messages.
    pub site_name: String,
    /// Custom logo URL.
    pub logo: Option<String>,
    /// Logo shown when no custom logo is set.
    pub default_logo: Option<String>,
    /// WhatsApp contact number shown on the site.
    pub whatsapp: Option<String>,
    /// Public contact email.
    pub email: Option<Email>,
    pub maintenance_mode: bool,
    pub banner_active: bool,
    pub home_hero_visible: bool,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            site_name: "Vitrine".to_owned(),
            logo: None,
            default_logo: None,
            whatsapp: None,
            email: None,
            maintenance_mode: false,
            banner_active: true,
            home_hero_visible: true,
        }
    }
}

impl SiteSettings {
    /// The logo to render: the custom one if set, else the default.
    #[must_use]
    pub fn effective_logo(&self) -> Option<&str> {
        self.logo.as_deref().or(self.default_logo.as_deref())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: SiteSettings =
            serde_json::from_str(r#"{"siteName":"GBR Estilos","maintenanceMode":true}"#).unwrap();
        assert_eq!(settings.site_name, "GBR Estilos");
        assert!(settings.maintenance_mode);
        assert!(settings.banner_active);
    }

    #[test]
    fn test_effective_logo_prefers_custom() {
        let mut settings = SiteSettings {
            default_logo: Some("default.png".to_owned()),
            ..SiteSettings::default()
        };
        assert_eq!(settings.effective_logo(), Some("default.png"));
        settings.logo = Some("custom.png".to_owned());
        assert_eq!(settings.effective_logo(), Some("custom.png"));
    }
}
