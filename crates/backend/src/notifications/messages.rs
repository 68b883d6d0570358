//! Message composition for every notification the backend sends.
//!
//! This is the presentation edge for money: amounts are formatted here and
//! nowhere else.

use vitrine_core::{Channel, CurrencyCode, OrderStatus};

use super::NotificationGateway;
use crate::config::AdminAlertConfig;
use crate::models::order::Order;
use crate::models::user::User;

/// Composes messages and hands them to the gateway.
pub struct Notifier<'a> {
    gateway: &'a dyn NotificationGateway,
    admin_alerts: &'a AdminAlertConfig,
    currency: CurrencyCode,
    site_name: String,
}

impl<'a> Notifier<'a> {
    /// Create a notifier signing messages with `site_name`.
    #[must_use]
    pub fn new(
        gateway: &'a dyn NotificationGateway,
        admin_alerts: &'a AdminAlertConfig,
        currency: CurrencyCode,
        site_name: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            admin_alerts,
            currency,
            site_name: site_name.into(),
        }
    }

    /// Confirmation to the customer plus a sale alert to the store owner.
    pub async fn order_placed(&self, order: &Order) {
        let total = order.total.format(self.currency);
        let to_customer = format!(
            "Hi {}! Your order #{} is confirmed. Total: {total}. Status: {}",
            order.customer.name, order.id, order.status
        );
        let to_admin = format!(
            "New sale! Order #{} from {}. Amount: {total}.",
            order.id, order.customer.name
        );
        let subject = format!("Order confirmation - {}", self.site_name);

        self.to_customer(order, Some(&subject), &to_customer, &to_customer)
            .await;

        if let Some(phone) = &self.admin_alerts.phone {
            self.send(Channel::Phone, phone, None, &to_admin).await;
        }
        if let Some(email) = &self.admin_alerts.email {
            self.send(Channel::Email, email.as_str(), Some("New sale alert"), &to_admin)
                .await;
        }
    }

    /// Status update to the customer. Delivery gets its own wording.
    pub async fn status_changed(&self, order: &Order) {
        if order.status == OrderStatus::Delivered {
            let email_body = format!("Your order {} was delivered. Enjoy!", order.id);
            let phone_body = format!("Order {} delivered!", order.id);
            self.to_customer(order, Some("Order delivered"), &email_body, &phone_body)
                .await;
        } else {
            let mut body = format!(
                "Order #{} update: status changed to {}.",
                order.id, order.status
            );
            if let Some(code) = &order.tracking_code {
                body.push_str(&format!(" Tracking code: {code}."));
            }
            self.to_customer(order, Some("Order status update"), &body, &body)
                .await;
        }
    }

    /// Send a recovery code to the user's chosen contact.
    ///
    /// The caller has already checked that a phone exists for `Channel::Phone`.
    pub async fn recovery_code(&self, user: &User, channel: Channel, code: &str) {
        let body = format!("{} recovery code: {code}", self.site_name);
        match channel {
            Channel::Email => {
                self.send(
                    Channel::Email,
                    user.email.as_str(),
                    Some("Password recovery"),
                    &body,
                )
                .await;
            }
            Channel::Phone => {
                if let Some(phone) = &user.phone {
                    self.send(Channel::Phone, phone, None, &body).await;
                }
            }
        }
    }

    async fn to_customer(
        &self,
        order: &Order,
        email_subject: Option<&str>,
        email_body: &str,
        phone_body: &str,
    ) {
        if let Some(email) = &order.customer.email {
            self.send(Channel::Email, email.as_str(), email_subject, email_body)
                .await;
        }
        if let Some(phone) = &order.customer.phone {
            self.send(Channel::Phone, phone, None, phone_body).await;
        }
    }

    async fn send(&self, channel: Channel, recipient: &str, subject: Option<&str>, body: &str) {
        if !self.gateway.deliver(channel, recipient, subject, body).await {
            tracing::warn!(%channel, recipient, "Notification transport refused message");
        }
    }
}
