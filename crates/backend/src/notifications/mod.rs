//! Outbound notifications.
//!
//! The backend only knows the [`NotificationGateway`] capability. Real
//! transports (SMTP, WhatsApp, SMS) are external collaborators; this crate
//! ships a logging transport and an in-memory recorder for tests.

mod logging;
mod messages;
mod recording;

use async_trait::async_trait;

use vitrine_core::Channel;

pub use logging::LoggingGateway;
pub use messages::Notifier;
pub use recording::{Delivery, RecordingGateway};

/// Delivers a message to one recipient over one channel.
///
/// Fire-and-forget: callers never branch on the returned flag, which only
/// says whether the transport accepted the message.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    async fn deliver(
        &self,
        channel: Channel,
        recipient: &str,
        subject: Option<&str>,
        body: &str,
    ) -> bool;
}
