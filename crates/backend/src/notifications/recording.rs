//! Gateway double that remembers what it was asked to deliver.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use vitrine_core::Channel;

use super::NotificationGateway;

/// One recorded delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub channel: Channel,
    pub recipient: String,
    pub subject: Option<String>,
    pub body: String,
}

/// Records deliveries in memory. Can be told to refuse messages to check
/// that callers ignore transport failures.
#[derive(Debug)]
pub struct RecordingGateway {
    deliveries: Mutex<Vec<Delivery>>,
    accepting: AtomicBool,
}

impl Default for RecordingGateway {
    fn default() -> Self {
        Self {
            deliveries: Mutex::new(Vec::new()),
            accepting: AtomicBool::new(true),
        }
    }
}

impl RecordingGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything delivered so far, in order.
    #[must_use]
    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Deliveries addressed to `recipient`.
    #[must_use]
    pub fn sent_to(&self, recipient: &str) -> Vec<Delivery> {
        self.deliveries()
            .into_iter()
            .filter(|d| d.recipient == recipient)
            .collect()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.deliveries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Whether later deliveries report success. Messages are recorded either way.
    pub fn set_accepting(&self, accepting: bool) {
        self.accepting.store(accepting, Ordering::SeqCst);
    }
}

#[async_trait]
impl NotificationGateway for RecordingGateway {
    async fn deliver(
        &self,
        channel: Channel,
        recipient: &str,
        subject: Option<&str>,
        body: &str,
    ) -> bool {
        self.deliveries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Delivery {
                channel,
                recipient: recipient.to_owned(),
                subject: subject.map(str::to_owned),
                body: body.to_owned(),
            });
        self.accepting.load(Ordering::SeqCst)
    }
}
