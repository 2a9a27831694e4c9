use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::domain::events::AccountEvent;

/// Reasons an event could not be handed over
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventPublishError {
    #[error("Event queue is full")]
    QueueFull,

    #[error("Event consumer has shut down")]
    ConsumerClosed,
}

/// Outbound sink for account events
#[async_trait]
pub trait AccountEventPublisher: Send + Sync {
    /// Hand an event over to the consumer
    ///
    /// # Returns
    /// * `Ok(())` - The event was accepted
    /// * `Err(EventPublishError)` - The event was not delivered
    async fn publish(&self, event: AccountEvent) -> Result<(), EventPublishError>;
}

/// Publish an event, logging instead of failing when delivery does not work
pub async fn publish_or_log(publisher: &dyn AccountEventPublisher, event: AccountEvent) {
    let name = event.name();
    if let Err(e) = publisher.publish(event).await {
        warn!(event = name, error = %e, "Failed to publish account event");
    }
}

/// Records every event as a structured tracing event
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventPublisher;

#[async_trait]
impl AccountEventPublisher for TracingEventPublisher {
    async fn publish(&self, event: AccountEvent) -> Result<(), EventPublishError> {
        let payload = serde_json::to_string(&event).unwrap_or_default();
        info!(
            event = event.name(),
            user_id = ?event.user_id(),
            payload = %payload,
            "Account event"
        );
        Ok(())
    }
}

/// Enqueues events onto a bounded channel drained by an external worker
#[derive(Debug, Clone)]
pub struct ChannelEventPublisher {
    sender: mpsc::Sender<AccountEvent>,
}

impl ChannelEventPublisher {
    /// Create a publisher and the receiving end of its queue
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<AccountEvent>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl AccountEventPublisher for ChannelEventPublisher {
    async fn publish(&self, event: AccountEvent) -> Result<(), EventPublishError> {
        self.sender.try_send(event).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => EventPublishError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => EventPublishError::ConsumerClosed,
        })
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventPublisher;

#[async_trait]
impl AccountEventPublisher for NoOpEventPublisher {
    async fn publish(&self, _event: AccountEvent) -> Result<(), EventPublishError> {
        Ok(())
    }
}
