// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process domain event bus backed by a bounded broadcast channel.

use tokio::sync::broadcast;
use tracing::trace;

/// Changes published by services after a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainEvent {
    OfferCreated {
        shop_id: String,
        offer_id: String,
    },
    OfferStatusChanged {
        shop_id: String,
        offer_id: String,
        active: bool,
    },
    OfferRedeemed {
        shop_id: String,
        offer_id: String,
        customer_id: String,
    },
    ChatInitialized {
        shop_id: String,
        chat_id: String,
    },
    MessageSent {
        shop_id: String,
        chat_id: String,
        message_id: String,
    },
    ChatRead {
        shop_id: String,
        chat_id: String,
    },
}

impl DomainEvent {
    /// The shop every event is scoped to.
    pub fn shop_id(&self) -> &str {
        match self {
            Self::OfferCreated { shop_id, .. }
            | Self::OfferStatusChanged { shop_id, .. }
            | Self::OfferRedeemed { shop_id, .. }
            | Self::ChatInitialized { shop_id, .. }
            | Self::MessageSent { shop_id, .. }
            | Self::ChatRead { shop_id, .. } => shop_id,
        }
    }

    /// The conversation this event touches, if any.
    pub fn chat_id(&self) -> Option<&str> {
        match self {
            Self::ChatInitialized { chat_id, .. }
            | Self::MessageSent { chat_id, .. }
            | Self::ChatRead { chat_id, .. } => Some(chat_id),
            _ => None,
        }
    }

    pub fn is_offer_event(&self) -> bool {
        matches!(
            self,
            Self::OfferCreated { .. } | Self::OfferStatusChanged { .. } | Self::OfferRedeemed { .. }
        )
    }
}

/// Cloneable handle to the shared broadcast channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    /// Create a bus retaining at most `capacity` undelivered events per receiver.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publish an event. Having no subscribers is not an error.
    pub fn publish(&self, event: DomainEvent) {
        match self.tx.send(event) {
            Ok(receivers) => trace!(receivers, "domain event published"),
            Err(broadcast::error::SendError(event)) => {
                trace!(?event, "domain event dropped, no subscribers")
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn published_events_reach_subscribers() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();

        bus.publish(DomainEvent::ChatRead {
            shop_id: "S1".into(),
            chat_id: "S1_C1".into(),
        });

        let event = rx.recv().await.unwrap();
        assert_eq!(event.shop_id(), "S1");
        assert_eq!(event.chat_id(), Some("S1_C1"));
        assert!(!event.is_offer_event());
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        let bus = EventBus::new(8);
        bus.publish(DomainEvent::OfferCreated {
            shop_id: "S1".into(),
            offer_id: "O1".into(),
        });
        assert_eq!(bus.subscriber_count(), 0);
    }
}
