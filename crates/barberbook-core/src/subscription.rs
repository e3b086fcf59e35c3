// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Snapshot subscriptions over the domain event bus.
//!
//! A [`Subscription`] yields the current result set first, then a fresh result
//! set every time a matching [`DomainEvent`] is observed. Bursts of events that
//! queue up while the consumer is busy collapse into a single refetch, and a
//! lagging receiver refetches instead of replaying. Dropping the subscription
//! unsubscribes.

use std::future::Future;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::debug;

use crate::error::BarberError;
use crate::events::DomainEvent;

/// Produces a fresh snapshot of the watched query.
pub type SnapshotFetch<T> =
    Box<dyn Fn() -> BoxFuture<'static, Result<Vec<T>, BarberError>> + Send + Sync>;

/// Decides whether an event invalidates the watched query.
pub type EventFilter = Box<dyn Fn(&DomainEvent) -> bool + Send + Sync>;

pub struct Subscription<T> {
    events: broadcast::Receiver<DomainEvent>,
    filter: EventFilter,
    fetch: SnapshotFetch<T>,
    primed: bool,
}

impl<T> Subscription<T> {
    pub fn new<P, F, Fut>(events: broadcast::Receiver<DomainEvent>, filter: P, fetch: F) -> Self
    where
        P: Fn(&DomainEvent) -> bool + Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<T>, BarberError>> + Send + 'static,
    {
        Self {
            events,
            filter: Box::new(filter),
            fetch: Box::new(move || fetch().boxed()),
            primed: false,
        }
    }

    /// Wait for the next snapshot.
    ///
    /// Returns `None` once the event bus has been dropped.
    pub async fn next(&mut self) -> Option<Result<Vec<T>, BarberError>> {
        if !self.primed {
            self.primed = true;
            return Some((self.fetch)().await);
        }

        loop {
            match self.events.recv().await {
                Ok(event) if (self.filter)(&event) => break,
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "subscription lagged, refetching snapshot");
                    break;
                }
                Err(RecvError::Closed) => return None,
            }
        }

        self.drain_pending();
        Some((self.fetch)().await)
    }

    /// Discard events already queued; the upcoming fetch covers them.
    fn drain_pending(&mut self) {
        loop {
            match self.events.try_recv() {
                Ok(_) | Err(TryRecvError::Lagged(_)) => continue,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
    }
}

impl<T> std::fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("primed", &self.primed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::events::EventBus;

    fn counting_subscription(bus: &EventBus, shop: &'static str) -> (Subscription<usize>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let sub = Subscription::new(
            bus.subscribe(),
            move |event: &DomainEvent| event.shop_id() == shop,
            move || {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                async move { Ok(vec![n]) }
            },
        );
        (sub, calls)
    }

    fn offer_created(shop: &str) -> DomainEvent {
        DomainEvent::OfferCreated {
            shop_id: shop.into(),
            offer_id: "O1".into(),
        }
    }

    #[tokio::test]
    async fn first_next_returns_initial_snapshot() {
        let bus = EventBus::new(8);
        let (mut sub, calls) = counting_subscription(&bus, "S1");

        let snapshot = sub.next().await.unwrap().unwrap();
        assert_eq!(snapshot, vec![1]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unrelated_events_are_skipped() {
        let bus = EventBus::new(8);
        let (mut sub, calls) = counting_subscription(&bus, "S1");
        sub.next().await.unwrap().unwrap();

        bus.publish(offer_created("S2"));
        bus.publish(offer_created("S1"));

        let snapshot = sub.next().await.unwrap().unwrap();
        assert_eq!(snapshot, vec![2]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn bursts_collapse_into_one_refetch() {
        let bus = EventBus::new(8);
        let (mut sub, calls) = counting_subscription(&bus, "S1");
        sub.next().await.unwrap().unwrap();

        for _ in 0..5 {
            bus.publish(offer_created("S1"));
        }

        sub.next().await.unwrap().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn lagged_receiver_refetches() {
        let bus = EventBus::new(2);
        let (mut sub, _calls) = counting_subscription(&bus, "S1");
        sub.next().await.unwrap().unwrap();

        for _ in 0..10 {
            bus.publish(offer_created("S2"));
        }

        assert!(sub.next().await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn closed_bus_ends_subscription() {
        let bus = EventBus::new(8);
        let (mut sub, _calls) = counting_subscription(&bus, "S1");
        sub.next().await.unwrap().unwrap();

        drop(bus);
        assert!(sub.next().await.is_none());
    }
}
