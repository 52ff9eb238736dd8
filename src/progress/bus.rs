// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Asynchronous progress relay.
//!
//! Fetch workers publish into an unbounded queue and never wait on
//! observer work. A single delivery worker drains the queue for the life
//! of the process and fans each message out to every currently-registered
//! subscriber, so per-artifact ordering survives end to end while
//! publishers stay decoupled from arbitrarily many, arbitrarily late
//! subscribers.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use tokio::sync::mpsc;

use super::types::ProgressMessage;
use crate::locks::{resilient_read, resilient_write};

/// How often the delivery worker re-checks for a first subscriber.
const SUBSCRIBER_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A registered observer. Called synchronously by the delivery worker;
/// a slow callback delays every other subscriber and all queued messages.
pub trait ProgressCallback: Send + Sync {
    fn on_message(&self, message: &ProgressMessage);
}

type SubscriberSet = Arc<RwLock<Vec<Arc<dyn ProgressCallback>>>>;

/// Multi-consumer progress relay.
///
/// Messages are delivered in arrival order. Delivery is held back until
/// the first subscriber registers: pods start on their own tasks and may
/// register late, and they must not miss the earliest progress events.
/// A message already dequeued is not re-queued if the subscriber set
/// later shrinks to zero.
pub struct ProgressBus {
    queue_tx: mpsc::UnboundedSender<ProgressMessage>,
    subscribers: SubscriberSet,
}

impl ProgressBus {
    /// Create the bus and start its delivery worker.
    ///
    /// The worker runs until every publisher handle is dropped; it is not
    /// restarted if it exits.
    pub fn new() -> Self {
        let (queue_tx, queue_rx) = mpsc::unbounded_channel();
        let subscribers: SubscriberSet = Arc::new(RwLock::new(Vec::new()));

        let worker_subscribers = subscribers.clone();
        tokio::spawn(async move {
            Self::delivery_loop(queue_rx, worker_subscribers).await;
        });

        Self {
            queue_tx,
            subscribers,
        }
    }

    /// Enqueue a message for asynchronous delivery.
    ///
    /// Never blocks and never fails from the caller's point of view: a
    /// send after the delivery worker has gone away is dropped with a
    /// debug log entry.
    pub fn publish(&self, message: ProgressMessage) {
        if self.queue_tx.send(message).is_err() {
            tracing::debug!("progress bus is closed; dropping message");
        }
    }

    /// Add a subscriber to the live set.
    ///
    /// Duplicates are rejected by instance identity; returns whether the
    /// set changed.
    pub fn subscribe(&self, callback: Arc<dyn ProgressCallback>) -> bool {
        let mut subs = resilient_write(&self.subscribers);
        if subs.iter().any(|existing| Arc::ptr_eq(existing, &callback)) {
            return false;
        }
        subs.push(callback);
        true
    }

    /// Remove a subscriber by instance identity; returns whether it was
    /// present.
    pub fn unsubscribe(&self, callback: &Arc<dyn ProgressCallback>) -> bool {
        let mut subs = resilient_write(&self.subscribers);
        let before = subs.len();
        subs.retain(|existing| !Arc::ptr_eq(existing, callback));
        subs.len() != before
    }

    /// Number of currently-registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        resilient_read(&self.subscribers).len()
    }

    async fn delivery_loop(
        mut queue_rx: mpsc::UnboundedReceiver<ProgressMessage>,
        subscribers: SubscriberSet,
    ) {
        loop {
            let Some(message) = queue_rx.recv().await else {
                tracing::debug!("progress queue closed; delivery worker exiting");
                break;
            };

            // Hold the message until somebody is listening. Earliest
            // messages would otherwise be lost to pods that register a
            // beat after fetching starts.
            while resilient_read(&subscribers).is_empty() {
                tokio::time::sleep(SUBSCRIBER_POLL_INTERVAL).await;
            }

            // Snapshot so concurrent subscribe/unsubscribe never affects
            // an iteration already in progress.
            let snapshot: Vec<Arc<dyn ProgressCallback>> =
                resilient_read(&subscribers).clone();
            for callback in &snapshot {
                callback.on_message(&message);
            }
        }
    }
}

impl Default for ProgressBus {
    fn default() -> Self {
        Self::new()
    }
}
