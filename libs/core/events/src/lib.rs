//! In-process publish/subscribe event bus.
//!
//! Publishers fire named events with a JSON payload; subscribers are
//! registered at application startup and run on their own tasks. There is
//! no persistence and no retry: a slow subscriber that falls behind the
//! channel capacity loses the oldest events (logged as a warning).
//!
//! # Example
//!
//! ```
//! use event_bus::EventBus;
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let bus = EventBus::new(16);
//! let mut rx = bus.subscribe();
//!
//! bus.emit("user_registered", json!({ "user_id": 42 }));
//!
//! let event = rx.recv().await.unwrap();
//! assert_eq!(event.name, "user_registered");
//! # }
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// A named event with an arbitrary JSON payload.
#[derive(Clone, Debug, Serialize)]
pub struct DomainEvent {
    /// Event name, e.g. `"item_created"`
    pub name: String,
    /// Event payload
    pub payload: Value,
    /// When the event was emitted
    pub occurred_at: DateTime<Utc>,
}

impl DomainEvent {
    pub fn new(name: impl Into<String>, payload: Value) -> Self {
        Self {
            name: name.into(),
            payload,
            occurred_at: Utc::now(),
        }
    }
}

/// In-process event bus backed by a broadcast channel.
///
/// Cloning is cheap: clones share the same underlying channel.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    /// Create a bus that buffers up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Emit a named event to all current subscribers.
    ///
    /// Returns the number of subscribers the event was delivered to.
    /// Emitting with no subscribers is a no-op.
    pub fn emit(&self, name: impl Into<String>, payload: Value) -> usize {
        let event = DomainEvent::new(name, payload);
        debug!(event_name = %event.name, "Emitting event");
        self.tx.send(event).unwrap_or(0)
    }

    /// Subscribe to the raw event stream.
    ///
    /// Only events emitted after this call are received.
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.tx.subscribe()
    }

    /// Register a listener for a named event.
    ///
    /// Spawns a task that invokes `handler` for every matching event until
    /// the bus is dropped. Events with other names are skipped.
    pub fn on<F>(&self, event_name: &str, handler: F) -> JoinHandle<()>
    where
        F: Fn(DomainEvent) + Send + 'static,
    {
        let name = event_name.to_string();
        let mut rx = self.tx.subscribe();

        debug!(event_name = %name, "Registering event listener");
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) if event.name == name => handler(event),
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        warn!(event_name = %name, missed, "Event listener lagged, events dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_emit_and_receive() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();

        let delivered = bus.emit("thing_happened", json!({ "id": 1 }));
        assert_eq!(delivered, 1);

        let event = rx.recv().await.unwrap();
        assert_eq!(event.name, "thing_happened");
        assert_eq!(event.payload["id"], 1);
    }

    #[tokio::test]
    async fn test_emit_without_subscribers_is_noop() {
        let bus = EventBus::new(8);
        let delivered = bus.emit("nobody_listening", json!(null));
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn test_events_arrive_in_emit_order() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();

        bus.emit("first", json!(1));
        bus.emit("second", json!(2));
        bus.emit("third", json!(3));

        assert_eq!(rx.recv().await.unwrap().name, "first");
        assert_eq!(rx.recv().await.unwrap().name, "second");
        assert_eq!(rx.recv().await.unwrap().name, "third");
    }

    #[tokio::test]
    async fn test_named_listener_filters_events() {
        let bus = EventBus::new(8);
        let count = Arc::new(AtomicUsize::new(0));
        let (done_tx, mut done_rx) = mpsc::channel(4);

        let counter = Arc::clone(&count);
        bus.on("wanted", move |event| {
            counter.fetch_add(1, Ordering::SeqCst);
            done_tx.try_send(event.name).ok();
        });

        bus.emit("ignored", json!(null));
        bus.emit("wanted", json!({ "n": 1 }));
        bus.emit("ignored", json!(null));
        bus.emit("wanted", json!({ "n": 2 }));

        assert_eq!(done_rx.recv().await.unwrap(), "wanted");
        assert_eq!(done_rx.recv().await.unwrap(), "wanted");
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_subscriber_count() {
        let bus = EventBus::new(8);
        assert_eq!(bus.subscriber_count(), 0);

        let _rx1 = bus.subscribe();
        let _rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);
    }
}
