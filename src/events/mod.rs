use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Capacity of the in-process event channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Domain events emitted by the services after a successful commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Category events
    CategoryCreated(i32),
    CategoryUpdated(i32),
    CategoryDeleted(i32),

    // Supplier events
    SupplierCreated(i32),
    SupplierUpdated(i32),
    SupplierDeleted(i32),

    // Product events
    ProductCreated(i32),
    ProductUpdated(i32),
    ProductDeleted(i32),

    // Ledger events
    StockMovementRecorded {
        product_id: i32,
        quantity: i32,
        movement_type: String,
        recorded_at: DateTime<Utc>,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Create a connected sender/receiver pair with the default capacity.
pub fn channel() -> (EventSender, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    (EventSender::new(tx), rx)
}

/// Drains the event channel, logging every event. Runs until all senders
/// are dropped.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::StockMovementRecorded {
                product_id,
                quantity,
                movement_type,
                ..
            } => {
                info!(
                    product_id,
                    quantity,
                    movement_type = movement_type.as_str(),
                    "stock movement recorded"
                );
            }
            other => info!(event = ?other, "domain event"),
        }
    }

    warn!("event channel closed; event processor exiting");
}
