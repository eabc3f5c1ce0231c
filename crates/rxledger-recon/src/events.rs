//! # Cache Invalidation Bus
//!
//! Fire-and-forget notifications that tell dependent views their cached data
//! is stale.
//!
//! ## Topic Fan-Out
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Invalidation Bus                                    │
//! │                                                                         │
//! │  Return workflow ──publish──► InvalidationBus (broadcast)              │
//! │                                    │                                    │
//! │              ┌─────────────────────┼─────────────────────┐             │
//! │              ▼                     ▼                     ▼             │
//! │     ┌────────────────┐   ┌────────────────┐   ┌────────────────┐      │
//! │     │ Inventory view │   │ Customer ledger│   │ Returns list   │      │
//! │     │ (Inventory-    │   │ (Ledger-       │   │ (Returns-      │      │
//! │     │  Changed)      │   │  Changed)      │   │  Changed)      │      │
//! │     └────────────────┘   └────────────────┘   └────────────────┘      │
//! │                                                                         │
//! │  Semantics: fire and forget. No acknowledgement, no retry. A publish   │
//! │  with zero subscribers is fine; a lagging subscriber just misses       │
//! │  notifications and refreshes on the next one.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The bus is injected into the workflows rather than being a process-wide
//! global, so tests can subscribe and assert exactly which topics a run
//! published.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

// =============================================================================
// Topics
// =============================================================================

/// Named invalidation topics.
///
/// Each topic maps to one family of dependent views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Topic {
    /// Stock levels changed; inventory screens must refetch.
    InventoryChanged,
    /// A cached sale or customer balance changed.
    LedgerChanged,
    /// A return record was appended.
    ReturnsChanged,
}

impl Topic {
    /// The wire name of the topic, as dependent views subscribe to it.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Topic::InventoryChanged => "inventory-changed",
            Topic::LedgerChanged => "ledger-changed",
            Topic::ReturnsChanged => "returns-changed",
        }
    }
}

// =============================================================================
// Invalidation Bus
// =============================================================================

/// Default capacity of the broadcast channel.
///
/// Invalidation signals are tiny and coalescable; a slow subscriber that
/// overflows this buffer simply refreshes on its next received topic.
const DEFAULT_CAPACITY: usize = 64;

/// A broadcast channel of invalidation topics.
#[derive(Debug, Clone)]
pub struct InvalidationBus {
    sender: broadcast::Sender<Topic>,
}

impl InvalidationBus {
    /// Creates a bus with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a bus with an explicit capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        InvalidationBus { sender }
    }

    /// Publishes a topic to all current subscribers.
    ///
    /// Fire and forget: a send error only means there are no subscribers,
    /// which is not a failure.
    pub fn publish(&self, topic: Topic) {
        debug!(topic = topic.as_str(), "publishing invalidation");
        let _ = self.sender.send(topic);
    }

    /// Subscribes to all future topics.
    pub fn subscribe(&self) -> broadcast::Receiver<Topic> {
        self.sender.subscribe()
    }

    /// Number of live subscribers (for diagnostics).
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for InvalidationBus {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
