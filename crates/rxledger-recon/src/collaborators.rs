//! # Collaborator Contracts
//!
//! Abstract contracts for everything the reconciliation workflows talk to.
//! The host application implements these over its actual storage and
//! transport; the workflows only ever see `Arc<dyn Trait>`.
//!
//! ## Contract Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Collaborator Contracts                               │
//! │                                                                         │
//! │  ReturnsGateway ──── record_return()        server-side atomic attempt │
//! │  InventoryStore ──── fetch_snapshot()       read-only stock list       │
//! │                 ──── adjust_quantity()      signed per-record delta    │
//! │  SaleStore ───────── find/store             locally mirrored sales     │
//! │  PurchaseStore ───── find/store             locally mirrored purchases │
//! │  CustomerLedger ──── balance/set_balance    credit running balances    │
//! │  ReturnLog ───────── persist()              append-only returns log    │
//! │                                                                         │
//! │  One trait per concern: a test can stub exactly the calls it wants to  │
//! │  observe, and a host can back each concern with a different store.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every method suspends at an I/O boundary; the workflows await them
//! sequentially, never in parallel, so the server-handled decision is always
//! made before any fallback mutation begins.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use rxledger_core::{
    InventoryItem, Money, PurchaseRecord, ReturnReason, ReturnRecord, SaleRecord,
};

use crate::error::ReconResult;

// =============================================================================
// Returns Gateway
// =============================================================================

/// One line of a server-side return request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnItemRequest {
    /// Line id on the originating record.
    pub line_id: String,
    pub quantity: i64,
    pub reason: ReturnReason,
}

/// The server-side atomic return attempt.
#[async_trait]
pub trait ReturnsGateway: Send + Sync {
    /// Asks the server to apply the whole return in one shot.
    ///
    /// Returns `Ok(true)` when the server applied it (including stock),
    /// `Ok(false)` when it declined. Failure must be reported as `false` or
    /// an error, never silently assumed successful.
    async fn record_return(
        &self,
        source_id: &str,
        items: &[ReturnItemRequest],
    ) -> ReconResult<bool>;
}

// =============================================================================
// Inventory Store
// =============================================================================

/// Read/adjust access to the stock records.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Fetches the current inventory snapshot, including pending records.
    ///
    /// Read once per reconciliation run and not re-validated against
    /// concurrent writers.
    async fn fetch_snapshot(&self) -> ReconResult<Vec<InventoryItem>>;

    /// Applies a signed quantity delta to a single stock record.
    ///
    /// Positive deltas restock (customer returns), negative deltas remove
    /// (supplier returns). May fail per call.
    async fn adjust_quantity(&self, stock_record_id: &str, delta: i64) -> ReconResult<()>;
}

// =============================================================================
// Sale / Purchase Stores
// =============================================================================

/// Read/write repository over the locally mirrored sales.
#[async_trait]
pub trait SaleStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> ReconResult<Option<SaleRecord>>;

    /// Lookup by human-readable reference number (the search screen).
    async fn find_by_reference(&self, reference: &str) -> ReconResult<Option<SaleRecord>>;

    /// Writes an adjusted mirror back (decremented quantities, recomputed
    /// total).
    async fn store(&self, sale: &SaleRecord) -> ReconResult<()>;
}

/// Read/write repository over the locally mirrored purchases.
#[async_trait]
pub trait PurchaseStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> ReconResult<Option<PurchaseRecord>>;

    /// Lookup by human-readable reference number (the search screen).
    async fn find_by_reference(&self, reference: &str) -> ReconResult<Option<PurchaseRecord>>;

    /// Writes an adjusted mirror back.
    async fn store(&self, purchase: &PurchaseRecord) -> ReconResult<()>;
}

// =============================================================================
// Customer Ledger
// =============================================================================

/// Running balances of credit customers.
#[async_trait]
pub trait CustomerLedger: Send + Sync {
    /// Current running balance of a customer.
    async fn balance(&self, customer_id: &str) -> ReconResult<Money>;

    /// Overwrites a customer's running balance.
    async fn set_balance(&self, customer_id: &str, balance: Money) -> ReconResult<()>;
}

// =============================================================================
// Return Log
// =============================================================================

/// The append-only returns log.
#[async_trait]
pub trait ReturnLog: Send + Sync {
    /// Appends a return record. Records are never mutated afterward.
    async fn persist(&self, record: &ReturnRecord) -> ReconResult<()>;
}

// =============================================================================
// Unit Tests
// =============================================================================
