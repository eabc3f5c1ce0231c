//! # rxledger-recon: Returns Reconciliation for the Pharmacy Back Office
//!
//! Keeps three independent records consistent when goods move backward
//! through the system: inventory stock, the locally mirrored sale/purchase,
//! and the append-only returns log.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     RxLedger Reconciliation Layer                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 rxledger-recon (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────────┐ │   │
//! │  │  │  Customer   │  │  Supplier   │  │  Resolution Strategy   │ │   │
//! │  │  │  workflow   │  │  workflow   │  │  explicit ref, else    │ │   │
//! │  │  │  (+stock)   │  │  (−stock)   │  │  name match, no pend.  │ │   │
//! │  │  └──────┬──────┘  └──────┬──────┘  └─────────────────────────┘ │   │
//! │  │         │                │                                      │   │
//! │  │         ▼                ▼                                      │   │
//! │  │  ┌─────────────────────────────────────────────────────────┐   │   │
//! │  │  │ Collaborator traits: gateway, inventory, sale/purchase  │   │   │
//! │  │  │ stores, customer ledger, returns log                    │   │   │
//! │  │  └─────────────────────────────────────────────────────────┘   │   │
//! │  │                                                                 │   │
//! │  │  ┌─────────────────────────────────────────────────────────┐   │   │
//! │  │  │ InvalidationBus: inventory-changed, ledger-changed,     │   │   │
//! │  │  │ returns-changed (broadcast, fire and forget)            │   │   │
//! │  │  └─────────────────────────────────────────────────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`collaborators`] - Abstract contracts the host application implements
//! - [`workflow`] - Customer and supplier return workflows
//! - [`resolve`] - Line item → stock record resolution strategy
//! - [`events`] - Cache-invalidation broadcast bus
//! - [`error`] - Reconciliation error types
//!
//! ## Design Principles
//!
//! 1. **Server first, local fallback**: one atomic server attempt, then a
//!    best-effort local pass (the supplier flow keeps its legacy always-run
//!    local pass; see the workflow docs)
//! 2. **Independent failure isolation**: per-line failures are logged and
//!    absorbed, never aborting sibling lines or the overall return
//! 3. **Sequential awaits**: one logical task, no parallel collaborator
//!    calls, so the server-handled decision always precedes any fallback
//! 4. **Injected everything**: collaborators and the bus arrive through the
//!    constructor, so tests observe every call

// =============================================================================
// Module Declarations
// =============================================================================

pub mod collaborators;
pub mod error;
pub mod events;
pub mod resolve;
pub mod workflow;

#[cfg(test)]
pub(crate) mod testing;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use collaborators::{
    CustomerLedger, InventoryStore, PurchaseStore, ReturnItemRequest, ReturnLog, ReturnsGateway,
    SaleStore,
};
pub use error::{ReconError, ReconResult};
pub use events::{InvalidationBus, Topic};
pub use resolve::{resolve_stock_record, Resolution};
pub use workflow::{CustomerReturnWorkflow, ReturnOutcome, SupplierReturnWorkflow};
