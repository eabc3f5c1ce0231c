//! # Supplier Return Workflow
//!
//! Reconciles a supplier return: goods leave the premises back to the
//! supplier, stock goes down, and the cached purchase shrinks.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  process(purchase, selection)                                           │
//! │       │                                                                 │
//! │       ├── validate selection ──── empty? → error, zero side effects    │
//! │       │                                                                 │
//! │       ├── gateway.record_return(purchase, items)                       │
//! │       │                                                                 │
//! │       ├── local pass ALWAYS: snapshot once, resolve + adjust(−qty)     │
//! │       │   per line, regardless of the server outcome                   │
//! │       │                                                                 │
//! │       ├── persist one ReturnRecord per line                            │
//! │       │                                                                 │
//! │       ├── cached purchase: decrement quantities, recompute total       │
//! │       │   (failures logged, never blocking)                            │
//! │       │                                                                 │
//! │       └── publish inventory-changed, ledger-changed, returns-changed   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Asymmetry
//! Unlike the customer workflow, the local adjustment here runs even when
//! the server reported success, so a handled server call plus the local pass
//! can adjust the same stock twice. The shipped back office behaves this
//! way and downstream stock counts are corrected against it, so the
//! behavior is kept as-is rather than silently changed. See DESIGN.md.
//!
//! Resolution still prefers the purchase line's own stock-record reference;
//! purchase lines almost always carry one, so name matching is rare here.

use std::sync::Arc;

use tracing::{info, warn};

use rxledger_core::validation::{validate_reference_query, validate_return_selection};
use rxledger_core::{PurchaseRecord, ReturnKind, ReturnSelection};

use crate::collaborators::{InventoryStore, PurchaseStore, ReturnLog, ReturnsGateway};
use crate::error::ReconResult;
use crate::events::{InvalidationBus, Topic};

use super::{adjust_stock_for_lines, persist_return_records, request_items, ReturnOutcome};

// =============================================================================
// Workflow
// =============================================================================

/// Orchestrates supplier-return reconciliation over injected collaborators.
pub struct SupplierReturnWorkflow {
    gateway: Arc<dyn ReturnsGateway>,
    inventory: Arc<dyn InventoryStore>,
    purchases: Arc<dyn PurchaseStore>,
    log: Arc<dyn ReturnLog>,
    bus: InvalidationBus,
}

impl SupplierReturnWorkflow {
    pub fn new(
        gateway: Arc<dyn ReturnsGateway>,
        inventory: Arc<dyn InventoryStore>,
        purchases: Arc<dyn PurchaseStore>,
        log: Arc<dyn ReturnLog>,
        bus: InvalidationBus,
    ) -> Self {
        SupplierReturnWorkflow {
            gateway,
            inventory,
            purchases,
            log,
            bus,
        }
    }

    /// Locates the originating purchase by id, then by reference-number
    /// search.
    pub async fn find_purchase(&self, query: &str) -> ReconResult<Option<PurchaseRecord>> {
        let query = validate_reference_query(query)?;

        if let Some(purchase) = self.purchases.find_by_id(&query).await? {
            return Ok(Some(purchase));
        }
        self.purchases.find_by_reference(&query).await
    }

    /// Processes a supplier return end to end.
    pub async fn process(
        &self,
        purchase: &PurchaseRecord,
        selection: &ReturnSelection,
    ) -> ReconResult<ReturnOutcome> {
        // Step 1: the only blocking validation; rejected before any I/O.
        validate_return_selection(selection)?;
        let refund = selection.refund_total();

        // Step 2: one server-side atomic attempt.
        let items = request_items(&selection.lines);
        let server_handled = match self.gateway.record_return(&purchase.id, &items).await {
            Ok(handled) => handled,
            Err(err) => {
                warn!(purchase_id = %purchase.id, error = %err, "server return call failed");
                false
            }
        };

        // Step 3: the local pass runs unconditionally here, server outcome
        // or not. See the module docs for why this asymmetry stands.
        let (adjusted_lines, skipped_lines) =
            adjust_stock_for_lines(self.inventory.as_ref(), &selection.lines, ReturnKind::Supplier)
                .await;

        // Step 4: the returns log.
        let return_ids = persist_return_records(
            self.log.as_ref(),
            ReturnKind::Supplier,
            &purchase.id,
            &selection.lines,
        )
        .await?;

        // Step 5: best-effort cache maintenance. Suppliers carry no running
        // balance in this core, so only the purchase mirror is touched.
        if let Err(err) = self.adjust_cached_purchase(&purchase.id, selection).await {
            warn!(purchase_id = %purchase.id, error = %err, "cached purchase adjustment failed; return already recorded");
        }

        // Step 6: tell dependent views to refresh.
        self.bus.publish(Topic::InventoryChanged);
        self.bus.publish(Topic::LedgerChanged);
        self.bus.publish(Topic::ReturnsChanged);

        info!(
            purchase_id = %purchase.id,
            server_handled,
            adjusted_lines,
            skipped_lines,
            refund = %refund,
            "supplier return processed"
        );

        Ok(ReturnOutcome {
            server_handled,
            adjusted_lines,
            skipped_lines,
            refund,
            return_ids,
        })
    }

    /// Decrements the cached purchase's line quantities and recomputes its
    /// total.
    async fn adjust_cached_purchase(
        &self,
        purchase_id: &str,
        selection: &ReturnSelection,
    ) -> ReconResult<()> {
        let Some(mut cached) = self.purchases.find_by_id(purchase_id).await? else {
            return Ok(());
        };

        for selected in &selection.lines {
            if let Some(line) = cached.lines.iter_mut().find(|l| l.id == selected.line_id) {
                line.quantity = (line.quantity - selected.quantity).max(0);
            }
        }
        cached.total = cached.recomputed_total();
        self.purchases.store(&cached).await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
