//! # Return Workflows
//!
//! The customer-return and supplier-return reconciliation workflows, plus
//! the pieces they share: the outcome summary, the fallback stock-adjustment
//! pass, and return-record persistence.
//!
//! ## Shared Step Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Validate selection          (blocking; no side effects on reject)  │
//! │  2. Server-side return call     (one shot; failure → "not handled")    │
//! │  3. Local stock adjustment      (customer: only if not handled;        │
//! │                                  supplier: always — see supplier.rs)   │
//! │  4. Persist return records      (one per returned line; hard failure)  │
//! │  5. Cached record adjustment    (absorbed on failure)                  │
//! │  6. Publish invalidations       (fire and forget)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every await happens sequentially on one logical task. A crash between
//! steps 3 and 4 can leave stock adjusted with no return record; that
//! at-least-once exposure is accepted, not masked.

mod customer;
mod supplier;

pub use customer::CustomerReturnWorkflow;
pub use supplier::SupplierReturnWorkflow;

use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use rxledger_core::refund::SelectedLine;
use rxledger_core::{Money, ReturnKind, ReturnRecord};

use crate::collaborators::{InventoryStore, ReturnItemRequest, ReturnLog};
use crate::error::ReconResult;
use crate::resolve::resolve_stock_record;

// =============================================================================
// Outcome
// =============================================================================

/// Summary of one reconciliation run.
///
/// A run that reaches this struct is "processed" even when some per-line
/// adjustment was absorbed; `adjusted_lines`/`skipped_lines` expose how much
/// of the fallback pass actually landed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnOutcome {
    /// Whether the server applied the return atomically.
    pub server_handled: bool,
    /// Lines whose local stock adjustment succeeded.
    pub adjusted_lines: usize,
    /// Lines skipped by the fallback pass (unresolved or failed adjustment).
    pub skipped_lines: usize,
    /// The refund/credit amount of the run.
    pub refund: Money,
    /// Ids of the persisted return records, one per returned line.
    pub return_ids: Vec<String>,
}

// =============================================================================
// Shared Steps
// =============================================================================

/// Builds the server-side request lines from a selection.
pub(crate) fn request_items(lines: &[SelectedLine]) -> Vec<ReturnItemRequest> {
    lines
        .iter()
        .map(|l| ReturnItemRequest {
            line_id: l.line_id.clone(),
            quantity: l.quantity,
            reason: l.reason,
        })
        .collect()
}

/// The local stock-adjustment pass.
///
/// Fetches the inventory snapshot once, then resolves and adjusts each line
/// independently. Every failure in here is absorbed and logged; one bad line
/// never aborts its siblings, and a failed snapshot fetch just skips the
/// whole pass.
///
/// Returns `(adjusted, skipped)` line counts.
pub(crate) async fn adjust_stock_for_lines(
    inventory: &dyn InventoryStore,
    lines: &[SelectedLine],
    kind: ReturnKind,
) -> (usize, usize) {
    let snapshot = match inventory.fetch_snapshot().await {
        Ok(snapshot) => snapshot,
        Err(err) => {
            error!(error = %err, "inventory snapshot fetch failed; skipping stock adjustments");
            return (0, lines.len());
        }
    };

    let mut adjusted = 0;
    let mut skipped = 0;

    for line in lines {
        let resolution =
            resolve_stock_record(line.stock_record_id.as_deref(), &line.name, &snapshot);

        let stock_record_id = match resolution.stock_record_id() {
            Some(id) => id.to_string(),
            None => {
                warn!(
                    line_id = %line.line_id,
                    name = %line.name,
                    "no stock record resolves; adjustment skipped"
                );
                skipped += 1;
                continue;
            }
        };

        // Customer returns put goods back on the shelf; supplier returns
        // send them out the door.
        let delta = match kind {
            ReturnKind::Customer => line.quantity,
            ReturnKind::Supplier => -line.quantity,
        };

        match inventory.adjust_quantity(&stock_record_id, delta).await {
            Ok(()) => adjusted += 1,
            Err(err) => {
                error!(
                    line_id = %line.line_id,
                    stock_record_id = %stock_record_id,
                    delta,
                    error = %err,
                    "stock adjustment failed; continuing with remaining lines"
                );
                skipped += 1;
            }
        }
    }

    (adjusted, skipped)
}

/// Persists one return record per returned line.
///
/// Runs after the inventory step, always, regardless of how the server call
/// or the fallback pass went. A persistence failure is the one hard
/// post-validation failure of a run.
pub(crate) async fn persist_return_records(
    log: &dyn ReturnLog,
    kind: ReturnKind,
    source_id: &str,
    lines: &[SelectedLine],
) -> ReconResult<Vec<String>> {
    let mut return_ids = Vec::with_capacity(lines.len());

    for line in lines {
        let record = ReturnRecord::for_line(kind, source_id, line.to_entry());
        log.persist(&record).await?;
        return_ids.push(record.id);
    }

    Ok(return_ids)
}
