//! # Refund Calculator
//!
//! Builds the per-line return selection against an originating sale or
//! purchase and computes the refund/credit amount.
//!
//! ## Selection Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Originating record lines                                               │
//! │  ┌──────────────────────────────┐                                       │
//! │  │ l1  Panadol   qty 5  Rs 50   │──select(l1, 3, Damaged)──┐            │
//! │  │ l2  Brufen    qty 2  Rs 80   │                          ▼            │
//! │  └──────────────────────────────┘        ReturnSelection               │
//! │                                          ┌────────────────────────┐    │
//! │                                          │ l1  qty 3  Rs 50       │    │
//! │                                          └────────────────────────┘    │
//! │                                                   │                     │
//! │                                                   ▼                     │
//! │                                          refund_total() = Rs 150        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The selection clamps each quantity to the originally transacted quantity.
//! That bound lives here, at selection time; the reconciliation workflows do
//! not re-validate it against the server.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{ReturnEntry, ReturnReason, TradeLine};

// =============================================================================
// Selected Line
// =============================================================================

/// One line of an originating record with a requested return quantity.
///
/// The unit price is frozen from the original trade line, so the refund is
/// always computed at the price the goods actually moved at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SelectedLine {
    /// Line id on the originating record.
    pub line_id: String,
    /// Item name (frozen from the trade line).
    pub name: String,
    /// Requested return quantity, clamped to the transacted quantity.
    pub quantity: i64,
    /// Unit price at transaction time.
    pub unit_price: Money,
    /// Explicit stock-record reference carried over from the trade line.
    pub stock_record_id: Option<String>,
    pub reason: ReturnReason,
}

impl SelectedLine {
    /// The credit this line contributes to the refund.
    #[inline]
    pub fn amount(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// Converts to the entry stored on a return record.
    pub fn to_entry(&self) -> ReturnEntry {
        ReturnEntry {
            name: self.name.clone(),
            quantity: self.quantity,
            unit_price: self.unit_price,
            reason: self.reason,
        }
    }
}

// =============================================================================
// Return Selection
// =============================================================================

/// The set of lines selected for return, with quantities and reasons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReturnSelection {
    pub lines: Vec<SelectedLine>,
}

impl ReturnSelection {
    /// Creates an empty selection.
    pub fn new() -> Self {
        ReturnSelection { lines: Vec::new() }
    }

    /// Selects a quantity of an originating line for return.
    ///
    /// ## Behavior
    /// - Quantities above the transacted quantity are clamped down to it
    /// - Negative quantities are clamped to zero
    /// - Re-selecting a line replaces its previous quantity and reason
    /// - Selecting zero removes the line from the selection
    pub fn select(&mut self, line: &TradeLine, quantity: i64, reason: ReturnReason) {
        let quantity = quantity.clamp(0, line.quantity);

        if quantity == 0 {
            self.lines.retain(|l| l.line_id != line.id);
            return;
        }

        if let Some(existing) = self.lines.iter_mut().find(|l| l.line_id == line.id) {
            existing.quantity = quantity;
            existing.reason = reason;
            return;
        }

        self.lines.push(SelectedLine {
            line_id: line.id.clone(),
            name: line.name.clone(),
            quantity,
            unit_price: line.unit_price,
            stock_record_id: line.stock_record_id.clone(),
            reason,
        });
    }

    /// The refund/credit amount: Σ return quantity × original unit price.
    pub fn refund_total(&self) -> Money {
        self.lines.iter().map(|l| l.amount()).sum()
    }

    /// Whether any line has a positive return quantity.
    ///
    /// A refund of zero disables the "process return" action; the workflows
    /// also reject empty selections before any side effect.
    pub fn has_selection(&self) -> bool {
        self.lines.iter().any(|l| l.quantity > 0)
    }

    /// Whether the selection is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
