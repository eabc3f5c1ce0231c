//! # Inventory Resolution Strategy
//!
//! Maps a transacted line item to the concrete stock record a return should
//! mutate.
//!
//! ## Priority Chain
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  resolve_stock_record(explicit_ref, name, snapshot)                     │
//! │       │                                                                 │
//! │       ├── 1. Explicit stock-record reference on the original line?     │
//! │       │       └── YES → Resolution::Explicit(id)   (no matching at all) │
//! │       │                                                                 │
//! │       ├── 2. Case-insensitive exact name match in the snapshot,        │
//! │       │      skipping records with status = pending?                   │
//! │       │       └── YES → Resolution::ByName(id)                         │
//! │       │                                                                 │
//! │       └── 3. Resolution::Unresolved                                    │
//! │              └── caller logs and skips the line; no queue, no retry    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pending stock records represent goods not yet approved into usable
//! inventory; adjusting them would corrupt the approval workflow, so
//! name-match resolution never selects them. An explicit reference is
//! trusted as-is: the line was filled from that exact record.

use rxledger_core::InventoryItem;

// =============================================================================
// Resolution
// =============================================================================

/// The outcome of resolving a line item against the inventory snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The original line carried an explicit stock-record reference.
    Explicit(String),
    /// Resolved by case-insensitive exact name match.
    ByName(String),
    /// No stock record resolves; the adjustment for this line is skipped.
    Unresolved,
}

impl Resolution {
    /// The resolved stock-record id, if any.
    pub fn stock_record_id(&self) -> Option<&str> {
        match self {
            Resolution::Explicit(id) | Resolution::ByName(id) => Some(id),
            Resolution::Unresolved => None,
        }
    }
}

/// Resolves a line item to a concrete stock record.
///
/// `explicit_ref` is the stock-record reference captured on the original
/// sale/purchase line, when present. It always wins; the snapshot is only
/// consulted for the name-match fallback.
pub fn resolve_stock_record(
    explicit_ref: Option<&str>,
    name: &str,
    snapshot: &[InventoryItem],
) -> Resolution {
    if let Some(id) = explicit_ref {
        return Resolution::Explicit(id.to_string());
    }

    let wanted = name.trim().to_lowercase();
    let matched = snapshot
        .iter()
        .filter(|item| item.is_adjustable())
        .find(|item| item.name.trim().to_lowercase() == wanted);

    match matched {
        Some(item) => Resolution::ByName(item.id.clone()),
        None => Resolution::Unresolved,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rxledger_core::{Money, StockStatus};

    fn item(id: &str, name: &str, status: StockStatus) -> InventoryItem {
        InventoryItem {
            id: id.to_string(),
            name: name.to_string(),
            status,
            quantity: 40,
            unit_cost: Money::from_rupees(10),
            unit_sale_price: Money::from_rupees(12),
        }
    }

    #[test]
    fn test_explicit_reference_always_wins() {
        // The snapshot even has a name match for a different record; the
        // explicit reference must still be chosen.
        let snapshot = vec![item("stk-2", "Panadol", StockStatus::Approved)];

        let resolution = resolve_stock_record(Some("stk-9"), "Panadol", &snapshot);
        assert_eq!(resolution, Resolution::Explicit("stk-9".to_string()));
        assert_eq!(resolution.stock_record_id(), Some("stk-9"));
    }

    #[test]
    fn test_name_match_case_insensitive() {
        let snapshot = vec![
            item("stk-1", "Brufen", StockStatus::Approved),
            item("stk-2", "Panadol Extra", StockStatus::Approved),
        ];

        let resolution = resolve_stock_record(None, "panadol extra", &snapshot);
        assert_eq!(resolution, Resolution::ByName("stk-2".to_string()));
    }

    #[test]
    fn test_pending_records_never_match() {
        let snapshot = vec![item("stk-1", "Panadol", StockStatus::Pending)];

        let resolution = resolve_stock_record(None, "Panadol", &snapshot);
        assert_eq!(resolution, Resolution::Unresolved);
        assert_eq!(resolution.stock_record_id(), None);
    }

    #[test]
    fn test_pending_skipped_in_favor_of_approved() {
        // A pending record earlier in the snapshot must not shadow an
        // approved record with the same name.
        let snapshot = vec![
            item("stk-1", "Panadol", StockStatus::Pending),
            item("stk-2", "Panadol", StockStatus::Approved),
        ];

        let resolution = resolve_stock_record(None, "Panadol", &snapshot);
        assert_eq!(resolution, Resolution::ByName("stk-2".to_string()));
    }

    #[test]
    fn test_no_match_is_unresolved() {
        let snapshot = vec![item("stk-1", "Brufen", StockStatus::Approved)];

        let resolution = resolve_stock_record(None, "Panadol", &snapshot);
        assert_eq!(resolution, Resolution::Unresolved);
    }

    #[test]
    fn test_whitespace_trimmed_on_both_sides() {
        let snapshot = vec![item("stk-1", " Panadol ", StockStatus::Approved)];

        let resolution = resolve_stock_record(None, "panadol", &snapshot);
        assert_eq!(resolution, Resolution::ByName("stk-1".to_string()));
    }
}
