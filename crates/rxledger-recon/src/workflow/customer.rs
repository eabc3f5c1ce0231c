//! # Customer Return Workflow
//!
//! Reconciles a customer return: goods come back over the counter, stock
//! goes up, the cached sale shrinks, and a credit customer's running balance
//! drops by the refund.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  process(sale, selection)                                               │
//! │       │                                                                 │
//! │       ├── validate selection ──── empty? → error, zero side effects    │
//! │       │                                                                 │
//! │       ├── gateway.record_return(sale, items)                           │
//! │       │        ├── Ok(true)  → server applied stock; SKIP fallback     │
//! │       │        ├── Ok(false) → fallback pass                           │
//! │       │        └── Err       → logged, treated as "not handled"        │
//! │       │                                                                 │
//! │       ├── fallback: snapshot once, resolve + adjust(+qty) per line     │
//! │       │            (per-line failures logged, siblings continue)       │
//! │       │                                                                 │
//! │       ├── persist one ReturnRecord per line (always)                   │
//! │       │                                                                 │
//! │       ├── cached sale: decrement quantities, recompute total,          │
//! │       │   credit sale? balance −= refund, floored at 0                 │
//! │       │   (failures logged, never blocking)                            │
//! │       │                                                                 │
//! │       └── publish inventory-changed, ledger-changed, returns-changed   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The server call and the fallback pass are mutually exclusive: when the
//! server reports success it already applied the stock movement, and running
//! the fallback too would double-count it.

use std::sync::Arc;

use tracing::{info, warn};

use rxledger_core::validation::{validate_reference_query, validate_return_selection};
use rxledger_core::{Money, PaymentMethod, ReturnKind, ReturnSelection, SaleRecord};

use crate::collaborators::{CustomerLedger, InventoryStore, ReturnLog, ReturnsGateway, SaleStore};
use crate::error::ReconResult;
use crate::events::{InvalidationBus, Topic};

use super::{adjust_stock_for_lines, persist_return_records, request_items, ReturnOutcome};

// =============================================================================
// Workflow
// =============================================================================

/// Orchestrates customer-return reconciliation over injected collaborators.
pub struct CustomerReturnWorkflow {
    gateway: Arc<dyn ReturnsGateway>,
    inventory: Arc<dyn InventoryStore>,
    sales: Arc<dyn SaleStore>,
    ledger: Arc<dyn CustomerLedger>,
    log: Arc<dyn ReturnLog>,
    bus: InvalidationBus,
}

impl CustomerReturnWorkflow {
    pub fn new(
        gateway: Arc<dyn ReturnsGateway>,
        inventory: Arc<dyn InventoryStore>,
        sales: Arc<dyn SaleStore>,
        ledger: Arc<dyn CustomerLedger>,
        log: Arc<dyn ReturnLog>,
        bus: InvalidationBus,
    ) -> Self {
        CustomerReturnWorkflow {
            gateway,
            inventory,
            sales,
            ledger,
            log,
            bus,
        }
    }

    /// Locates the originating sale by id, then by reference-number search.
    pub async fn find_sale(&self, query: &str) -> ReconResult<Option<SaleRecord>> {
        let query = validate_reference_query(query)?;

        if let Some(sale) = self.sales.find_by_id(&query).await? {
            return Ok(Some(sale));
        }
        self.sales.find_by_reference(&query).await
    }

    /// Processes a customer return end to end.
    ///
    /// Once called, the sequence runs to completion; there is no mid-flight
    /// cancellation. Only an empty selection or a return-record persistence
    /// failure surface as errors.
    pub async fn process(
        &self,
        sale: &SaleRecord,
        selection: &ReturnSelection,
    ) -> ReconResult<ReturnOutcome> {
        // Step 1: the only blocking validation; rejected before any I/O.
        validate_return_selection(selection)?;
        let refund = selection.refund_total();

        // Step 2: one server-side atomic attempt. A thrown failure is
        // absorbed into "not handled" and routed to the fallback.
        let items = request_items(&selection.lines);
        let server_handled = match self.gateway.record_return(&sale.id, &items).await {
            Ok(handled) => handled,
            Err(err) => {
                warn!(sale_id = %sale.id, error = %err, "server return call failed; using local fallback");
                false
            }
        };

        // Step 3: fallback only. Running this after a server-handled return
        // would double-count the stock movement.
        let (adjusted_lines, skipped_lines) = if server_handled {
            (0, 0)
        } else {
            adjust_stock_for_lines(self.inventory.as_ref(), &selection.lines, ReturnKind::Customer)
                .await
        };

        // Step 4: the returns log, independent of how steps 2/3 went.
        let return_ids =
            persist_return_records(self.log.as_ref(), ReturnKind::Customer, &sale.id, &selection.lines)
                .await?;

        // Step 5: best-effort cache maintenance.
        if let Err(err) = self.adjust_cached_sale(&sale.id, selection, refund).await {
            warn!(sale_id = %sale.id, error = %err, "cached sale adjustment failed; return already recorded");
        }

        // Step 6: tell dependent views to refresh.
        self.bus.publish(Topic::InventoryChanged);
        self.bus.publish(Topic::LedgerChanged);
        self.bus.publish(Topic::ReturnsChanged);

        info!(
            sale_id = %sale.id,
            server_handled,
            adjusted_lines,
            skipped_lines,
            refund = %refund,
            "customer return processed"
        );

        Ok(ReturnOutcome {
            server_handled,
            adjusted_lines,
            skipped_lines,
            refund,
            return_ids,
        })
    }

    /// Decrements the cached sale's line quantities, recomputes its total,
    /// and settles a credit customer's running balance.
    async fn adjust_cached_sale(
        &self,
        sale_id: &str,
        selection: &ReturnSelection,
        refund: Money,
    ) -> ReconResult<()> {
        let Some(mut cached) = self.sales.find_by_id(sale_id).await? else {
            // Nothing mirrored locally; nothing to maintain.
            return Ok(());
        };

        for selected in &selection.lines {
            if let Some(line) = cached.lines.iter_mut().find(|l| l.id == selected.line_id) {
                line.quantity = (line.quantity - selected.quantity).max(0);
            }
        }
        cached.total = cached.recomputed_total();
        self.sales.store(&cached).await?;

        if cached.payment_method == PaymentMethod::Credit {
            if let Some(customer_id) = cached.customer_id.as_deref() {
                let balance = self.ledger.balance(customer_id).await?;
                self.ledger
                    .set_balance(customer_id, balance.sub_floor_zero(refund))
                    .await?;
            }
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReconError;
    use crate::testing::{
        StubGateway, StubInventory, StubLedger, StubReturnLog, StubSaleStore,
    };
    use chrono::Utc;
    use rxledger_core::{InventoryItem, ReturnReason, StockStatus, TradeLine};

    fn stock(id: &str, name: &str, status: StockStatus) -> InventoryItem {
        InventoryItem {
            id: id.to_string(),
            name: name.to_string(),
            status,
            quantity: 40,
            unit_cost: Money::from_rupees(40),
            unit_sale_price: Money::from_rupees(50),
        }
    }

    fn sale(payment_method: PaymentMethod, customer_id: Option<&str>) -> SaleRecord {
        SaleRecord {
            id: "sale-1".to_string(),
            reference_no: "S-0042".to_string(),
            customer_id: customer_id.map(str::to_string),
            payment_method,
            total: Money::from_rupees(330),
            lines: vec![
                TradeLine {
                    id: "l1".to_string(),
                    name: "Panadol".to_string(),
                    quantity: 5,
                    unit_price: Money::from_rupees(50),
                    stock_record_id: None,
                },
                TradeLine {
                    id: "l2".to_string(),
                    name: "Brufen".to_string(),
                    quantity: 1,
                    unit_price: Money::from_rupees(80),
                    stock_record_id: Some("stk-brufen".to_string()),
                },
            ],
            created_at: Utc::now(),
        }
    }

    fn selection_of(sale: &SaleRecord, picks: &[(&str, i64)]) -> ReturnSelection {
        let mut selection = ReturnSelection::new();
        for (line_id, qty) in picks {
            let line = sale.line(line_id).unwrap();
            selection.select(line, *qty, ReturnReason::Damaged);
        }
        selection
    }

    struct Fixture {
        gateway: Arc<StubGateway>,
        inventory: Arc<StubInventory>,
        sales: Arc<StubSaleStore>,
        ledger: Arc<StubLedger>,
        log: Arc<StubReturnLog>,
        bus: InvalidationBus,
    }

    impl Fixture {
        fn new(gateway: StubGateway, inventory: StubInventory, sale: SaleRecord) -> Self {
            Fixture {
                gateway: Arc::new(gateway),
                inventory: Arc::new(inventory),
                sales: Arc::new(StubSaleStore::with_sale(sale)),
                ledger: Arc::new(StubLedger::default()),
                log: Arc::new(StubReturnLog::default()),
                bus: InvalidationBus::new(),
            }
        }

        fn workflow(&self) -> CustomerReturnWorkflow {
            CustomerReturnWorkflow::new(
                self.gateway.clone(),
                self.inventory.clone(),
                self.sales.clone(),
                self.ledger.clone(),
                self.log.clone(),
                self.bus.clone(),
            )
        }
    }

    #[tokio::test]
    async fn test_empty_selection_rejected_with_no_side_effects() {
        let sale = sale(PaymentMethod::Cash, None);
        let fx = Fixture::new(StubGateway::declining(), StubInventory::default(), sale.clone());

        let result = fx.workflow().process(&sale, &ReturnSelection::new()).await;

        assert!(matches!(result, Err(ReconError::Validation(_))));
        assert_eq!(fx.gateway.call_count(), 0);
        assert!(fx.inventory.recorded_adjustments().is_empty());
        assert!(fx.log.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_server_handled_skips_fallback_adjustment() {
        let sale = sale(PaymentMethod::Cash, None);
        let inventory =
            StubInventory::with_snapshot(vec![stock("stk-1", "Panadol", StockStatus::Approved)]);
        let fx = Fixture::new(StubGateway::handling(), inventory, sale.clone());

        let selection = selection_of(&sale, &[("l1", 3)]);
        let outcome = fx.workflow().process(&sale, &selection).await.unwrap();

        assert!(outcome.server_handled);
        assert_eq!(outcome.adjusted_lines, 0);
        // The server applied the stock movement; the fallback must not run
        assert!(fx.inventory.recorded_adjustments().is_empty());
        // The return record is still persisted
        assert_eq!(fx.log.recorded().len(), 1);
    }

    #[tokio::test]
    async fn test_gateway_failure_routes_to_fallback() {
        let sale = sale(PaymentMethod::Cash, None);
        let inventory =
            StubInventory::with_snapshot(vec![stock("stk-1", "Panadol", StockStatus::Approved)]);
        let fx = Fixture::new(StubGateway::failing(), inventory, sale.clone());

        let selection = selection_of(&sale, &[("l1", 3)]);
        let outcome = fx.workflow().process(&sale, &selection).await.unwrap();

        assert!(!outcome.server_handled);
        assert_eq!(outcome.adjusted_lines, 1);
        // Customer returns increase stock
        assert_eq!(
            fx.inventory.recorded_adjustments(),
            vec![("stk-1".to_string(), 3)]
        );
    }

    #[tokio::test]
    async fn test_explicit_stock_reference_preferred_over_name_match() {
        let sale = sale(PaymentMethod::Cash, None);
        // Snapshot has a same-named record under a different id; the line's
        // explicit reference must win
        let inventory = StubInventory::with_snapshot(vec![stock(
            "stk-other",
            "Brufen",
            StockStatus::Approved,
        )]);
        let fx = Fixture::new(StubGateway::declining(), inventory, sale.clone());

        let selection = selection_of(&sale, &[("l2", 1)]);
        fx.workflow().process(&sale, &selection).await.unwrap();

        assert_eq!(
            fx.inventory.recorded_adjustments(),
            vec![("stk-brufen".to_string(), 1)]
        );
    }

    #[tokio::test]
    async fn test_pending_record_never_adjusted_by_name_match() {
        let sale = sale(PaymentMethod::Cash, None);
        let inventory =
            StubInventory::with_snapshot(vec![stock("stk-1", "Panadol", StockStatus::Pending)]);
        let fx = Fixture::new(StubGateway::declining(), inventory, sale.clone());

        let selection = selection_of(&sale, &[("l1", 2)]);
        let outcome = fx.workflow().process(&sale, &selection).await.unwrap();

        assert_eq!(outcome.adjusted_lines, 0);
        assert_eq!(outcome.skipped_lines, 1);
        assert!(fx.inventory.recorded_adjustments().is_empty());
        // The skip does not block the rest of the return
        assert_eq!(fx.log.recorded().len(), 1);
    }

    #[tokio::test]
    async fn test_per_line_failure_does_not_abort_siblings() {
        let sale = sale(PaymentMethod::Cash, None);
        let mut inventory =
            StubInventory::with_snapshot(vec![stock("stk-1", "Panadol", StockStatus::Approved)]);
        inventory.fail_ids.insert("stk-1".to_string());
        let fx = Fixture::new(StubGateway::declining(), inventory, sale.clone());

        let selection = selection_of(&sale, &[("l1", 2), ("l2", 1)]);
        let outcome = fx.workflow().process(&sale, &selection).await.unwrap();

        // l1's adjustment failed, l2's (explicit ref) went through
        assert_eq!(outcome.adjusted_lines, 1);
        assert_eq!(outcome.skipped_lines, 1);
        assert_eq!(fx.inventory.recorded_adjustments().len(), 2);
        // Both lines still get return records
        assert_eq!(fx.log.recorded().len(), 2);
    }

    #[tokio::test]
    async fn test_snapshot_fetch_failure_skips_pass_but_completes_return() {
        let sale = sale(PaymentMethod::Cash, None);
        let mut inventory = StubInventory::default();
        inventory.fail_fetch = true;
        let fx = Fixture::new(StubGateway::declining(), inventory, sale.clone());

        let selection = selection_of(&sale, &[("l1", 2)]);
        let outcome = fx.workflow().process(&sale, &selection).await.unwrap();

        assert_eq!(outcome.adjusted_lines, 0);
        assert_eq!(outcome.skipped_lines, 1);
        assert_eq!(fx.log.recorded().len(), 1);
    }

    #[tokio::test]
    async fn test_cached_sale_decremented_and_total_recomputed() {
        let sale = sale(PaymentMethod::Cash, None);
        let fx = Fixture::new(StubGateway::handling(), StubInventory::default(), sale.clone());

        let selection = selection_of(&sale, &[("l1", 3)]);
        fx.workflow().process(&sale, &selection).await.unwrap();

        let cached = fx.sales.get("sale-1").unwrap();
        assert_eq!(cached.line("l1").unwrap().quantity, 2);
        // 2 × Rs 50 + 1 × Rs 80
        assert_eq!(cached.total, Money::from_rupees(180));
    }

    #[tokio::test]
    async fn test_credit_sale_decrements_balance_floored_at_zero() {
        let sale = sale(PaymentMethod::Credit, Some("cust-1"));
        let fx = Fixture::new(StubGateway::handling(), StubInventory::default(), sale.clone());
        // Balance 100, refund 150: must land on exactly 0, never -50
        fx.ledger
            .balances
            .lock()
            .unwrap()
            .insert("cust-1".to_string(), Money::from_rupees(100));

        let selection = selection_of(&sale, &[("l1", 3)]); // refund = 150
        let outcome = fx.workflow().process(&sale, &selection).await.unwrap();

        assert_eq!(outcome.refund, Money::from_rupees(150));
        assert_eq!(fx.ledger.balance_of("cust-1"), Some(Money::zero()));
    }

    #[tokio::test]
    async fn test_cash_sale_leaves_ledger_untouched() {
        let sale = sale(PaymentMethod::Cash, Some("cust-1"));
        let fx = Fixture::new(StubGateway::handling(), StubInventory::default(), sale.clone());

        let selection = selection_of(&sale, &[("l1", 1)]);
        fx.workflow().process(&sale, &selection).await.unwrap();

        assert_eq!(fx.ledger.write_count(), 0);
    }

    #[tokio::test]
    async fn test_persistence_failure_surfaces() {
        let sale = sale(PaymentMethod::Cash, None);
        let mut fx = Fixture::new(StubGateway::handling(), StubInventory::default(), sale.clone());
        fx.log = Arc::new(StubReturnLog::failing());

        let selection = selection_of(&sale, &[("l1", 1)]);
        let result = fx.workflow().process(&sale, &selection).await;

        assert!(matches!(result, Err(ReconError::Persistence { .. })));
    }

    #[tokio::test]
    async fn test_all_three_topics_published() {
        let sale = sale(PaymentMethod::Cash, None);
        let fx = Fixture::new(StubGateway::handling(), StubInventory::default(), sale.clone());
        let mut rx = fx.bus.subscribe();

        let selection = selection_of(&sale, &[("l1", 1)]);
        fx.workflow().process(&sale, &selection).await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), Topic::InventoryChanged);
        assert_eq!(rx.recv().await.unwrap(), Topic::LedgerChanged);
        assert_eq!(rx.recv().await.unwrap(), Topic::ReturnsChanged);
    }

    #[tokio::test]
    async fn test_find_sale_by_id_then_reference() {
        let sale = sale(PaymentMethod::Cash, None);
        let fx = Fixture::new(StubGateway::declining(), StubInventory::default(), sale.clone());
        let workflow = fx.workflow();

        let by_id = workflow.find_sale("sale-1").await.unwrap();
        assert_eq!(by_id.unwrap().id, "sale-1");

        let by_reference = workflow.find_sale(" S-0042 ").await.unwrap();
        assert_eq!(by_reference.unwrap().id, "sale-1");

        assert!(workflow.find_sale("S-9999").await.unwrap().is_none());
        assert!(workflow.find_sale("   ").await.is_err());
    }

    #[tokio::test]
    async fn test_one_return_record_per_line_with_line_refund() {
        let sale = sale(PaymentMethod::Cash, None);
        let fx = Fixture::new(StubGateway::handling(), StubInventory::default(), sale.clone());

        let selection = selection_of(&sale, &[("l1", 2), ("l2", 1)]);
        let outcome = fx.workflow().process(&sale, &selection).await.unwrap();

        let records = fx.log.recorded();
        assert_eq!(records.len(), 2);
        assert_eq!(outcome.return_ids.len(), 2);
        assert!(records.iter().all(|r| r.kind == ReturnKind::Customer));
        assert!(records.iter().all(|r| r.source_id == "sale-1"));

        let refunds: Vec<Money> = records.iter().map(|r| r.refund).collect();
        assert!(refunds.contains(&Money::from_rupees(100))); // 2 × 50
        assert!(refunds.contains(&Money::from_rupees(80))); // 1 × 80
    }
}
