//! # Test Stubs
//!
//! In-memory stub collaborators used by the workflow unit tests. Each stub
//! records the calls made against it behind a `Mutex`, so a test can assert
//! not just the outcome of a run but exactly which collaborators it touched.
//!
//! Compiled only for tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use rxledger_core::{
    InventoryItem, Money, PurchaseRecord, ReturnRecord, SaleRecord,
};

use crate::collaborators::{
    CustomerLedger, InventoryStore, PurchaseStore, ReturnLog, ReturnsGateway, SaleStore,
};
use crate::error::{ReconError, ReconResult};

// =============================================================================
// Gateway Stub
// =============================================================================

/// Scripted server-side return gateway.
#[derive(Debug, Default)]
pub struct StubGateway {
    /// What `record_return` reports: `Ok(handled)` or an error.
    pub handled: bool,
    pub fail: bool,
    /// Recorded (source_id, item count) per call.
    pub calls: Mutex<Vec<(String, usize)>>,
}

impl StubGateway {
    pub fn handling() -> Self {
        StubGateway {
            handled: true,
            ..Default::default()
        }
    }

    pub fn declining() -> Self {
        StubGateway::default()
    }

    pub fn failing() -> Self {
        StubGateway {
            fail: true,
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ReturnsGateway for StubGateway {
    async fn record_return(
        &self,
        source_id: &str,
        items: &[crate::collaborators::ReturnItemRequest],
    ) -> ReconResult<bool> {
        self.calls
            .lock()
            .unwrap()
            .push((source_id.to_string(), items.len()));

        if self.fail {
            return Err(ReconError::Gateway {
                reason: "server unreachable".to_string(),
            });
        }
        Ok(self.handled)
    }
}

// =============================================================================
// Inventory Stub
// =============================================================================

/// Scripted inventory store with a fixed snapshot.
#[derive(Debug, Default)]
pub struct StubInventory {
    pub snapshot: Vec<InventoryItem>,
    pub fail_fetch: bool,
    /// Stock-record ids whose adjustment should fail.
    pub fail_ids: HashSet<String>,
    /// Recorded (stock_record_id, delta) per successful-or-not call.
    pub adjustments: Mutex<Vec<(String, i64)>>,
}

impl StubInventory {
    pub fn with_snapshot(snapshot: Vec<InventoryItem>) -> Self {
        StubInventory {
            snapshot,
            ..Default::default()
        }
    }

    pub fn recorded_adjustments(&self) -> Vec<(String, i64)> {
        self.adjustments.lock().unwrap().clone()
    }
}

#[async_trait]
impl InventoryStore for StubInventory {
    async fn fetch_snapshot(&self) -> ReconResult<Vec<InventoryItem>> {
        if self.fail_fetch {
            return Err(ReconError::Inventory {
                stock_record_id: "<snapshot>".to_string(),
                reason: "store offline".to_string(),
            });
        }
        Ok(self.snapshot.clone())
    }

    async fn adjust_quantity(&self, stock_record_id: &str, delta: i64) -> ReconResult<()> {
        self.adjustments
            .lock()
            .unwrap()
            .push((stock_record_id.to_string(), delta));

        if self.fail_ids.contains(stock_record_id) {
            return Err(ReconError::Inventory {
                stock_record_id: stock_record_id.to_string(),
                reason: "write rejected".to_string(),
            });
        }
        Ok(())
    }
}

// =============================================================================
// Sale / Purchase Store Stubs
// =============================================================================

/// In-memory mirror of cached sales.
#[derive(Debug, Default)]
pub struct StubSaleStore {
    pub sales: Mutex<HashMap<String, SaleRecord>>,
}

impl StubSaleStore {
    pub fn with_sale(sale: SaleRecord) -> Self {
        let store = StubSaleStore::default();
        store.sales.lock().unwrap().insert(sale.id.clone(), sale);
        store
    }

    pub fn get(&self, id: &str) -> Option<SaleRecord> {
        self.sales.lock().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl SaleStore for StubSaleStore {
    async fn find_by_id(&self, id: &str) -> ReconResult<Option<SaleRecord>> {
        Ok(self.sales.lock().unwrap().get(id).cloned())
    }

    async fn find_by_reference(&self, reference: &str) -> ReconResult<Option<SaleRecord>> {
        Ok(self
            .sales
            .lock()
            .unwrap()
            .values()
            .find(|s| s.reference_no == reference)
            .cloned())
    }

    async fn store(&self, sale: &SaleRecord) -> ReconResult<()> {
        self.sales
            .lock()
            .unwrap()
            .insert(sale.id.clone(), sale.clone());
        Ok(())
    }
}

/// In-memory mirror of cached purchases.
#[derive(Debug, Default)]
pub struct StubPurchaseStore {
    pub purchases: Mutex<HashMap<String, PurchaseRecord>>,
}

impl StubPurchaseStore {
    pub fn with_purchase(purchase: PurchaseRecord) -> Self {
        let store = StubPurchaseStore::default();
        store
            .purchases
            .lock()
            .unwrap()
            .insert(purchase.id.clone(), purchase);
        store
    }

    pub fn get(&self, id: &str) -> Option<PurchaseRecord> {
        self.purchases.lock().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl PurchaseStore for StubPurchaseStore {
    async fn find_by_id(&self, id: &str) -> ReconResult<Option<PurchaseRecord>> {
        Ok(self.purchases.lock().unwrap().get(id).cloned())
    }

    async fn find_by_reference(&self, reference: &str) -> ReconResult<Option<PurchaseRecord>> {
        Ok(self
            .purchases
            .lock()
            .unwrap()
            .values()
            .find(|p| p.reference_no == reference)
            .cloned())
    }

    async fn store(&self, purchase: &PurchaseRecord) -> ReconResult<()> {
        self.purchases
            .lock()
            .unwrap()
            .insert(purchase.id.clone(), purchase.clone());
        Ok(())
    }
}

// =============================================================================
// Ledger Stub
// =============================================================================

/// In-memory customer running balances.
#[derive(Debug, Default)]
pub struct StubLedger {
    pub balances: Mutex<HashMap<String, Money>>,
    /// Recorded set_balance calls.
    pub writes: Mutex<Vec<(String, Money)>>,
}

impl StubLedger {
    pub fn with_balance(customer_id: &str, balance: Money) -> Self {
        let ledger = StubLedger::default();
        ledger
            .balances
            .lock()
            .unwrap()
            .insert(customer_id.to_string(), balance);
        ledger
    }

    pub fn balance_of(&self, customer_id: &str) -> Option<Money> {
        self.balances.lock().unwrap().get(customer_id).copied()
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }
}

#[async_trait]
impl CustomerLedger for StubLedger {
    async fn balance(&self, customer_id: &str) -> ReconResult<Money> {
        Ok(self
            .balances
            .lock()
            .unwrap()
            .get(customer_id)
            .copied()
            .unwrap_or_else(Money::zero))
    }

    async fn set_balance(&self, customer_id: &str, balance: Money) -> ReconResult<()> {
        self.writes
            .lock()
            .unwrap()
            .push((customer_id.to_string(), balance));
        self.balances
            .lock()
            .unwrap()
            .insert(customer_id.to_string(), balance);
        Ok(())
    }
}

// =============================================================================
// Return Log Stub
// =============================================================================

/// In-memory append-only returns log.
#[derive(Debug, Default)]
pub struct StubReturnLog {
    pub fail: bool,
    pub records: Mutex<Vec<ReturnRecord>>,
}

impl StubReturnLog {
    pub fn failing() -> Self {
        StubReturnLog {
            fail: true,
            ..Default::default()
        }
    }

    pub fn recorded(&self) -> Vec<ReturnRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReturnLog for StubReturnLog {
    async fn persist(&self, record: &ReturnRecord) -> ReconResult<()> {
        if self.fail {
            return Err(ReconError::Persistence {
                reason: "log unavailable".to_string(),
            });
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}
