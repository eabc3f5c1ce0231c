//! # Domain Types
//!
//! Core domain types shared by the invoice calculator and the returns
//! reconciliation layer.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  InvoiceLine    │   │  SaleRecord /   │   │  InventoryItem  │       │
//! │  │  ─────────────  │   │  PurchaseRecord │   │  ─────────────  │       │
//! │  │  quantity       │   │  ─────────────  │   │  id (UUID)      │       │
//! │  │  buy_price      │   │  id (UUID)      │   │  name           │       │
//! │  │  discount       │   │  reference_no   │   │  status         │       │
//! │  │  sales_tax      │   │  payment_method │   │  quantity       │       │
//! │  │  line_taxes[]   │   │  lines[]        │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                             │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Rate        │   │  ReturnRecord   │   │  FinanceEntry   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  kind           │   │  kind           │       │
//! │  │  500 = 5.00%    │   │  refund         │   │  category       │       │
//! │  └─────────────────┘   │  entries[]      │   │  amount         │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! `SaleRecord`/`PurchaseRecord` are frozen at return time: the return
//! workflows read them, never the live catalog, so a price change between
//! sale and return cannot change the refund.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;

// =============================================================================
// Rate
// =============================================================================

/// A percentage rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 500 bps = 5.00% (typical sales tax), 1000 bps = 10% discount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Creates a rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        Rate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

// =============================================================================
// Tax Charge
// =============================================================================

/// How a tax amount is computed: as a percentage of some base, or as a flat
/// rupee amount.
///
/// Used for both the per-line sales tax and the invoice-level additional
/// taxes; only the base they apply to differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case", tag = "mode", content = "value")]
pub enum TaxCharge {
    /// Percentage of the applicable base, in basis points.
    Percent(Rate),
    /// Flat rupee amount, independent of any base.
    Fixed(Money),
}

impl TaxCharge {
    /// Computes the charge against the given base.
    ///
    /// A `Percent` charge is `base × rate`; a `Fixed` charge ignores the base
    /// entirely.
    pub fn amount_on(&self, base: Money) -> Money {
        match self {
            TaxCharge::Percent(rate) => base.apply_rate(*rate),
            TaxCharge::Fixed(amount) => *amount,
        }
    }

    /// A zero-percent charge, the default for untaxed lines.
    pub const fn none() -> Self {
        TaxCharge::Percent(Rate::zero())
    }
}

impl Default for TaxCharge {
    fn default() -> Self {
        TaxCharge::none()
    }
}

// =============================================================================
// Line Tax
// =============================================================================

/// A flat rupee charge attached to a single invoice line.
///
/// Line taxes are independent of the taxable amount; they are entered as
/// fixed amounts (e.g. a packing levy) and simply summed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineTax {
    /// Label shown on the invoice.
    pub name: String,
    /// Fixed rupee amount.
    pub amount: Money,
}

// =============================================================================
// Additional Tax
// =============================================================================

/// Which running subtotal an invoice-level additional tax is computed
/// against.
///
/// Each additional tax picks its base independently; one tax's amount never
/// feeds another's base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TaxBase {
    /// The sum of all line bases, before any discount.
    Gross,
    /// Gross minus the total discount, floored at zero.
    AfterDiscount,
    /// The after-discount base plus the flat line taxes.
    PostLineTaxes,
}

/// An invoice-level tax computed against a selectable running subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalTax {
    /// Label shown on the invoice.
    pub name: String,
    /// Percentage or flat amount.
    pub charge: TaxCharge,
    /// Which subtotal the charge applies to.
    pub base: TaxBase,
}

// =============================================================================
// Invoice Line
// =============================================================================

/// One line of a purchase invoice while it is being authored.
///
/// ## Lifecycle
/// Invoice lines exist only during authoring; once the invoice is saved they
/// become a frozen snapshot inside the persisted record.
///
/// ## Invariants
/// - `quantity` is in packs and must be >= 0
/// - `discount` is bounded to [0%, 100%] by validation; any arithmetic that
///   could still go negative is floored at zero downstream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    /// Medicine/item name.
    pub name: String,

    /// Expiry date, when known.
    #[ts(as = "Option<String>")]
    pub expiry_date: Option<NaiveDate>,

    /// Quantity in packs.
    pub quantity: i64,

    /// Units per pack (pack size).
    pub units_per_pack: i64,

    /// Buy price per pack. The calculator values the purchase side, so this
    /// is the price every total is built from.
    pub buy_price: Money,

    /// Sale price per pack, when already decided.
    pub sale_price: Option<Money>,

    /// Discount on the line base, in basis points (1000 = 10%).
    pub discount: Rate,

    /// Per-line sales tax: percentage of the line's taxable amount, or a
    /// flat rupee amount.
    pub sales_tax: TaxCharge,

    /// Ordered flat rupee charges attached to this line.
    pub line_taxes: Vec<LineTax>,
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the originating sale or purchase was paid.
///
/// Credit sales carry a running customer balance; a customer return against
/// a credit sale decrements that balance by the refund.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Paid in full at the counter.
    Cash,
    /// Booked against the party's running balance.
    Credit,
}

// =============================================================================
// Trade Line / Sale Record / Purchase Record
// =============================================================================

/// A line item on an originating sale or purchase, frozen at return time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TradeLine {
    /// Line id within the record.
    pub id: String,
    /// Item name at transaction time (frozen).
    pub name: String,
    /// Quantity transacted.
    pub quantity: i64,
    /// Unit price at transaction time (frozen).
    pub unit_price: Money,
    /// Explicit stock-record reference, when the line was filled from a known
    /// stock record. Feeds the resolution strategy: when present it is always
    /// preferred over name matching.
    pub stock_record_id: Option<String>,
}

impl TradeLine {
    /// Line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// A sale as mirrored locally, immutable at return time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    pub id: String,
    /// Human-readable reference number used by the search screen.
    pub reference_no: String,
    /// Customer id, when the sale was made to a registered customer.
    pub customer_id: Option<String>,
    pub payment_method: PaymentMethod,
    /// Total amount of the sale.
    pub total: Money,
    pub lines: Vec<TradeLine>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl SaleRecord {
    /// Looks up a line by id.
    pub fn line(&self, line_id: &str) -> Option<&TradeLine> {
        self.lines.iter().find(|l| l.id == line_id)
    }

    /// Recomputes the total from the current line quantities.
    ///
    /// Used after a return decrements cached line quantities: the cached
    /// total must always match the cached lines.
    pub fn recomputed_total(&self) -> Money {
        self.lines.iter().map(|l| l.line_total()).sum()
    }
}

/// A purchase as mirrored locally, immutable at return time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRecord {
    pub id: String,
    /// Human-readable reference number used by the search screen.
    pub reference_no: String,
    /// Supplier id.
    pub supplier_id: Option<String>,
    pub payment_method: PaymentMethod,
    /// Total amount of the purchase.
    pub total: Money,
    pub lines: Vec<TradeLine>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl PurchaseRecord {
    /// Looks up a line by id.
    pub fn line(&self, line_id: &str) -> Option<&TradeLine> {
        self.lines.iter().find(|l| l.id == line_id)
    }

    /// Recomputes the total from the current line quantities.
    pub fn recomputed_total(&self) -> Money {
        self.lines.iter().map(|l| l.line_total()).sum()
    }
}

// =============================================================================
// Inventory
// =============================================================================

/// Approval status of a stock record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// Usable inventory.
    Approved,
    /// Awaiting purchase approval. Pending records must never be adjusted by
    /// a return; doing so would corrupt the approval workflow.
    Pending,
}

impl Default for StockStatus {
    fn default() -> Self {
        StockStatus::Approved
    }
}

/// A stock record in the current inventory snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub status: StockStatus,
    /// Current stock level in units.
    pub quantity: i64,
    /// Unit cost.
    pub unit_cost: Money,
    /// Unit sale price.
    pub unit_sale_price: Money,
}

impl InventoryItem {
    /// Whether this record may be mutated by a return.
    ///
    /// Only non-pending records participate in name-match resolution.
    #[inline]
    pub fn is_adjustable(&self) -> bool {
        self.status != StockStatus::Pending
    }
}

// =============================================================================
// Returns
// =============================================================================

/// Why an item is coming back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ReturnReason {
    Expired,
    WrongItem,
    Damaged,
    Other,
}

/// Which direction the goods move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ReturnKind {
    /// Goods come back from a customer; stock increases.
    Customer,
    /// Goods go back to a supplier; stock decreases.
    Supplier,
}

/// One medicine entry on a return record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReturnEntry {
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub reason: ReturnReason,
}

impl ReturnEntry {
    /// The credit this entry contributes to the refund.
    #[inline]
    pub fn amount(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// The append-only record of a processed return.
///
/// ## Lifecycle
/// Created exactly once at the end of a reconciliation run and never mutated
/// afterward; deleting an un-synced draft is the only allowed edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRecord {
    pub id: String,
    pub kind: ReturnKind,
    /// Id of the originating sale or purchase.
    pub source_id: String,
    /// Resolved refund/credit amount.
    pub refund: Money,
    pub entries: Vec<ReturnEntry>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl ReturnRecord {
    /// Builds a return record for a single returned line.
    ///
    /// The workflows persist one record per returned line, each carrying that
    /// line's entry and credit.
    pub fn for_line(kind: ReturnKind, source_id: &str, entry: ReturnEntry) -> Self {
        let refund = entry.amount();
        ReturnRecord {
            id: Uuid::new_v4().to_string(),
            kind,
            source_id: source_id.to_string(),
            refund,
            entries: vec![entry],
            created_at: Utc::now(),
        }
    }
}

// =============================================================================
// Finance Ledger
// =============================================================================

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Income,
    Expense,
}

/// An append-only finance ledger row.
///
/// Purchase and restock events write expense rows; returns are recorded via
/// `ReturnRecord` and stock adjustments only, never as ledger rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FinanceEntry {
    pub id: String,
    pub kind: EntryKind,
    /// Reporting category, e.g. "purchase".
    pub category: String,
    pub amount: Money,
    #[ts(as = "String")]
    pub date: NaiveDate,
    /// Free-text reference, often a stock-record or invoice id.
    pub reference: String,
}

impl FinanceEntry {
    /// Builds the expense row written when a purchase invoice is saved.
    pub fn purchase_expense(amount: Money, date: NaiveDate, reference: &str) -> Self {
        FinanceEntry {
            id: Uuid::new_v4().to_string(),
            kind: EntryKind::Expense,
            category: "purchase".to_string(),
            amount,
            date,
            reference: reference.to_string(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
