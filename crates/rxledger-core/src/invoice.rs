//! # Invoice Tax & Totals Calculator
//!
//! Pure computation of invoice totals from line items and invoice-level
//! additional taxes. This is the arithmetic the finance side audits, so it
//! must be deterministic: the totals are derived values, recomputed from
//! their inputs every time, never cached.
//!
//! ## Per-Line Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  base      = quantity × buy_price_per_pack                             │
//! │  discount  = base × discount_rate                                      │
//! │  taxable   = max(0, base − discount)                                   │
//! │  line_tax  = Σ flat line-tax amounts                                   │
//! │  sales_tax = percent? taxable × rate : fixed amount                    │
//! │  total     = taxable + line_tax + sales_tax     (display only)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invoice Aggregates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  gross          = Σ base                                               │
//! │  discount_total = Σ discount                                           │
//! │  taxable_base   = max(0, gross − discount_total)                       │
//! │  additional tax = charge on { gross | taxable_base |                   │
//! │                               taxable_base + line_taxes_total }        │
//! │  net = taxable_base + line_taxes + sales_taxes + additional_taxes      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Note that the buy price is used, not the sale price: the calculator
//! values the purchase side of the counter.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{AdditionalTax, InvoiceLine, TaxBase, TaxCharge};

// =============================================================================
// Line Computation
// =============================================================================

/// The computed breakdown of a single invoice line.
///
/// Includes the per-unit diagnostics shown next to the line while it is being
/// edited. Both unit prices coerce to zero when `units_per_pack` is zero;
/// the calculator never raises on bad catalog data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineComputation {
    /// quantity × buy price per pack.
    pub base: Money,
    /// base × discount rate.
    pub discount: Money,
    /// base − discount, floored at zero.
    pub taxable: Money,
    /// Sum of the flat line taxes.
    pub line_tax_total: Money,
    /// Percentage of `taxable` or a fixed amount.
    pub sales_tax: Money,
    /// taxable + line taxes + sales tax. Display only; the invoice net is
    /// built from the aggregates, not from these.
    pub line_total: Money,
    /// quantity × units per pack.
    pub total_units: i64,
    /// buy price per pack ÷ units per pack (zero when pack size is zero).
    pub unit_buy_price: Money,
    /// sale price per pack ÷ units per pack (zero when pack size is zero or
    /// no sale price has been decided).
    pub unit_sale_price: Money,
}

/// Computes the breakdown of one invoice line.
pub fn compute_line(line: &InvoiceLine) -> LineComputation {
    let base = line.buy_price.multiply_quantity(line.quantity);
    let discount = base.apply_rate(line.discount);
    let taxable = base.sub_floor_zero(discount);

    let line_tax_total: Money = line.line_taxes.iter().map(|t| t.amount).sum();

    // Percent sales tax applies to the line's taxable amount, not its base.
    let sales_tax = line.sales_tax.amount_on(taxable);

    let line_total = taxable + line_tax_total + sales_tax;

    let total_units = line.quantity.saturating_mul(line.units_per_pack);
    let unit_buy_price = line.buy_price.div_or_zero(line.units_per_pack);
    let unit_sale_price = line
        .sale_price
        .map(|p| p.div_or_zero(line.units_per_pack))
        .unwrap_or_else(Money::zero);

    LineComputation {
        base,
        discount,
        taxable,
        line_tax_total,
        sales_tax,
        line_total,
        total_units,
        unit_buy_price,
        unit_sale_price,
    }
}

// =============================================================================
// Invoice Totals
// =============================================================================

/// One additional tax as applied to this invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AppliedTax {
    pub name: String,
    pub amount: Money,
}

/// The computed totals of a whole invoice.
///
/// Derived, never stored independently of its inputs: whenever a line or an
/// additional tax changes, the caller recomputes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotals {
    /// Sum of all line bases.
    pub gross: Money,
    /// Sum of all line discounts.
    pub discount_total: Money,
    /// gross − discount_total, floored at zero.
    pub taxable_base: Money,
    /// Sum of all flat line taxes.
    pub line_taxes_total: Money,
    /// Sum of all per-line sales taxes.
    pub sales_tax_total: Money,
    /// Per-tax breakdown of the invoice-level additional taxes.
    pub additional_taxes: Vec<AppliedTax>,
    /// Sum of the additional tax amounts.
    pub additional_taxes_total: Money,
    /// taxable_base + line_taxes_total + sales_tax_total +
    /// additional_taxes_total.
    pub net: Money,
}

/// Computes the totals for an invoice.
///
/// Pure and deterministic: calling it twice on the same inputs yields
/// identical totals, and it never panics on degenerate input (zero pack
/// sizes, over-100% discounts, empty invoices).
pub fn compute_invoice(lines: &[InvoiceLine], additional: &[AdditionalTax]) -> InvoiceTotals {
    let computed: Vec<LineComputation> = lines.iter().map(compute_line).collect();

    let gross: Money = computed.iter().map(|c| c.base).sum();
    let discount_total: Money = computed.iter().map(|c| c.discount).sum();
    let taxable_base = gross.sub_floor_zero(discount_total);
    let line_taxes_total: Money = computed.iter().map(|c| c.line_tax_total).sum();
    let sales_tax_total: Money = computed.iter().map(|c| c.sales_tax).sum();

    // Each additional tax picks its base independently; one tax's amount
    // never feeds another's base.
    let additional_taxes: Vec<AppliedTax> = additional
        .iter()
        .map(|tax| {
            let base = match tax.base {
                TaxBase::Gross => gross,
                TaxBase::AfterDiscount => taxable_base,
                TaxBase::PostLineTaxes => taxable_base + line_taxes_total,
            };
            AppliedTax {
                name: tax.name.clone(),
                amount: tax.charge.amount_on(base),
            }
        })
        .collect();

    let additional_taxes_total: Money = additional_taxes.iter().map(|t| t.amount).sum();

    let net = taxable_base + line_taxes_total + sales_tax_total + additional_taxes_total;

    InvoiceTotals {
        gross,
        discount_total,
        taxable_base,
        line_taxes_total,
        sales_tax_total,
        additional_taxes,
        additional_taxes_total,
        net,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
