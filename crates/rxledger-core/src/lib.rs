//! # rxledger-core: Pure Business Logic for the Pharmacy Back Office
//!
//! This crate is the **heart** of RxLedger. It contains the monetary
//! computation core as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       RxLedger Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Host Application (back-office screens)             │   │
//! │  │   Invoice editor ──► Return search ──► Process return          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    rxledger-recon                               │   │
//! │  │   Return workflows, resolution strategy, invalidation bus       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ rxledger-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  invoice  │  │  refund   │  │   │
//! │  │   │ SaleRecord│  │   Money   │  │  totals   │  │ selection │  │   │
//! │  │   │ Inventory │  │   Rate    │  │ calculator│  │  credit   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (InvoiceLine, SaleRecord, InventoryItem, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`invoice`] - The invoice tax & totals calculator
//! - [`refund`] - Return selection and refund arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every calculation is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in paisa (i64) to avoid float errors
//! 4. **Floor at Zero**: Any subtraction that could go negative clamps to zero
//! 5. **Never Panic**: Degenerate input (zero pack sizes, over-100% discounts)
//!    yields zeros, not errors
//!
//! ## Example Usage
//!
//! ```rust
//! use rxledger_core::invoice::compute_invoice;
//! use rxledger_core::money::Money;
//! use rxledger_core::types::{InvoiceLine, Rate, TaxCharge};
//!
//! let line = InvoiceLine {
//!     name: "Panadol".to_string(),
//!     expiry_date: None,
//!     quantity: 2,
//!     units_per_pack: 10,
//!     buy_price: Money::from_rupees(100),
//!     sale_price: None,
//!     discount: Rate::from_bps(1000),               // 10%
//!     sales_tax: TaxCharge::Percent(Rate::from_bps(500)), // 5%
//!     line_taxes: Vec::new(),
//! };
//!
//! let totals = compute_invoice(&[line], &[]);
//! assert_eq!(totals.gross, Money::from_rupees(200));
//! assert_eq!(totals.net, Money::from_rupees(189));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod invoice;
pub mod money;
pub mod refund;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use rxledger_core::Money` instead of
// `use rxledger_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use invoice::{compute_invoice, compute_line, InvoiceTotals, LineComputation};
pub use money::Money;
pub use refund::{ReturnSelection, SelectedLine};
pub use types::*;
