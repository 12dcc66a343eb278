//! Domain types for the egg ledger.
//!
//! This module provides:
//! - Exact monetary arithmetic via the Money wrapper
//! - Purchase and sale entry types covering all stored schema generations,
//!   with their normalization onto a common eggs/amount basis
//! - Payment method enum
//! - Reporting period resolution (daily/monthly)

pub mod money;
pub mod payment;
pub mod period;
pub mod purchase;
pub mod sale;

/// Eggs in one crate when a request or row does not carry its own value.
pub const DEFAULT_EGGS_PER_CRATE: i64 = 30;
/// Crates in one box when a request or row does not carry its own value.
pub const DEFAULT_CRATES_PER_BOX: i64 = 7;

pub use money::Money;
pub use payment::PaymentMethod;
pub use period::{PeriodKind, PeriodParseError, ReportPeriod};
pub use purchase::PurchaseEntry;
pub use sale::SaleEntry;
