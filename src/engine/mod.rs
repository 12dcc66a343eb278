//! Pure ledger computations: stock, cost basis, profit, report assembly.
//!
//! Everything here is deterministic over its input slices; persistence and
//! tenant scoping stay in the repository layer.

pub mod attribution;
pub mod costing;
pub mod report;
pub mod stock;

pub use attribution::{profit_breakdown, ProfitBreakdown};
pub use costing::global_cost_per_egg;
pub use report::{build_report, PeriodReport};
pub use stock::current_stock;
