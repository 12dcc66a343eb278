//! Stock ledger: current inventory derived from the full history.

use crate::domain::{PurchaseEntry, SaleEntry};

/// Eggs currently in stock: everything ever purchased minus everything
/// ever sold, on the normalized eggs basis.
///
/// Read-only; callers own tenant scoping of the input slices.
pub fn current_stock(purchases: &[PurchaseEntry], sales: &[SaleEntry]) -> i64 {
    let purchased: i64 = purchases.iter().map(PurchaseEntry::total_eggs).sum();
    let sold: i64 = sales.iter().map(SaleEntry::total_eggs).sum();
    purchased - sold
}
