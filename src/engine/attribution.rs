//! Profit attribution: per-channel margin against the global cost basis.

use crate::domain::{Money, SaleEntry};
use serde::Serialize;

/// Profit split across the three sale channels.
///
/// A channel only accumulates when its quantity is positive, so legacy
/// sales (raw egg counts with no tier) never enter the breakdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProfitBreakdown {
    /// Profit from box sales.
    #[serde(rename = "box")]
    pub box_profit: Money,
    /// Profit from crate sales.
    #[serde(rename = "crate")]
    pub crate_profit: Money,
    /// Profit from loose egg sales.
    #[serde(rename = "loose")]
    pub loose_profit: Money,
}

impl ProfitBreakdown {
    /// Total profit across all channels.
    pub fn total(&self) -> Money {
        self.box_profit + self.crate_profit + self.loose_profit
    }
}

/// Attribute each sale's margin to its channels using `global_cpe` as the
/// per-egg cost basis.
///
/// Box: `(boxSalePrice − cratesPerBox×eggsPerCrate×cpe) × boxesSold`.
/// Crate: `(crateSalePrice − eggsPerCrate×cpe) × cratesSold`.
/// Loose: `(eggSalePrice − cpe) × individualEggs`.
pub fn profit_breakdown(sales: &[SaleEntry], global_cpe: Money) -> ProfitBreakdown {
    let mut breakdown = ProfitBreakdown::default();

    for sale in sales {
        if sale.boxes_sold > 0 {
            let eggs_per_box = sale.crates_per_box * sale.eggs_per_crate;
            let cost_basis = global_cpe * eggs_per_box;
            breakdown.box_profit =
                breakdown.box_profit + (sale.box_sale_price - cost_basis) * sale.boxes_sold;
        }

        if let Some(crates) = sale.crates_sold {
            if crates > 0 {
                let cost_basis = global_cpe * sale.eggs_per_crate;
                breakdown.crate_profit =
                    breakdown.crate_profit + (sale.crate_sale_price - cost_basis) * crates;
            }
        }

        if sale.individual_eggs > 0 {
            breakdown.loose_profit =
                breakdown.loose_profit + (sale.egg_sale_price - global_cpe) * sale.individual_eggs;
        }
    }

    breakdown
}
