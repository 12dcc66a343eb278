//! Cost basis: lifetime weighted-average purchase cost per egg.

use crate::domain::{Money, PurchaseEntry};

/// Weighted-average cost per egg over the tenant's entire purchase history.
///
/// `Σ cost / Σ eggs` across every purchase ever made, so profit attribution
/// stays comparable across reporting periods regardless of when stock was
/// bought. Exactly zero when no eggs were ever purchased.
pub fn global_cost_per_egg(purchases: &[PurchaseEntry]) -> Money {
    let total_cost: Money = purchases.iter().map(PurchaseEntry::total_cost).sum();
    let total_eggs: i64 = purchases.iter().map(PurchaseEntry::total_eggs).sum();
    total_cost.per_unit(total_eggs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    fn purchase(crates: i64, crate_price: &str) -> PurchaseEntry {
        PurchaseEntry::new(
            "owner-1".to_string(),
            0,
            Money::zero(),
            7,
            money(crate_price),
            crates,
            30,
            NaiveDate::from_str("2024-05-01").unwrap(),
        )
    }

    #[test]
    fn test_no_purchases_is_exactly_zero() {
        assert_eq!(global_cost_per_egg(&[]), Money::zero());
    }

    #[test]
    fn test_single_purchase_rate() {
        // 10 crates x 30 eggs at 200/crate: 2000 / 300
        let cpe = global_cost_per_egg(&[purchase(10, "200")]);
        assert_eq!(cpe.round_dp(4), money("6.6667"));
    }

    #[test]
    fn test_weighted_average_not_simple_mean() {
        // 1 crate at 300 (10/egg) and 9 crates at 200 (6.67/egg):
        // (300 + 1800) / 300 = 7, well below the simple mean of the rates
        let purchases = vec![purchase(1, "300"), purchase(9, "200")];
        let cpe = global_cost_per_egg(&purchases);
        assert_eq!(cpe, money("7"));
    }

    #[test]
    fn test_legacy_purchases_participate() {
        let mut legacy = purchase(0, "0");
        legacy.egg_price = Some(money("5"));
        legacy.eggs_got = Some(100);
        let purchases = vec![purchase(10, "200"), legacy];

        // (2000 + 500) / (300 + 100)
        let cpe = global_cost_per_egg(&purchases);
        assert_eq!(cpe, money("6.25"));
    }

    #[test]
    fn test_free_stock_lowers_rate() {
        let purchases = vec![purchase(10, "200"), purchase(10, "0")];
        let cpe = global_cost_per_egg(&purchases);
        assert_eq!(cpe.round_dp(4), money("3.3333"));
    }
}
