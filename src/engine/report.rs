//! Period report assembly over a tenant's full ledger.

use crate::domain::{Money, PurchaseEntry, ReportPeriod, SaleEntry};
use crate::engine::attribution::{profit_breakdown, ProfitBreakdown};
use crate::engine::costing::global_cost_per_egg;
use crate::engine::stock::current_stock;
use serde::Serialize;

/// Aggregated totals for one reporting period.
///
/// Period totals cover only entries dated inside the period; `global_cpe`
/// and `current_stock_eggs` always cover the tenant's full history so the
/// cost basis stays comparable across periods. `profit` is cost-of-goods
/// profit (the breakdown sum); `net_cash_flow` is the simpler
/// revenue-minus-purchase-cost figure for the same period.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodReport {
    /// `"daily"` or `"monthly"`.
    #[serde(rename = "type")]
    pub report_type: String,
    /// The day (`YYYY-MM-DD`) or month (`YYYY-MM`) covered.
    pub period: String,
    pub total_boxes_purchased: i64,
    /// Standalone crates only; crates inside boxes are not counted here.
    pub total_crates_purchased: i64,
    pub total_eggs_purchased: i64,
    pub total_purchase_cost: Money,
    pub avg_purchase_price_per_egg: Money,
    pub total_boxes_sold: i64,
    /// Standalone crates only; legacy sales contribute nothing here.
    pub total_crates_sold: i64,
    pub total_eggs_sold: i64,
    pub total_sales_revenue: Money,
    pub avg_sale_price_per_egg: Money,
    /// Cost-of-goods profit over the period's sales.
    pub profit: Money,
    pub profit_breakdown: ProfitBreakdown,
    /// Period revenue minus period purchase cost.
    pub net_cash_flow: Money,
    /// All-time weighted average purchase cost per egg.
    #[serde(rename = "globalCPE")]
    pub global_cpe: Money,
    /// All-time stock on hand.
    pub current_stock_eggs: i64,
    /// Period purchases, newest first.
    pub purchases: Vec<PurchaseEntry>,
    /// Period sales, newest first.
    pub sales: Vec<SaleEntry>,
}

/// Build the report for `period` from the tenant's complete purchase and
/// sale history (newest first). Entries outside the period only feed the
/// all-time figures.
pub fn build_report(
    period: &ReportPeriod,
    purchases: &[PurchaseEntry],
    sales: &[SaleEntry],
) -> PeriodReport {
    let period_purchases: Vec<PurchaseEntry> = purchases
        .iter()
        .filter(|p| period.contains(p.date))
        .cloned()
        .collect();
    let period_sales: Vec<SaleEntry> = sales
        .iter()
        .filter(|s| period.contains(s.date))
        .cloned()
        .collect();

    let total_boxes_purchased: i64 = period_purchases.iter().map(|p| p.boxes_got).sum();
    let total_crates_purchased: i64 = period_purchases.iter().map(|p| p.crates_got).sum();
    let total_eggs_purchased: i64 = period_purchases.iter().map(PurchaseEntry::total_eggs).sum();
    let total_purchase_cost: Money = period_purchases.iter().map(PurchaseEntry::total_cost).sum();

    let total_boxes_sold: i64 = period_sales.iter().map(|s| s.boxes_sold).sum();
    let total_crates_sold: i64 = period_sales.iter().map(|s| s.crates_sold.unwrap_or(0)).sum();
    let total_eggs_sold: i64 = period_sales.iter().map(SaleEntry::total_eggs).sum();
    let total_sales_revenue: Money = period_sales.iter().map(SaleEntry::total_revenue).sum();

    let global_cpe = global_cost_per_egg(purchases);
    let breakdown = profit_breakdown(&period_sales, global_cpe);

    PeriodReport {
        report_type: period.kind().as_str().to_string(),
        period: period.label().to_string(),
        total_boxes_purchased,
        total_crates_purchased,
        total_eggs_purchased,
        total_purchase_cost,
        avg_purchase_price_per_egg: total_purchase_cost.per_unit(total_eggs_purchased),
        total_boxes_sold,
        total_crates_sold,
        total_eggs_sold,
        total_sales_revenue,
        avg_sale_price_per_egg: total_sales_revenue.per_unit(total_eggs_sold),
        profit: breakdown.total(),
        profit_breakdown: breakdown,
        net_cash_flow: total_sales_revenue - total_purchase_cost,
        global_cpe,
        current_stock_eggs: current_stock(purchases, sales),
        purchases: period_purchases,
        sales: period_sales,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PaymentMethod;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::from_str(s).unwrap()
    }

    fn purchase(crates: i64, crate_price: &str, on: &str) -> PurchaseEntry {
        PurchaseEntry::new(
            "owner-1".to_string(),
            0,
            Money::zero(),
            7,
            money(crate_price),
            crates,
            30,
            date(on),
        )
    }

    fn crate_sale(crates: i64, crate_price: &str, on: &str) -> SaleEntry {
        SaleEntry::new(
            "owner-1".to_string(),
            0,
            Money::zero(),
            7,
            crates,
            money(crate_price),
            0,
            Money::zero(),
            30,
            PaymentMethod::Cash,
            date(on),
        )
    }

    #[test]
    fn test_simple_purchase_sale_cycle() {
        // Buy 10 crates at 200, sell 5 at 250 the same day
        let purchases = vec![purchase(10, "200", "2024-05-17")];
        let sales = vec![crate_sale(5, "250", "2024-05-17")];
        let period = ReportPeriod::daily("2024-05-17").unwrap();

        let report = build_report(&period, &purchases, &sales);

        assert_eq!(report.report_type, "daily");
        assert_eq!(report.period, "2024-05-17");
        assert_eq!(report.total_crates_purchased, 10);
        assert_eq!(report.total_eggs_purchased, 300);
        assert_eq!(report.total_purchase_cost, money("2000"));
        assert_eq!(report.total_crates_sold, 5);
        assert_eq!(report.total_eggs_sold, 150);
        assert_eq!(report.total_sales_revenue, money("1250"));
        assert_eq!(report.global_cpe.round_dp(4), money("6.6667"));
        assert_eq!(report.profit_breakdown.crate_profit.round_dp(2), money("250"));
        assert_eq!(report.profit, report.profit_breakdown.total());
        assert_eq!(report.net_cash_flow, money("-750"));
        assert_eq!(report.current_stock_eggs, 150);
        assert_eq!(report.purchases.len(), 1);
        assert_eq!(report.sales.len(), 1);
    }

    #[test]
    fn test_period_totals_exclude_outside_entries() {
        let purchases = vec![
            purchase(10, "200", "2024-05-17"),
            purchase(4, "210", "2024-06-02"),
        ];
        let sales = vec![crate_sale(5, "250", "2024-06-02")];
        let period = ReportPeriod::monthly("2024-05").unwrap();

        let report = build_report(&period, &purchases, &sales);

        // May totals only
        assert_eq!(report.total_crates_purchased, 10);
        assert_eq!(report.total_eggs_sold, 0);
        assert!(report.sales.is_empty());
        // All-time figures still see June
        assert_eq!(report.current_stock_eggs, 300 + 120 - 150);
        let all_time_cpe = money("2840").per_unit(420);
        assert_eq!(report.global_cpe, all_time_cpe);
    }

    #[test]
    fn test_monthly_boundary_splits_reports() {
        let purchases = vec![
            purchase(1, "200", "2024-05-31"),
            purchase(2, "200", "2024-06-01"),
        ];
        let may = build_report(&ReportPeriod::monthly("2024-05").unwrap(), &purchases, &[]);
        let june = build_report(&ReportPeriod::monthly("2024-06").unwrap(), &purchases, &[]);

        assert_eq!(may.total_crates_purchased, 1);
        assert_eq!(june.total_crates_purchased, 2);
    }

    #[test]
    fn test_report_is_idempotent() {
        let purchases = vec![purchase(10, "200", "2024-05-17")];
        let sales = vec![crate_sale(3, "250", "2024-05-17")];
        let period = ReportPeriod::daily("2024-05-17").unwrap();

        let first = build_report(&period, &purchases, &sales);
        let second = build_report(&period, &purchases, &sales);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_period_has_zero_averages() {
        let report = build_report(&ReportPeriod::daily("2024-05-17").unwrap(), &[], &[]);

        assert_eq!(report.total_eggs_purchased, 0);
        assert_eq!(report.avg_purchase_price_per_egg, Money::zero());
        assert_eq!(report.avg_sale_price_per_egg, Money::zero());
        assert_eq!(report.global_cpe, Money::zero());
        assert_eq!(report.profit, Money::zero());
        assert_eq!(report.current_stock_eggs, 0);
    }

    #[test]
    fn test_legacy_sale_counts_in_totals_not_breakdown() {
        let purchases = vec![purchase(10, "200", "2024-05-17")];
        let mut legacy = crate_sale(0, "0", "2024-05-17");
        legacy.crates_sold = None;
        legacy.eggs_sold = Some(60);
        legacy.sale_price = Some(money("9"));

        let period = ReportPeriod::daily("2024-05-17").unwrap();
        let report = build_report(&period, &purchases, &[legacy]);

        assert_eq!(report.total_eggs_sold, 60);
        assert_eq!(report.total_crates_sold, 0);
        assert_eq!(report.total_sales_revenue, money("540"));
        assert_eq!(report.profit_breakdown, ProfitBreakdown::default());
        assert_eq!(report.profit, Money::zero());
    }

    #[test]
    fn test_crate_counts_exclude_box_contents() {
        let mut entry = purchase(3, "200", "2024-05-17");
        entry.boxes_got = 2;
        entry.box_price = money("1500");

        let period = ReportPeriod::daily("2024-05-17").unwrap();
        let report = build_report(&period, &[entry], &[]);

        assert_eq!(report.total_boxes_purchased, 2);
        assert_eq!(report.total_crates_purchased, 3);
        // Eggs still count the crates inside boxes
        assert_eq!(report.total_eggs_purchased, 2 * 7 * 30 + 3 * 30);
    }

    #[test]
    fn test_report_serializes_expected_keys() {
        let report = build_report(&ReportPeriod::monthly("2024-05").unwrap(), &[], &[]);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["type"], "monthly");
        assert_eq!(json["period"], "2024-05");
        assert!(json.get("globalCPE").is_some());
        assert!(json.get("profitBreakdown").is_some());
        assert!(json.get("netCashFlow").is_some());
        assert!(json.get("currentStockEggs").is_some());
        assert!(json.get("avgPurchasePricePerEgg").is_some());
    }
}
