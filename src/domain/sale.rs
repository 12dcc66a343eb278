//! Sale entry type and its egg/revenue normalization.

use crate::domain::{Money, PaymentMethod};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single sale across up to three tiers: boxes, crates, and loose eggs.
///
/// Legacy rows predate crate tracking and carry a raw `eggs_sold` count
/// (optionally with a per-egg `sale_price`) instead of the crate fields.
/// `crates_sold: None` marks such a row; current-generation rows always
/// store an explicit crate count, even when it is zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleEntry {
    /// Stable unique identifier.
    pub id: String,
    /// Owning tenant; legacy rows predating tenancy have none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    /// Boxes sold.
    pub boxes_sold: i64,
    /// Price per box.
    pub box_sale_price: Money,
    /// Crates contained in one box for this entry.
    pub crates_per_box: i64,
    /// Crates sold; `None` on legacy rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crates_sold: Option<i64>,
    /// Price per crate.
    pub crate_sale_price: Money,
    /// Loose eggs sold outside boxes and crates.
    pub individual_eggs: i64,
    /// Price per loose egg.
    pub egg_sale_price: Money,
    /// Eggs contained in one crate for this entry.
    pub eggs_per_crate: i64,
    /// Legacy generation: raw count of eggs sold (no crate semantics).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eggs_sold: Option<i64>,
    /// Legacy generation: price per egg for `eggs_sold`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<Money>,
    /// How the buyer paid.
    pub payment_method: PaymentMethod,
    /// Day the sale was made.
    pub date: NaiveDate,
}

impl SaleEntry {
    /// Create a current-generation sale with a fresh id.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        owner_id: String,
        boxes_sold: i64,
        box_sale_price: Money,
        crates_per_box: i64,
        crates_sold: i64,
        crate_sale_price: Money,
        individual_eggs: i64,
        egg_sale_price: Money,
        eggs_per_crate: i64,
        payment_method: PaymentMethod,
        date: NaiveDate,
    ) -> Self {
        SaleEntry {
            id: Uuid::new_v4().to_string(),
            owner_id: Some(owner_id),
            boxes_sold,
            box_sale_price,
            crates_per_box,
            crates_sold: Some(crates_sold),
            crate_sale_price,
            individual_eggs,
            egg_sale_price,
            eggs_per_crate,
            eggs_sold: None,
            sale_price: None,
            payment_method,
            date,
        }
    }

    /// Total eggs this sale removed from stock.
    ///
    /// Unlike purchases, loose eggs are always additive, never a fallback;
    /// only the crate slot falls back to the legacy raw count.
    pub fn total_eggs(&self) -> i64 {
        let box_eggs = self.boxes_sold * self.crates_per_box * self.eggs_per_crate;
        let crate_eggs = match self.crates_sold {
            Some(crates) => crates * self.eggs_per_crate,
            None => self.eggs_sold.unwrap_or(0),
        };
        box_eggs + crate_eggs + self.individual_eggs
    }

    /// Total amount received for this sale, additive across tiers.
    pub fn total_revenue(&self) -> Money {
        let box_amount = self.box_sale_price * self.boxes_sold;
        let crate_amount = match self.crates_sold {
            Some(crates) => self.crate_sale_price * crates,
            None => self.sale_price.unwrap_or_else(Money::zero) * self.eggs_sold.unwrap_or(0),
        };
        box_amount + crate_amount + self.egg_sale_price * self.individual_eggs
    }
}
