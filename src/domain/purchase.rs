//! Purchase entry type and its egg/cost normalization.

use crate::domain::Money;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single stock purchase.
///
/// Three schema generations coexist in stored data: flat egg counts
/// (`egg_price`/`eggs_got` only), crate-based, and the current
/// box+crate form. [`total_eggs`](Self::total_eggs) and
/// [`total_cost`](Self::total_cost) normalize all of them onto a common
/// eggs/amount basis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseEntry {
    /// Stable unique identifier.
    pub id: String,
    /// Owning tenant; legacy rows predating tenancy have none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    /// Boxes bought.
    pub boxes_got: i64,
    /// Price per box.
    pub box_price: Money,
    /// Crates contained in one box for this entry.
    pub crates_per_box: i64,
    /// Price per crate.
    pub crate_price: Money,
    /// Crates bought outside boxes.
    pub crates_got: i64,
    /// Eggs contained in one crate for this entry.
    pub eggs_per_crate: i64,
    /// Legacy flat generation: price per single egg.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub egg_price: Option<Money>,
    /// Legacy flat generation: raw egg count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eggs_got: Option<i64>,
    /// Day the purchase was made.
    pub date: NaiveDate,
}

impl PurchaseEntry {
    /// Create a current-generation (box+crate) purchase with a fresh id.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        owner_id: String,
        boxes_got: i64,
        box_price: Money,
        crates_per_box: i64,
        crate_price: Money,
        crates_got: i64,
        eggs_per_crate: i64,
        date: NaiveDate,
    ) -> Self {
        PurchaseEntry {
            id: Uuid::new_v4().to_string(),
            owner_id: Some(owner_id),
            boxes_got,
            box_price,
            crates_per_box,
            crate_price,
            crates_got,
            eggs_per_crate,
            egg_price: None,
            eggs_got: None,
            date,
        }
    }

    /// Total eggs this purchase brought into stock.
    ///
    /// Structured fields win; the legacy flat count applies only when the
    /// box and crate tiers contribute nothing.
    pub fn total_eggs(&self) -> i64 {
        let box_eggs = self.boxes_got * self.crates_per_box * self.eggs_per_crate;
        let crate_eggs = self.crates_got * self.eggs_per_crate;
        let structured = box_eggs + crate_eggs;
        if structured > 0 {
            structured
        } else {
            self.eggs_got.unwrap_or(0)
        }
    }

    /// Total amount paid for this purchase.
    ///
    /// Same precedence as [`total_eggs`](Self::total_eggs): the legacy
    /// per-egg pricing applies only when the structured total is zero.
    pub fn total_cost(&self) -> Money {
        let structured = self.box_price * self.boxes_got + self.crate_price * self.crates_got;
        if !structured.is_zero() {
            structured
        } else {
            self.egg_price.unwrap_or_else(Money::zero) * self.eggs_got.unwrap_or(0)
        }
    }
}
