//! Purchase ledger operations for the repository.

use crate::domain::PurchaseEntry;

use super::{now_ms, purchase_from_row, Repository};

impl Repository {
    /// Insert a purchase for its owner.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_purchase(&self, purchase: &PurchaseEntry) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO purchases (
                id, owner_id, boxes_got, box_price, crates_per_box, crate_price,
                crates_got, eggs_per_crate, egg_price, eggs_got, date, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&purchase.id)
        .bind(&purchase.owner_id)
        .bind(purchase.boxes_got)
        .bind(purchase.box_price.to_canonical_string())
        .bind(purchase.crates_per_box)
        .bind(purchase.crate_price.to_canonical_string())
        .bind(purchase.crates_got)
        .bind(purchase.eggs_per_crate)
        .bind(purchase.egg_price.map(|m| m.to_canonical_string()))
        .bind(purchase.eggs_got)
        .bind(purchase.date.to_string())
        .bind(now_ms())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// All purchases for an owner, newest first.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_purchases(&self, owner_id: &str) -> Result<Vec<PurchaseEntry>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, owner_id, boxes_got, box_price, crates_per_box, crate_price,
                   crates_got, eggs_per_crate, egg_price, eggs_got, date
            FROM purchases
            WHERE owner_id = ?
            ORDER BY date DESC, created_at DESC, id DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(purchase_from_row).collect())
    }

    /// Delete an owner's purchase by id. Returns whether a row was removed.
    ///
    /// Deletion is serialized with sale inserts so a stock check never runs
    /// against purchases that are mid-removal.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub async fn delete_purchase(
        &self,
        owner_id: &str,
        purchase_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let _guard = self.stock_lock.lock().await;

        let result = sqlx::query("DELETE FROM purchases WHERE id = ? AND owner_id = ?")
            .bind(purchase_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
