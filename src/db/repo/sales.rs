//! Sale ledger and stock-checked insert operations for the repository.

use crate::domain::{PurchaseEntry, SaleEntry};
use crate::engine;

use super::{now_ms, purchase_from_row, sale_from_row, Repository};

/// Outcome of a stock-checked sale insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaleOutcome {
    /// Sale stored; stock on hand after the insert.
    Accepted { stock_after: i64 },
    /// Requested eggs exceed stock; nothing was written.
    Rejected { available: i64, requested: i64 },
}

impl Repository {
    /// Insert a sale after checking stock, atomically.
    ///
    /// Stock-affecting writes serialize on `stock_lock` and the
    /// read-check-insert sequence runs in one transaction, so two
    /// concurrent sales can never both pass the check against the same
    /// stock figure.
    ///
    /// # Errors
    /// Returns an error if the transaction fails.
    pub async fn insert_sale_checked(&self, sale: &SaleEntry) -> Result<SaleOutcome, sqlx::Error> {
        let owner_id = sale.owner_id.as_deref().unwrap_or_default();
        let requested = sale.total_eggs();

        let _guard = self.stock_lock.lock().await;
        let mut tx = self.pool.begin().await?;

        let purchase_rows = sqlx::query(
            r#"
            SELECT id, owner_id, boxes_got, box_price, crates_per_box, crate_price,
                   crates_got, eggs_per_crate, egg_price, eggs_got, date
            FROM purchases
            WHERE owner_id = ?
            "#,
        )
        .bind(owner_id)
        .fetch_all(&mut *tx)
        .await?;

        let sale_rows = sqlx::query(
            r#"
            SELECT id, owner_id, boxes_sold, box_sale_price, crates_per_box, crates_sold,
                   crate_sale_price, individual_eggs, egg_sale_price, eggs_per_crate,
                   eggs_sold, sale_price, payment_method, date
            FROM sales
            WHERE owner_id = ?
            "#,
        )
        .bind(owner_id)
        .fetch_all(&mut *tx)
        .await?;

        let purchases: Vec<PurchaseEntry> = purchase_rows.iter().map(purchase_from_row).collect();
        let prior_sales: Vec<SaleEntry> = sale_rows.iter().map(sale_from_row).collect();
        let available = engine::current_stock(&purchases, &prior_sales);

        if requested > available {
            // Dropping the transaction rolls it back
            return Ok(SaleOutcome::Rejected {
                available,
                requested,
            });
        }

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, owner_id, boxes_sold, box_sale_price, crates_per_box, crates_sold,
                crate_sale_price, individual_eggs, egg_sale_price, eggs_per_crate,
                eggs_sold, sale_price, payment_method, date, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.owner_id)
        .bind(sale.boxes_sold)
        .bind(sale.box_sale_price.to_canonical_string())
        .bind(sale.crates_per_box)
        .bind(sale.crates_sold)
        .bind(sale.crate_sale_price.to_canonical_string())
        .bind(sale.individual_eggs)
        .bind(sale.egg_sale_price.to_canonical_string())
        .bind(sale.eggs_per_crate)
        .bind(sale.eggs_sold)
        .bind(sale.sale_price.map(|m| m.to_canonical_string()))
        .bind(sale.payment_method.as_str())
        .bind(sale.date.to_string())
        .bind(now_ms())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(SaleOutcome::Accepted {
            stock_after: available - requested,
        })
    }

    /// All sales for an owner, newest first.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_sales(&self, owner_id: &str) -> Result<Vec<SaleEntry>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, owner_id, boxes_sold, box_sale_price, crates_per_box, crates_sold,
                   crate_sale_price, individual_eggs, egg_sale_price, eggs_per_crate,
                   eggs_sold, sale_price, payment_method, date
            FROM sales
            WHERE owner_id = ?
            ORDER BY date DESC, created_at DESC, id DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(sale_from_row).collect())
    }

    /// Stock on hand across the owner's full history.
    ///
    /// # Errors
    /// Returns an error if a query fails.
    pub async fn current_stock_for(&self, owner_id: &str) -> Result<i64, sqlx::Error> {
        let purchases = self.list_purchases(owner_id).await?;
        let sales = self.list_sales(owner_id).await?;
        Ok(engine::current_stock(&purchases, &sales))
    }

    /// Delete an owner's sale by id. Returns whether a row was removed.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub async fn delete_sale(&self, owner_id: &str, sale_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sales WHERE id = ? AND owner_id = ?")
            .bind(sale_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::init_db;
    use crate::domain::{Money, PaymentMethod};
    use chrono::NaiveDate;
    use std::str::FromStr;
    use tempfile::TempDir;

    async fn setup_test_db() -> (Repository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .to_string();
        let pool = init_db(&db_path).await.expect("init_db failed");
        (Repository::new(pool), temp_dir)
    }

    async fn test_owner(repo: &Repository, email: &str) -> String {
        repo.create_user("Test", email, "hash")
            .await
            .expect("create failed")
            .expect("email should be free")
            .id
    }

    fn purchase(owner: &str, crates: i64, crate_price: &str, on: &str) -> PurchaseEntry {
        PurchaseEntry::new(
            owner.to_string(),
            0,
            Money::zero(),
            7,
            Money::from_str(crate_price).unwrap(),
            crates,
            30,
            NaiveDate::from_str(on).unwrap(),
        )
    }

    fn crate_sale(owner: &str, crates: i64, crate_price: &str, on: &str) -> SaleEntry {
        SaleEntry::new(
            owner.to_string(),
            0,
            Money::zero(),
            7,
            crates,
            Money::from_str(crate_price).unwrap(),
            0,
            Money::zero(),
            30,
            PaymentMethod::Cash,
            NaiveDate::from_str(on).unwrap(),
        )
    }

    fn loose_sale(owner: &str, eggs: i64, egg_price: &str, on: &str) -> SaleEntry {
        SaleEntry::new(
            owner.to_string(),
            0,
            Money::zero(),
            7,
            0,
            Money::zero(),
            eggs,
            Money::from_str(egg_price).unwrap(),
            30,
            PaymentMethod::Gpay,
            NaiveDate::from_str(on).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_accepted_sale_reduces_stock() {
        let (repo, _temp) = setup_test_db().await;
        let owner = test_owner(&repo, "a@example.com").await;

        repo.insert_purchase(&purchase(&owner, 10, "200", "2024-05-17"))
            .await
            .unwrap();

        let outcome = repo
            .insert_sale_checked(&crate_sale(&owner, 5, "250", "2024-05-17"))
            .await
            .unwrap();

        assert_eq!(outcome, SaleOutcome::Accepted { stock_after: 150 });
        assert_eq!(repo.current_stock_for(&owner).await.unwrap(), 150);
        assert_eq!(repo.list_sales(&owner).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_oversell_rejected_without_mutation() {
        let (repo, _temp) = setup_test_db().await;
        let owner = test_owner(&repo, "a@example.com").await;

        let outcome = repo
            .insert_sale_checked(&loose_sale(&owner, 1, "10", "2024-05-17"))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            SaleOutcome::Rejected {
                available: 0,
                requested: 1
            }
        );
        assert!(repo.list_sales(&owner).await.unwrap().is_empty());
        assert_eq!(repo.current_stock_for(&owner).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_exact_stock_sale_accepted() {
        let (repo, _temp) = setup_test_db().await;
        let owner = test_owner(&repo, "a@example.com").await;

        repo.insert_purchase(&purchase(&owner, 1, "200", "2024-05-17"))
            .await
            .unwrap();

        let outcome = repo
            .insert_sale_checked(&loose_sale(&owner, 30, "10", "2024-05-17"))
            .await
            .unwrap();

        assert_eq!(outcome, SaleOutcome::Accepted { stock_after: 0 });
    }

    #[tokio::test]
    async fn test_concurrent_sales_cannot_oversell() {
        let (repo, _temp) = setup_test_db().await;
        let owner = test_owner(&repo, "a@example.com").await;

        // 300 eggs on hand; two sales of 240 each would jointly oversell
        repo.insert_purchase(&purchase(&owner, 10, "200", "2024-05-17"))
            .await
            .unwrap();

        let first = crate_sale(&owner, 8, "250", "2024-05-17");
        let second = crate_sale(&owner, 8, "250", "2024-05-17");
        let (a, b) = tokio::join!(
            repo.insert_sale_checked(&first),
            repo.insert_sale_checked(&second)
        );

        let outcomes = [a.unwrap(), b.unwrap()];
        let accepted = outcomes
            .iter()
            .filter(|o| matches!(o, SaleOutcome::Accepted { .. }))
            .count();
        assert_eq!(accepted, 1, "exactly one of the sales may pass the check");
        assert_eq!(repo.current_stock_for(&owner).await.unwrap(), 60);
    }

    #[tokio::test]
    async fn test_list_sales_newest_first() {
        let (repo, _temp) = setup_test_db().await;
        let owner = test_owner(&repo, "a@example.com").await;

        repo.insert_purchase(&purchase(&owner, 10, "200", "2024-05-01"))
            .await
            .unwrap();

        let older = crate_sale(&owner, 1, "250", "2024-05-10");
        let newer = crate_sale(&owner, 2, "250", "2024-05-20");
        repo.insert_sale_checked(&older).await.unwrap();
        repo.insert_sale_checked(&newer).await.unwrap();

        let listed = repo.list_sales(&owner).await.unwrap();
        assert_eq!(listed, vec![newer, older]);
    }

    #[tokio::test]
    async fn test_payment_method_round_trips() {
        let (repo, _temp) = setup_test_db().await;
        let owner = test_owner(&repo, "a@example.com").await;

        repo.insert_purchase(&purchase(&owner, 1, "200", "2024-05-17"))
            .await
            .unwrap();
        repo.insert_sale_checked(&loose_sale(&owner, 5, "10", "2024-05-17"))
            .await
            .unwrap();

        let listed = repo.list_sales(&owner).await.unwrap();
        assert_eq!(listed[0].payment_method, PaymentMethod::Gpay);
    }

    #[tokio::test]
    async fn test_delete_sale_scoped_to_owner() {
        let (repo, _temp) = setup_test_db().await;
        let owner_a = test_owner(&repo, "a@example.com").await;
        let owner_b = test_owner(&repo, "b@example.com").await;

        repo.insert_purchase(&purchase(&owner_a, 10, "200", "2024-05-17"))
            .await
            .unwrap();
        let sale = crate_sale(&owner_a, 1, "250", "2024-05-17");
        repo.insert_sale_checked(&sale).await.unwrap();

        assert!(!repo.delete_sale(&owner_b, &sale.id).await.unwrap());
        assert!(repo.delete_sale(&owner_a, &sale.id).await.unwrap());
        assert!(repo.list_sales(&owner_a).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deleting_sale_restores_stock() {
        let (repo, _temp) = setup_test_db().await;
        let owner = test_owner(&repo, "a@example.com").await;

        repo.insert_purchase(&purchase(&owner, 10, "200", "2024-05-17"))
            .await
            .unwrap();
        let sale = crate_sale(&owner, 5, "250", "2024-05-17");
        repo.insert_sale_checked(&sale).await.unwrap();
        assert_eq!(repo.current_stock_for(&owner).await.unwrap(), 150);

        repo.delete_sale(&owner, &sale.id).await.unwrap();
        assert_eq!(repo.current_stock_for(&owner).await.unwrap(), 300);
    }
}
