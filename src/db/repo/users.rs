//! Account and per-tenant settings operations for the repository.

use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::{now_ms, Repository, UserRecord};

impl Repository {
    /// Create an account. Returns `None` when the email is already taken.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<UserRecord>, sqlx::Error> {
        let id = Uuid::new_v4().to_string();

        let result = sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(email) DO NOTHING
            "#,
        )
        .bind(&id)
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(now_ms())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_user_by_id(&id).await
    }

    /// Look up an account by email.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserRecord>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, password_hash, eggs_per_crate, crates_per_box, created_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| user_from_row(&r)))
    }

    /// Look up an account by id.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn find_user_by_id(&self, user_id: &str) -> Result<Option<UserRecord>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, password_hash, eggs_per_crate, crates_per_box, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| user_from_row(&r)))
    }

    /// Update per-tenant defaults. `None` leaves a value unchanged.
    ///
    /// Returns the updated record, or `None` for an unknown user.
    ///
    /// # Errors
    /// Returns an error if the update fails.
    pub async fn update_settings(
        &self,
        user_id: &str,
        eggs_per_crate: Option<i64>,
        crates_per_box: Option<i64>,
    ) -> Result<Option<UserRecord>, sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE users SET
                eggs_per_crate = COALESCE(?, eggs_per_crate),
                crates_per_box = COALESCE(?, crates_per_box)
            WHERE id = ?
            "#,
        )
        .bind(eggs_per_crate)
        .bind(crates_per_box)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        self.find_user_by_id(user_id).await
    }
}

fn user_from_row(row: &SqliteRow) -> UserRecord {
    UserRecord {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        eggs_per_crate: row.get("eggs_per_crate"),
        crates_per_box: row.get("crates_per_box"),
        created_at: row.get("created_at"),
    }
}
