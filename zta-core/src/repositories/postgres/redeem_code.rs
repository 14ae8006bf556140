// src/repositories/postgres/redeem_code.rs

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use zta_common::models::{ClaimOutcome, RedeemCode};
use zta_common::traits::RedeemCodeRepository;

use crate::Error;

pub struct PostgresRedeemCodeRepository {
    pub pool: Pool<Postgres>,
}

impl PostgresRedeemCodeRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn row_to_code(r: &sqlx::postgres::PgRow) -> Result<RedeemCode, Error> {
    Ok(RedeemCode {
        code: r.try_get("code")?,
        role: r.try_get("role")?,
        used: r.try_get("used")?,
        used_by: r.try_get("used_by")?,
        used_at: r.try_get("used_at")?,
    })
}

#[async_trait]
impl RedeemCodeRepository for PostgresRedeemCodeRepository {
    async fn create(&self, code: &RedeemCode) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO redeem_codes (code, role, used, used_by, used_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&code.code)
        .bind(&code.role)
        .bind(code.used)
        .bind(code.used_by)
        .bind(code.used_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, code: &str) -> Result<Option<RedeemCode>, Error> {
        let row = sqlx::query(
            r#"
            SELECT code, role, used, used_by, used_at
            FROM redeem_codes
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_code).transpose()
    }

    /// One transaction: conditionally burn the code, then merge the role
    /// onto the claimant's profile. The `used = FALSE` guard in the UPDATE
    /// is what closes the double-claim window; a concurrent claimant
    /// serializes on the row lock and sees zero rows updated.
    async fn claim(&self, code: &str, user_id: Uuid) -> Result<ClaimOutcome, Error> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            UPDATE redeem_codes
            SET used = TRUE, used_by = $2, used_at = $3
            WHERE code = $1 AND used = FALSE
            RETURNING code, role, used, used_by, used_at
            "#,
        )
        .bind(code)
        .bind(user_id)
        .bind(Utc::now())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(r) = row else {
            tx.rollback().await?;
            // Nothing was burned; decide which rejection this is.
            return Ok(match self.get(code).await? {
                Some(_) => ClaimOutcome::AlreadyClaimed,
                None => ClaimOutcome::NotFound,
            });
        };

        let claimed = row_to_code(&r)?;

        let res = sqlx::query(
            r#"
            UPDATE users SET role = $1 WHERE user_id = $2
            "#,
        )
        .bind(&claimed.role)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        if res.rows_affected() == 0 {
            // No profile to grant onto: roll back so the code is not burned.
            tx.rollback().await?;
            return Err(Error::NotFound(format!("no profile for user {user_id}")));
        }

        tx.commit().await?;
        Ok(ClaimOutcome::Claimed(claimed))
    }

    async fn list_all(&self) -> Result<Vec<RedeemCode>, Error> {
        let rows = sqlx::query_as::<_, RedeemCode>(
            r#"
            SELECT code, role, used, used_by, used_at
            FROM redeem_codes
            ORDER BY code ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn delete(&self, code: &str) -> Result<(), Error> {
        sqlx::query("DELETE FROM redeem_codes WHERE code = $1")
            .bind(code)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
