// src/repositories/postgres/presence.rs

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use zta_common::models::{PresenceMarker, PresenceState};
use zta_common::traits::PresenceRepository;

use crate::Error;

pub struct PostgresPresenceRepository {
    pub pool: Pool<Postgres>,
}

impl PostgresPresenceRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PresenceRepository for PostgresPresenceRepository {
    async fn set_status(&self, marker: &PresenceMarker) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO presence (user_id, state, updated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id)
            DO UPDATE SET
               state      = EXCLUDED.state,
               updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(marker.user_id)
        .bind(marker.state.as_str())
        .bind(marker.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_status(&self, user_id: Uuid) -> Result<Option<PresenceMarker>, Error> {
        let row = sqlx::query(
            r#"
            SELECT user_id, state, updated_at
            FROM presence
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(r) = row {
            let raw: String = r.try_get("state")?;
            let state = PresenceState::from_str(&raw)
                .ok_or_else(|| Error::Parse(format!("unknown presence state '{raw}'")))?;
            Ok(Some(PresenceMarker {
                user_id: r.try_get("user_id")?,
                state,
                updated_at: r.try_get("updated_at")?,
            }))
        } else {
            Ok(None)
        }
    }

    async fn sweep_stale(&self, ttl: Duration) -> Result<u64, Error> {
        let cutoff = Utc::now() - ttl;
        let res = sqlx::query(
            r#"
            UPDATE presence
            SET state = 'offline', updated_at = $1
            WHERE state = 'online' AND updated_at < $2
            "#,
        )
        .bind(Utc::now())
        .bind(cutoff)
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected())
    }
}
