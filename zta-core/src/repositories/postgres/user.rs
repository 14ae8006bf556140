// src/repositories/postgres/user.rs

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use zta_common::models::UserAccount;
use zta_common::traits::UserRepository;

use crate::Error;

pub struct PostgresUserRepository {
    pub pool: Pool<Postgres>,
}

impl PostgresUserRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn row_to_user(r: &sqlx::postgres::PgRow) -> Result<UserAccount, Error> {
    Ok(UserAccount {
        user_id: r.try_get("user_id")?,
        username: r.try_get("username")?,
        email: r.try_get("email")?,
        banned: r.try_get("banned")?,
        role: r.try_get("role")?,
        created_at: r.try_get("created_at")?,
    })
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: &UserAccount) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id, username, email, banned, role, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.user_id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.banned)
        .bind(&user.role)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, user_id: Uuid) -> Result<Option<UserAccount>, Error> {
        let row = sqlx::query(
            r#"
            SELECT user_id, username, email, banned, role, created_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<UserAccount>, Error> {
        let row = sqlx::query(
            r#"
            SELECT user_id, username, email, banned, role, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.trim().to_lowercase())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn update(&self, user: &UserAccount) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE users
            SET username = $1,
                email = $2,
                banned = $3,
                role = $4
            WHERE user_id = $5
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.banned)
        .bind(&user.role)
        .bind(user.user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn grant_role(&self, user_id: Uuid, role: &str) -> Result<(), Error> {
        let res = sqlx::query(
            r#"
            UPDATE users SET role = $1 WHERE user_id = $2
            "#,
        )
        .bind(role)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if res.rows_affected() == 0 {
            return Err(Error::NotFound(format!("no profile for user {user_id}")));
        }
        Ok(())
    }

    async fn set_banned(&self, user_id: Uuid, banned: bool) -> Result<(), Error> {
        let res = sqlx::query(
            r#"
            UPDATE users SET banned = $1 WHERE user_id = $2
            "#,
        )
        .bind(banned)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if res.rows_affected() == 0 {
            return Err(Error::NotFound(format!("no profile for user {user_id}")));
        }
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<UserAccount>, Error> {
        let rows = sqlx::query_as::<_, UserAccount>(
            r#"
            SELECT user_id, username, email, banned, role, created_at
            FROM users
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
