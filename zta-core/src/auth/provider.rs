// src/auth/provider.rs
//
// Credential storage behind the AuthProvider seam. Passwords are hashed
// with argon2id; the stored hash never leaves this module.

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use zta_common::traits::AuthProvider;

use crate::Error;

/// Mirrors the hosted provider's weak-password floor.
const MIN_PASSWORD_LEN: usize = 6;

pub struct PostgresAuthProvider {
    pub pool: Pool<Postgres>,
}

impl PostgresAuthProvider {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthProvider for PostgresAuthProvider {
    async fn create_identity(&self, email: &str, password: &str) -> Result<Uuid, Error> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(Error::Auth(format!("'{email}' is not a valid email")));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(Error::Auth(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| Error::Auth(format!("failed to hash password: {e}")))?
            .to_string();

        let user_id = Uuid::new_v4();
        let res = sqlx::query(
            r#"
            INSERT INTO auth_credentials (user_id, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(&email)
        .bind(&hash)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if res.rows_affected() == 0 {
            return Err(Error::Auth(format!("email '{email}' is already registered")));
        }
        Ok(user_id)
    }

    async fn verify(&self, email: &str, password: &str) -> Result<Uuid, Error> {
        let email = email.trim().to_lowercase();
        let row = sqlx::query(
            r#"
            SELECT user_id, password_hash
            FROM auth_credentials
            WHERE email = $1
            "#,
        )
        .bind(&email)
        .fetch_optional(&self.pool)
        .await?;

        // One rejection message for both unknown email and bad password.
        let invalid = || Error::Auth("invalid email or password".to_string());

        let r = row.ok_or_else(invalid)?;
        let stored: String = r.try_get("password_hash")?;
        let parsed = PasswordHash::new(&stored)
            .map_err(|e| Error::Auth(format!("stored hash is unreadable: {e}")))?;

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| invalid())?;

        Ok(r.try_get("user_id")?)
    }
}
