//! Account repository.

use sqlx::postgres::PgPool;
use uuid::Uuid;

use super::models::{Account, AccountInfo, CreateAccountParams};
use crate::error::AppError;

/// Postgres error code for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

/// Database repository for account operations
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get an account by email (case-insensitive)
    pub async fn get_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, password, is_admin, created_at
              FROM account
             WHERE LOWER(email) = LOWER($1)
             LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(Into::into)
    }

    /// Get an account by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<Account, AppError> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, password, is_admin, created_at
              FROM account
             WHERE id = $1
             LIMIT 1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found("Account", id))
    }

    /// List all accounts, without password hashes
    pub async fn list(&self) -> Result<Vec<AccountInfo>, AppError> {
        sqlx::query_as::<_, AccountInfo>(
            r#"
            SELECT id, email, is_admin, created_at
              FROM account
             ORDER BY email
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Into::into)
    }

    /// Create a new account
    pub async fn create(&self, params: CreateAccountParams) -> Result<Uuid, AppError> {
        sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO account (id, email, password, is_admin)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(params.id)
        .bind(&params.email)
        .bind(&params.password_hash)
        .bind(params.is_admin)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err)
                if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                AppError::conflict("Account", "email")
            }
            _ => e.into(),
        })
    }

    /// Update an account's password hash
    pub async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE account
               SET password = $2
             WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Account", id));
        }

        Ok(())
    }

    /// Delete an account and cascade-delete every speaker it created.
    ///
    /// Both deletes run in one transaction. Returns the number of speakers
    /// removed with the account.
    pub async fn delete(&self, id: Uuid) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;

        let email: Option<String> =
            sqlx::query_scalar(r#"SELECT email FROM account WHERE id = $1"#)
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(email) = email else {
            return Err(AppError::not_found("Account", id));
        };

        let cascaded = sqlx::query(
            r#"
            DELETE FROM speaker
             WHERE LOWER(created_by) = LOWER($1)
            "#,
        )
        .bind(&email)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        sqlx::query(r#"DELETE FROM account WHERE id = $1"#)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(cascaded)
    }
}
