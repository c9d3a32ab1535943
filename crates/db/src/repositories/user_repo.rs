//! Repository for the `users` table.

use sqlx::PgPool;

use hrx_core::types::DbId;

use crate::models::user::User;

const COLUMNS: &str = "id, email, password_hash, full_name, role, is_active, created_at, updated_at";

/// Provides persistence for user accounts.
pub struct UserRepo;

impl UserRepo {
    pub async fn create(
        pool: &PgPool,
        email: &str,
        password_hash: &str,
        full_name: &str,
        role: &str,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, password_hash, full_name, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .bind(password_hash)
            .bind(full_name)
            .bind(role)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Admin user ids, used when fanning out notifications.
    pub async fn admin_ids(pool: &PgPool) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM users WHERE role = 'admin' AND is_active = TRUE")
            .fetch_all(pool)
            .await
    }

    /// Admin email addresses, used when fanning out email notices.
    pub async fn admin_emails(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT email FROM users WHERE role = 'admin' AND is_active = TRUE")
            .fetch_all(pool)
            .await
    }
}
