//! User account model.

use serde::Serialize;
use sqlx::FromRow;

use hrx_core::types::{DbId, Timestamp};

/// A row from the `users` table. The password hash never leaves this crate
/// serialized; it is skipped on output.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
