//! Email log entity model.

use serde::Serialize;
use sqlx::FromRow;

use hrx_core::types::{DbId, Timestamp};

/// A row from the `email_logs` table. One row per queued email; the
/// dispatcher moves it `pending -> sent | failed`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EmailLog {
    pub id: DbId,
    pub recipient_email: String,
    pub recipient_type: String,
    pub subject: String,
    pub template_used: String,
    pub related_id: Option<DbId>,
    pub related_type: Option<String>,
    pub status: String,
    pub error_message: Option<String>,
    pub attempts: i32,
    pub sent_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
