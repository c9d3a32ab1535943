//! Notification entity model.

use serde::Serialize;
use sqlx::FromRow;

use hrx_core::types::{DbId, Timestamp};

/// A row from the `notifications` table. After creation only the read state
/// mutates.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub notification_type: String,
    pub priority: String,
    pub title: String,
    pub message: String,
    pub related_id: Option<DbId>,
    pub related_type: Option<String>,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// Input for creating a notification as a side effect of a transition.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: DbId,
    pub notification_type: String,
    pub priority: String,
    pub title: String,
    pub message: String,
    pub related_id: Option<DbId>,
    pub related_type: Option<String>,
}
