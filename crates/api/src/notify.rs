//! Best-effort side effects: outbound email enqueueing and in-app
//! notification fan-out.
//!
//! Both are fire-and-observe from the handler's point of view: failures are
//! logged and never fail the primary write that triggered them.

use hrx_core::types::DbId;
use hrx_db::models::notification::NewNotification;
use hrx_db::repositories::{EmailLogRepo, NotificationRepo, UserRepo};
use hrx_db::DbPool;
use hrx_email::{EmailJob, EmailMessage};

use crate::state::AppState;

/// Record a `pending` email_logs row and push the job onto the queue.
///
/// A saturated queue dead-letters the log row immediately so the admin email
/// history shows the drop.
pub async fn queue_email(
    state: &AppState,
    to: &str,
    recipient_type: &str,
    template: &str,
    message: EmailMessage,
    related_id: Option<DbId>,
    related_type: Option<&str>,
) {
    let log = match EmailLogRepo::create_pending(
        &state.pool,
        to,
        recipient_type,
        &message.subject,
        template,
        related_id,
        related_type,
    )
    .await
    {
        Ok(log) => log,
        Err(e) => {
            tracing::error!(to, template, error = %e, "Failed to record outbound email");
            return;
        }
    };

    let job = EmailJob {
        log_id: log.id,
        to: to.to_string(),
        message,
    };
    if state.email.enqueue(job).is_err() {
        if let Err(e) = EmailLogRepo::mark_failed(&state.pool, log.id, 0, "email queue full").await
        {
            tracing::error!(log_id = log.id, error = %e, "Failed to dead-letter dropped email");
        }
    }
}

/// Create an in-app notification for every active admin.
pub async fn notify_admins(
    pool: &DbPool,
    notification_type: &str,
    priority: &str,
    title: &str,
    message: &str,
    related_id: Option<DbId>,
    related_type: Option<&str>,
) {
    let admin_ids = match UserRepo::admin_ids(pool).await {
        Ok(ids) => ids,
        Err(e) => {
            tracing::error!(error = %e, "Failed to resolve admin users for notification");
            return;
        }
    };

    for user_id in admin_ids {
        let input = NewNotification {
            user_id,
            notification_type: notification_type.to_string(),
            priority: priority.to_string(),
            title: title.to_string(),
            message: message.to_string(),
            related_id,
            related_type: related_type.map(str::to_string),
        };
        if let Err(e) = NotificationRepo::create(pool, &input).await {
            tracing::error!(user_id, error = %e, "Failed to create admin notification");
        }
    }
}
