//! Repository for the `email_logs` audit table.

use sqlx::PgPool;

use hrx_core::types::DbId;

use crate::models::email_log::EmailLog;

const COLUMNS: &str = "id, recipient_email, recipient_type, subject, template_used, related_id, \
     related_type, status, error_message, attempts, sent_at, created_at";

/// Provides persistence for the email dispatch audit trail.
pub struct EmailLogRepo;

impl EmailLogRepo {
    /// Record a queued email as `pending` before any delivery attempt.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_pending(
        pool: &PgPool,
        recipient_email: &str,
        recipient_type: &str,
        subject: &str,
        template_used: &str,
        related_id: Option<DbId>,
        related_type: Option<&str>,
    ) -> Result<EmailLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO email_logs (
                recipient_email, recipient_type, subject, template_used, related_id, related_type)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EmailLog>(&query)
            .bind(recipient_email)
            .bind(recipient_type)
            .bind(subject)
            .bind(template_used)
            .bind(related_id)
            .bind(related_type)
            .fetch_one(pool)
            .await
    }

    pub async fn mark_sent(pool: &PgPool, id: DbId, attempts: i32) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE email_logs SET status = 'sent', attempts = $2, sent_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(attempts)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Dead-letter an email after its final failed attempt.
    pub async fn mark_failed(
        pool: &PgPool,
        id: DbId,
        attempts: i32,
        error_message: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE email_logs SET status = 'failed', attempts = $2, error_message = $3
             WHERE id = $1",
        )
        .bind(id)
        .bind(attempts)
        .bind(error_message)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Dispatch history for the admin screen, newest first, optionally
    /// filtered by status or recipient.
    pub async fn history(
        pool: &PgPool,
        status: Option<&str>,
        recipient: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<EmailLog>, sqlx::Error> {
        let mut conditions = Vec::new();
        let mut next_param = 3;
        if status.is_some() {
            conditions.push(format!("status = ${next_param}"));
            next_param += 1;
        }
        if recipient.is_some() {
            conditions.push(format!("recipient_email = ${next_param}"));
        }
        let filter = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let query = format!(
            "SELECT {COLUMNS} FROM email_logs {filter} \
             ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        );
        let mut q = sqlx::query_as::<_, EmailLog>(&query).bind(limit).bind(offset);
        if let Some(status) = status {
            q = q.bind(status);
        }
        if let Some(recipient) = recipient {
            q = q.bind(recipient);
        }
        q.fetch_all(pool).await
    }
}
