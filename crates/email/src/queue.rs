//! Bounded email dispatch queue.
//!
//! Handlers enqueue with `try_send` so a saturated queue pushes back
//! immediately instead of blocking a request. A single worker drains the
//! queue, retrying each job up to [`MAX_ATTEMPTS`] times with doubling
//! backoff. Jobs that exhaust their retries are dead-lettered: the
//! corresponding `email_logs` row is marked `failed` with the last error.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use hrx_core::types::DbId;
use hrx_db::repositories::EmailLogRepo;
use hrx_db::DbPool;

use crate::mailer::Mailer;
use crate::templates::EmailMessage;

/// Capacity of the dispatch queue.
pub const QUEUE_CAPACITY: usize = 256;

/// Delivery attempts per job before dead-lettering.
pub const MAX_ATTEMPTS: u32 = 3;

/// Backoff before the second attempt; doubles each retry.
const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

/// A queued email, tied to its `email_logs` audit row.
#[derive(Debug, Clone)]
pub struct EmailJob {
    pub log_id: DbId,
    pub to: String,
    pub message: EmailMessage,
}

/// Returned when the queue is saturated. Callers treat this as a transient
/// server-side condition; the audit row stays `pending`.
#[derive(Debug, thiserror::Error)]
#[error("email queue is full")]
pub struct QueueFullError;

/// Cloneable producer handle given to the API layer.
#[derive(Clone)]
pub struct EmailQueue {
    tx: mpsc::Sender<EmailJob>,
}

impl EmailQueue {
    /// Create the queue and its consumer end.
    pub fn channel() -> (Self, mpsc::Receiver<EmailJob>) {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        (Self { tx }, rx)
    }

    /// Enqueue without blocking. Fails fast when the queue is full.
    pub fn enqueue(&self, job: EmailJob) -> Result<(), QueueFullError> {
        self.tx.try_send(job).map_err(|err| {
            tracing::error!(error = %err, "Failed to enqueue email");
            QueueFullError
        })
    }
}

/// Background service that drains the queue and records outcomes.
pub struct EmailWorker {
    pool: DbPool,
    mailer: Arc<dyn Mailer>,
}

impl EmailWorker {
    pub fn new(pool: DbPool, mailer: Arc<dyn Mailer>) -> Self {
        Self { pool, mailer }
    }

    /// Run the dispatch loop until the queue closes or the token cancels.
    /// Cancellation finishes the in-flight job first.
    pub async fn run(&self, mut rx: mpsc::Receiver<EmailJob>, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Email worker cancelled");
                    break;
                }
                job = rx.recv() => {
                    let Some(job) = job else {
                        tracing::info!("Email queue closed");
                        break;
                    };
                    self.process(job).await;
                }
            }
        }
    }

    async fn process(&self, job: EmailJob) {
        let log_id = job.log_id;
        match deliver_with_retry(self.mailer.as_ref(), &job).await {
            Ok(attempts) => {
                if let Err(e) = EmailLogRepo::mark_sent(&self.pool, log_id, attempts as i32).await {
                    tracing::error!(log_id, error = %e, "Failed to record sent email");
                }
            }
            Err((attempts, last_error)) => {
                tracing::error!(log_id, attempts, %last_error, "Email dead-lettered");
                if let Err(e) =
                    EmailLogRepo::mark_failed(&self.pool, log_id, attempts as i32, &last_error)
                        .await
                {
                    tracing::error!(log_id, error = %e, "Failed to record dead-lettered email");
                }
            }
        }
    }
}

/// Attempt delivery up to [`MAX_ATTEMPTS`] times with doubling backoff.
/// Returns the attempt count on success, or the count plus the last error.
async fn deliver_with_retry(mailer: &dyn Mailer, job: &EmailJob) -> Result<u32, (u32, String)> {
    let mut delay = RETRY_BASE_DELAY;
    let mut last_error = String::new();

    for attempt in 1..=MAX_ATTEMPTS {
        match mailer.send(&job.to, &job.message).await {
            Ok(()) => return Ok(attempt),
            Err(err) => {
                last_error = err.to_string();
                tracing::warn!(
                    log_id = job.log_id,
                    attempt,
                    error = %last_error,
                    "Email delivery attempt failed"
                );
                if attempt < MAX_ATTEMPTS {
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
            }
        }
    }
    Err((MAX_ATTEMPTS, last_error))
}
