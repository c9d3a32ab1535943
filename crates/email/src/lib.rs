//! Outbound email: templates, SMTP transport, and the dispatch queue.
//!
//! Handlers never talk SMTP. They render a template, record a `pending` row
//! in `email_logs`, and enqueue a job on the bounded queue. A single worker
//! drains the queue, retries transient failures with doubling backoff, and
//! dead-letters exhausted jobs by marking the log row `failed`.

pub mod mailer;
pub mod queue;
pub mod templates;

pub use mailer::{LogMailer, Mailer, MailerError, SmtpConfig, SmtpMailer};
pub use queue::{EmailJob, EmailQueue, EmailWorker, QueueFullError};
pub use templates::EmailMessage;
