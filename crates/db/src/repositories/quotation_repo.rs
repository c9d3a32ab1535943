//! Repository for the `supplier_quotations` table and the token-addressed
//! submission flow.

use sqlx::{PgConnection, PgPool};

use hrx_core::quotation::QuoteSubmission;
use hrx_core::types::{DbId, Timestamp};

use crate::models::quotation::{PublicQuotation, Quotation};

const COLUMNS: &str = "id, project_id, supplier_id, token, requested_items, status, valid_until, \
     total_price, daily_rate, delivery_fee, setup_fee, payment_terms, delivery_details, notes, \
     submitted_at, created_at, updated_at";

/// Provides quotation persistence and the atomic submit/accept updates.
pub struct QuotationRepo;

impl QuotationRepo {
    /// Insert one quotation of a fan-out. `requested_items` is a snapshot of
    /// the equipment lines at request time.
    pub async fn create(
        conn: &mut PgConnection,
        project_id: DbId,
        supplier_id: DbId,
        token: &str,
        requested_items: &serde_json::Value,
        valid_until: Timestamp,
    ) -> Result<Quotation, sqlx::Error> {
        let query = format!(
            "INSERT INTO supplier_quotations (project_id, supplier_id, token, requested_items, valid_until)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Quotation>(&query)
            .bind(project_id)
            .bind(supplier_id)
            .bind(token)
            .bind(requested_items)
            .bind(valid_until)
            .fetch_one(conn)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Quotation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM supplier_quotations WHERE id = $1");
        sqlx::query_as::<_, Quotation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_token(
        pool: &PgPool,
        token: &str,
    ) -> Result<Option<Quotation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM supplier_quotations WHERE token = $1");
        sqlx::query_as::<_, Quotation>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    /// The joined view behind the public token endpoint. Exposes only the
    /// event context a supplier needs to price the request.
    pub async fn find_public_by_token(
        pool: &PgPool,
        token: &str,
    ) -> Result<Option<PublicQuotation>, sqlx::Error> {
        let row: Option<(
            String,
            serde_json::Value,
            Option<Timestamp>,
            Option<Timestamp>,
            Option<f64>,
            String,
            String,
            Option<String>,
            Option<String>,
            Option<String>,
            Option<String>,
            String,
            String,
            String,
            String,
            String,
        )> = sqlx::query_as(
            "SELECT q.status, q.requested_items, q.valid_until, q.submitted_at, q.total_price,
                    p.project_number, p.event_name, p.event_date, p.start_time, p.end_time,
                    p.venue_name, p.venue_address, p.venue_city, p.venue_state,
                    s.company_name, s.contact_name
             FROM supplier_quotations q
             JOIN event_projects p ON p.id = q.project_id
             JOIN equipment_suppliers s ON s.id = q.supplier_id
             WHERE q.token = $1",
        )
        .bind(token)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(
            |(
                status,
                requested_items,
                valid_until,
                submitted_at,
                total_price,
                project_number,
                event_name,
                event_date,
                start_time,
                end_time,
                venue_name,
                venue_address,
                venue_city,
                venue_state,
                supplier_company,
                supplier_contact,
            )| PublicQuotation {
                status,
                requested_items,
                valid_until,
                submitted_at,
                total_price,
                project_number,
                event_name,
                event_date,
                start_time,
                end_time,
                venue_name,
                venue_address,
                venue_city,
                venue_state,
                supplier_company,
                supplier_contact,
            },
        ))
    }

    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Quotation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM supplier_quotations WHERE project_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, Quotation>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Atomically record a supplier's submission: `sent -> submitted`.
    ///
    /// The `WHERE status = 'sent'` clause is the single-submission guard;
    /// zero rows affected means the quote was already submitted or decided
    /// and the caller must report a conflict.
    pub async fn submit(
        pool: &PgPool,
        id: DbId,
        submission: &QuoteSubmission,
    ) -> Result<Option<Quotation>, sqlx::Error> {
        let query = format!(
            "UPDATE supplier_quotations SET
                status = 'submitted',
                total_price = $2,
                daily_rate = $3,
                delivery_fee = $4,
                setup_fee = $5,
                payment_terms = $6,
                delivery_details = $7,
                notes = $8,
                submitted_at = NOW(),
                updated_at = NOW()
             WHERE id = $1 AND status = 'sent'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Quotation>(&query)
            .bind(id)
            .bind(submission.total_price)
            .bind(submission.daily_rate)
            .bind(submission.delivery_fee)
            .bind(submission.setup_fee)
            .bind(&submission.payment_terms)
            .bind(&submission.delivery_details)
            .bind(&submission.notes)
            .fetch_optional(pool)
            .await
    }

    /// Atomically accept a submitted quotation: `submitted -> accepted`.
    /// Returns `None` when the quote is not in `submitted` state.
    pub async fn accept(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Quotation>, sqlx::Error> {
        let query = format!(
            "UPDATE supplier_quotations SET
                status = 'accepted',
                updated_at = NOW()
             WHERE id = $1 AND status = 'submitted'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Quotation>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Reject the other open quotations of the same project once one has
    /// been accepted.
    pub async fn reject_siblings(
        conn: &mut PgConnection,
        project_id: DbId,
        accepted_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE supplier_quotations SET
                status = 'rejected',
                updated_at = NOW()
             WHERE project_id = $1 AND id <> $2 AND status IN ('sent', 'submitted')",
        )
        .bind(project_id)
        .bind(accepted_id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }
}
