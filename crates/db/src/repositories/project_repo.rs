//! Repository for the `event_projects` table, including the financial
//! rollup recompute.

use sqlx::{PgConnection, PgPool};

use hrx_core::finance::{self, Totals};
use hrx_core::types::DbId;

use crate::models::project::{CreateProject, Project, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_number, status, client_name, client_email, client_phone, \
     client_company, client_cnpj, event_name, event_type, event_description, event_date, \
     start_time, end_time, expected_attendance, venue_name, venue_address, venue_city, \
     venue_state, venue_zip, latitude, longitude, budget_range, client_budget, is_urgent, \
     additional_notes, profit_margin, total_team_cost, total_equipment_cost, total_cost, \
     total_client_price, total_profit, created_by, created_at, updated_at";

/// Provides CRUD operations and the totals recompute for event projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row. The project number
    /// is generated by the database default.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProject,
        created_by: Option<DbId>,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO event_projects (
                client_name, client_email, client_phone, client_company, client_cnpj,
                event_name, event_type, event_description, event_date, start_time, end_time,
                expected_attendance, venue_name, venue_address, venue_city, venue_state,
                venue_zip, latitude, longitude, budget_range, client_budget, is_urgent,
                additional_notes, profit_margin, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                     $17, $18, $19, $20, $21, $22, $23, COALESCE($24, 30), $25)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.client_name)
            .bind(&input.client_email)
            .bind(&input.client_phone)
            .bind(&input.client_company)
            .bind(&input.client_cnpj)
            .bind(&input.event_name)
            .bind(&input.event_type)
            .bind(&input.event_description)
            .bind(&input.event_date)
            .bind(&input.start_time)
            .bind(&input.end_time)
            .bind(input.expected_attendance)
            .bind(&input.venue_name)
            .bind(&input.venue_address)
            .bind(&input.venue_city)
            .bind(&input.venue_state)
            .bind(&input.venue_zip)
            .bind(latitude)
            .bind(longitude)
            .bind(&input.budget_range)
            .bind(input.client_budget)
            .bind(input.is_urgent)
            .bind(&input.additional_notes)
            .bind(input.profit_margin)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM event_projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Transaction-scoped lookup used by flows that recompute totals.
    pub async fn find_by_id_conn(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM event_projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List projects, newest first, optionally filtered by status.
    pub async fn list(
        pool: &PgPool,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let filter = if status.is_some() { "WHERE status = $3" } else { "" };
        let query = format!(
            "SELECT {COLUMNS} FROM event_projects {filter} \
             ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        );
        let mut q = sqlx::query_as::<_, Project>(&query).bind(limit).bind(offset);
        if let Some(status) = status {
            q = q.bind(status);
        }
        q.fetch_all(pool).await
    }

    /// Update mutable project fields. Returns `None` if no row exists.
    ///
    /// Does NOT touch the derived totals; callers that change
    /// `profit_margin` must follow up with [`Self::recompute_totals`] in the
    /// same transaction.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE event_projects SET
                status = COALESCE($2, status),
                profit_margin = COALESCE($3, profit_margin),
                event_description = COALESCE($4, event_description),
                additional_notes = COALESCE($5, additional_notes),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.status)
            .bind(input.profit_margin)
            .bind(&input.event_description)
            .bind(&input.additional_notes)
            .fetch_optional(conn)
            .await
    }

    /// Recompute and persist the five derived monetary fields.
    ///
    /// Sums team line totals (all rows regardless of invitation status) and
    /// equipment line totals where an accepted quotation is linked, then
    /// applies the margin formulas. Runs on a connection so callers can
    /// execute it inside the same transaction as the triggering write.
    pub async fn recompute_totals(
        conn: &mut PgConnection,
        project_id: DbId,
    ) -> Result<Totals, sqlx::Error> {
        let margin: f64 =
            sqlx::query_scalar("SELECT profit_margin FROM event_projects WHERE id = $1")
                .bind(project_id)
                .fetch_one(&mut *conn)
                .await?;

        let team_costs: Vec<f64> =
            sqlx::query_scalar("SELECT total_cost FROM project_team WHERE project_id = $1")
                .bind(project_id)
                .fetch_all(&mut *conn)
                .await?;

        let equipment_costs: Vec<f64> = sqlx::query_scalar(
            "SELECT total_cost FROM project_equipment \
             WHERE project_id = $1 AND accepted_quotation_id IS NOT NULL",
        )
        .bind(project_id)
        .fetch_all(&mut *conn)
        .await?;

        let totals = finance::recompute_totals(&team_costs, &equipment_costs, margin);

        sqlx::query(
            "UPDATE event_projects SET
                total_team_cost = $2,
                total_equipment_cost = $3,
                total_cost = $4,
                total_client_price = $5,
                total_profit = $6,
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(project_id)
        .bind(totals.total_team_cost)
        .bind(totals.total_equipment_cost)
        .bind(totals.total_cost)
        .bind(totals.total_client_price)
        .bind(totals.total_profit)
        .execute(conn)
        .await?;

        tracing::debug!(
            project_id,
            total_cost = totals.total_cost,
            total_client_price = totals.total_client_price,
            "Recomputed project totals"
        );
        Ok(totals)
    }

    /// Counts per status for the admin dashboard.
    pub async fn count_by_status(pool: &PgPool) -> Result<Vec<(String, i64)>, sqlx::Error> {
        sqlx::query_as::<_, (String, i64)>(
            "SELECT status, COUNT(*) FROM event_projects GROUP BY status",
        )
        .fetch_all(pool)
        .await
    }
}
