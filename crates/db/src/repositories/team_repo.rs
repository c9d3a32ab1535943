//! Repository for the `project_team` table and the invitation token flow.

use sqlx::{PgConnection, PgPool};

use hrx_core::types::{DbId, Timestamp};

use crate::models::team_member::{CreateTeamMember, TeamMember, UpdateTeamMember};

const COLUMNS: &str = "id, project_id, professional_id, external_name, role, category, quantity, \
     daily_rate, duration_days, total_cost, status, invitation_token, token_expires_at, \
     invited_at, confirmed_at, created_at, updated_at";

/// Provides CRUD operations and invitation-token updates for team lines.
pub struct TeamRepo;

impl TeamRepo {
    /// Insert a staffing line. `total_cost` is the pre-derived line amount.
    pub async fn create(
        conn: &mut PgConnection,
        project_id: DbId,
        input: &CreateTeamMember,
        total_cost: f64,
    ) -> Result<TeamMember, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_team (
                project_id, professional_id, external_name, role, category,
                quantity, daily_rate, duration_days, total_cost)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TeamMember>(&query)
            .bind(project_id)
            .bind(input.professional_id)
            .bind(&input.external_name)
            .bind(&input.role)
            .bind(&input.category)
            .bind(input.quantity)
            .bind(input.daily_rate)
            .bind(input.duration_days)
            .bind(total_cost)
            .fetch_one(conn)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TeamMember>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_team WHERE id = $1");
        sqlx::query_as::<_, TeamMember>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Look up a team line by its invitation token.
    pub async fn find_by_token(
        pool: &PgPool,
        token: &str,
    ) -> Result<Option<TeamMember>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_team WHERE invitation_token = $1");
        sqlx::query_as::<_, TeamMember>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<TeamMember>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM project_team WHERE project_id = $1 ORDER BY id");
        sqlx::query_as::<_, TeamMember>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update a staffing line's editable fields, re-deriving `total_cost`.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        input: &UpdateTeamMember,
        total_cost: f64,
    ) -> Result<Option<TeamMember>, sqlx::Error> {
        let query = format!(
            "UPDATE project_team SET
                role = COALESCE($2, role),
                category = COALESCE($3, category),
                quantity = COALESCE($4, quantity),
                daily_rate = COALESCE($5, daily_rate),
                duration_days = COALESCE($6, duration_days),
                total_cost = $7,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TeamMember>(&query)
            .bind(id)
            .bind(&input.role)
            .bind(&input.category)
            .bind(input.quantity)
            .bind(input.daily_rate)
            .bind(input.duration_days)
            .bind(total_cost)
            .fetch_optional(conn)
            .await
    }

    /// Delete a staffing line. Returns `true` if a row was removed.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM project_team WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Issue an invitation: set the token, its deadline, and move the line
    /// to `invited`. Only `draft` and `invited` lines can be (re-)invited.
    ///
    /// Returns `false` when the line is already decided.
    pub async fn issue_invitation(
        pool: &PgPool,
        id: DbId,
        token: &str,
        expires_at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE project_team SET
                status = 'invited',
                invitation_token = $2,
                token_expires_at = $3,
                invited_at = NOW(),
                updated_at = NOW()
             WHERE id = $1 AND status IN ('draft', 'invited')",
        )
        .bind(id)
        .bind(token)
        .bind(expires_at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Atomically decide an invitation: `invited -> confirmed | rejected`.
    ///
    /// The `WHERE status = 'invited'` clause is the single-submission guard;
    /// zero rows affected means another request decided first (or the state
    /// changed) and the caller must report a conflict.
    pub async fn decide_invitation(
        pool: &PgPool,
        id: DbId,
        new_status: &str,
        confirmed: bool,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE project_team SET
                status = $2,
                confirmed_at = CASE WHEN $3 THEN NOW() ELSE NULL END,
                updated_at = NOW()
             WHERE id = $1 AND status = 'invited'",
        )
        .bind(id)
        .bind(new_status)
        .bind(confirmed)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
