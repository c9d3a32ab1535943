//! Repository for the `project_equipment` table.

use sqlx::{PgConnection, PgPool};

use hrx_core::types::DbId;

use crate::models::equipment::{CreateEquipmentItem, EquipmentItem};

const COLUMNS: &str = "id, project_id, equipment_type, description, quantity, duration_days, \
     accepted_quotation_id, total_cost, created_at, updated_at";

/// Provides CRUD operations for equipment lines.
pub struct EquipmentRepo;

impl EquipmentRepo {
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateEquipmentItem,
    ) -> Result<EquipmentItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_equipment (project_id, equipment_type, description, quantity, duration_days)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EquipmentItem>(&query)
            .bind(project_id)
            .bind(&input.equipment_type)
            .bind(&input.description)
            .bind(input.quantity)
            .bind(input.duration_days)
            .fetch_one(pool)
            .await
    }

    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<EquipmentItem>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM project_equipment WHERE project_id = $1 ORDER BY id");
        sqlx::query_as::<_, EquipmentItem>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Fetch the subset of a project's equipment lines named in a quote
    /// request, in a stable order.
    pub async fn list_by_ids(
        conn: &mut PgConnection,
        project_id: DbId,
        ids: &[DbId],
    ) -> Result<Vec<EquipmentItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_equipment \
             WHERE project_id = $1 AND id = ANY($2) ORDER BY id"
        );
        sqlx::query_as::<_, EquipmentItem>(&query)
            .bind(project_id)
            .bind(ids)
            .fetch_all(conn)
            .await
    }

    /// Link an equipment line to its accepted quotation and set the derived
    /// line cost. Runs transaction-scoped alongside the totals recompute.
    pub async fn apply_accepted_quote(
        conn: &mut PgConnection,
        id: DbId,
        quotation_id: DbId,
        total_cost: f64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE project_equipment SET
                accepted_quotation_id = $2,
                total_cost = $3,
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(quotation_id)
        .bind(total_cost)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Delete an equipment line. Returns `true` if a row was removed.
    pub async fn delete(
        conn: &mut PgConnection,
        project_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM project_equipment WHERE id = $1 AND project_id = $2")
            .bind(id)
            .bind(project_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
