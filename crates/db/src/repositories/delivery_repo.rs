//! Repository for delivery trackings and their location history.

use sqlx::PgPool;

use hrx_core::delivery::DeliveryStatus;
use hrx_core::types::DbId;

use crate::models::delivery::{CreateDelivery, Delivery, LocationPoint, LocationUpdate};

const COLUMNS: &str = "id, project_id, supplier_id, supplier_user_id, status, \
     equipment_description, destination_address, scheduled_pickup_time, actual_pickup_time, \
     actual_delivery_time, delivery_notes, current_latitude, current_longitude, \
     current_speed_kmh, last_location_update, created_at, updated_at";

/// How many history points the tracking views keep per delivery.
pub const LOCATION_HISTORY_LIMIT: i64 = 100;

/// Provides persistence for delivery trackings.
pub struct DeliveryRepo;

impl DeliveryRepo {
    pub async fn create(pool: &PgPool, input: &CreateDelivery) -> Result<Delivery, sqlx::Error> {
        let query = format!(
            "INSERT INTO delivery_trackings (
                project_id, supplier_id, supplier_user_id, equipment_description,
                destination_address, scheduled_pickup_time)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Delivery>(&query)
            .bind(input.project_id)
            .bind(input.supplier_id)
            .bind(input.supplier_user_id)
            .bind(&input.equipment_description)
            .bind(&input.destination_address)
            .bind(input.scheduled_pickup_time)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Delivery>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM delivery_trackings WHERE id = $1");
        sqlx::query_as::<_, Delivery>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List deliveries, newest first. Admins see everything; suppliers pass
    /// their user id to see only their own.
    pub async fn list(
        pool: &PgPool,
        supplier_user_id: Option<DbId>,
    ) -> Result<Vec<Delivery>, sqlx::Error> {
        let filter = if supplier_user_id.is_some() {
            "WHERE supplier_user_id = $1"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM delivery_trackings {filter} ORDER BY created_at DESC"
        );
        let mut q = sqlx::query_as::<_, Delivery>(&query);
        if let Some(user_id) = supplier_user_id {
            q = q.bind(user_id);
        }
        q.fetch_all(pool).await
    }

    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Delivery>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM delivery_trackings WHERE project_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, Delivery>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Atomically apply a status transition, stamping pickup/delivery times
    /// as the delivery crosses those states.
    ///
    /// The `WHERE status = $expected` clause guards against concurrent
    /// transitions; zero rows affected means the delivery moved on and the
    /// caller must report a conflict.
    pub async fn transition_status(
        pool: &PgPool,
        id: DbId,
        expected: DeliveryStatus,
        next: DeliveryStatus,
        notes: Option<&str>,
    ) -> Result<Option<Delivery>, sqlx::Error> {
        let query = format!(
            "UPDATE delivery_trackings SET
                status = $2,
                actual_pickup_time = CASE
                    WHEN $2 = 'in_transit' THEN NOW() ELSE actual_pickup_time END,
                actual_delivery_time = CASE
                    WHEN $2 = 'delivered' THEN NOW() ELSE actual_delivery_time END,
                delivery_notes = COALESCE($4, delivery_notes),
                updated_at = NOW()
             WHERE id = $1 AND status = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Delivery>(&query)
            .bind(id)
            .bind(next.as_str())
            .bind(expected.as_str())
            .bind(notes)
            .fetch_optional(pool)
            .await
    }

    /// Record a location ping: update the live position on the tracking row
    /// and append to the history table.
    pub async fn record_location(
        pool: &PgPool,
        id: DbId,
        ping: &LocationUpdate,
    ) -> Result<Option<Delivery>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE delivery_trackings SET
                current_latitude = $2,
                current_longitude = $3,
                current_speed_kmh = $4,
                last_location_update = NOW(),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let delivery = sqlx::query_as::<_, Delivery>(&query)
            .bind(id)
            .bind(ping.latitude)
            .bind(ping.longitude)
            .bind(ping.speed_kmh)
            .fetch_optional(&mut *tx)
            .await?;

        if delivery.is_some() {
            sqlx::query(
                "INSERT INTO delivery_location_history (delivery_id, latitude, longitude, speed_kmh)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(id)
            .bind(ping.latitude)
            .bind(ping.longitude)
            .bind(ping.speed_kmh)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(delivery)
    }

    /// Most recent location points for a delivery, newest first.
    pub async fn location_history(
        pool: &PgPool,
        delivery_id: DbId,
    ) -> Result<Vec<LocationPoint>, sqlx::Error> {
        sqlx::query_as::<_, LocationPoint>(
            "SELECT id, delivery_id, latitude, longitude, speed_kmh, recorded_at
             FROM delivery_location_history
             WHERE delivery_id = $1
             ORDER BY recorded_at DESC
             LIMIT $2",
        )
        .bind(delivery_id)
        .bind(LOCATION_HISTORY_LIMIT)
        .fetch_all(pool)
        .await
    }

    /// Counts per status for the admin dashboard.
    pub async fn count_by_status(pool: &PgPool) -> Result<Vec<(String, i64)>, sqlx::Error> {
        sqlx::query_as::<_, (String, i64)>(
            "SELECT status, COUNT(*) FROM delivery_trackings GROUP BY status",
        )
        .fetch_all(pool)
        .await
    }
}
