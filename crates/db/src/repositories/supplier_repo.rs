//! Repository for the `equipment_suppliers` registry.

use sqlx::PgPool;

use hrx_core::types::DbId;

use crate::models::supplier::{CreateSupplier, Supplier};

const COLUMNS: &str = "id, company_name, legal_name, contact_name, email, phone, cnpj, address, \
     city, state, zip_code, latitude, longitude, equipment_types, delivery_radius_km, \
     shipping_fee_per_km, status, created_at, updated_at";

/// Provides persistence for supplier registrations.
pub struct SupplierRepo;

impl SupplierRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateSupplier,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<Supplier, sqlx::Error> {
        let equipment_types = serde_json::Value::from(input.equipment_types.clone());
        // legal_name falls back to the trade name when the import leaves it blank.
        let query = format!(
            "INSERT INTO equipment_suppliers (
                company_name, legal_name, contact_name, email, phone, cnpj, address, city,
                state, zip_code, latitude, longitude, equipment_types, delivery_radius_km,
                shipping_fee_per_km)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                     COALESCE($14, 50), COALESCE($15, 0))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Supplier>(&query)
            .bind(&input.company_name)
            .bind(if input.legal_name.is_empty() {
                &input.company_name
            } else {
                &input.legal_name
            })
            .bind(&input.contact_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.cnpj)
            .bind(&input.address)
            .bind(&input.city)
            .bind(&input.state)
            .bind(&input.zip_code)
            .bind(latitude)
            .bind(longitude)
            .bind(equipment_types)
            .bind(input.delivery_radius_km)
            .bind(input.shipping_fee_per_km)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Supplier>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM equipment_suppliers WHERE id = $1");
        sqlx::query_as::<_, Supplier>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Duplicate probe used by the CSV import. CNPJ is matched only when
    /// the incoming row carries one.
    pub async fn exists_by_email_or_cnpj(
        pool: &PgPool,
        email: &str,
        cnpj: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM equipment_suppliers
                WHERE email = $1 OR ($2 <> '' AND cnpj = $2))",
        )
        .bind(email)
        .bind(cnpj)
        .fetch_one(pool)
        .await
    }

    pub async fn list(
        pool: &PgPool,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Supplier>, sqlx::Error> {
        let filter = if status.is_some() { "WHERE status = $3" } else { "" };
        let query = format!(
            "SELECT {COLUMNS} FROM equipment_suppliers {filter} \
             ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        );
        let mut q = sqlx::query_as::<_, Supplier>(&query).bind(limit).bind(offset);
        if let Some(status) = status {
            q = q.bind(status);
        }
        q.fetch_all(pool).await
    }

    /// Fetch the suppliers named in a quote fan-out request.
    pub async fn list_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Supplier>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM equipment_suppliers WHERE id = ANY($1) ORDER BY id");
        sqlx::query_as::<_, Supplier>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM equipment_suppliers")
            .fetch_one(pool)
            .await
    }
}
