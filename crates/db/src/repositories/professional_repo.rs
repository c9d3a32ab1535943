//! Repository for the `professionals` registry.

use sqlx::PgPool;

use hrx_core::types::DbId;

use crate::models::professional::{CreateProfessional, Professional};

const COLUMNS: &str = "id, full_name, cpf, email, phone, birth_date, cep, street, number, \
     complement, neighborhood, city, state, latitude, longitude, categories, availability, \
     has_experience, years_of_experience, experience_description, service_radius_km, status, \
     created_at, updated_at";

/// Provides persistence for professional registrations.
pub struct ProfessionalRepo;

impl ProfessionalRepo {
    /// Insert a registration. Duplicate CPF or email surfaces as a unique
    /// violation for the error layer to map.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProfessional,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<Professional, sqlx::Error> {
        let categories = serde_json::Value::from(input.categories.clone());
        let query = format!(
            "INSERT INTO professionals (
                full_name, cpf, email, phone, birth_date, cep, street, number, complement,
                neighborhood, city, state, latitude, longitude, categories, availability,
                has_experience, years_of_experience, experience_description, service_radius_km)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                     $17, $18, $19, COALESCE($20, 50))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Professional>(&query)
            .bind(&input.full_name)
            .bind(&input.cpf)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.birth_date)
            .bind(&input.cep)
            .bind(&input.street)
            .bind(&input.number)
            .bind(&input.complement)
            .bind(&input.neighborhood)
            .bind(&input.city)
            .bind(&input.state)
            .bind(latitude)
            .bind(longitude)
            .bind(categories)
            .bind(&input.availability)
            .bind(input.has_experience)
            .bind(&input.years_of_experience)
            .bind(&input.experience_description)
            .bind(input.service_radius_km)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Professional>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM professionals WHERE id = $1");
        sqlx::query_as::<_, Professional>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Duplicate probe used by the CSV import to skip rows cheaply before
    /// attempting an insert.
    pub async fn exists_by_cpf_or_email(
        pool: &PgPool,
        cpf: &str,
        email: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM professionals WHERE cpf = $1 OR email = $2)",
        )
        .bind(cpf)
        .bind(email)
        .fetch_one(pool)
        .await
    }

    pub async fn list(
        pool: &PgPool,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Professional>, sqlx::Error> {
        let filter = if status.is_some() { "WHERE status = $3" } else { "" };
        let query = format!(
            "SELECT {COLUMNS} FROM professionals {filter} \
             ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        );
        let mut q = sqlx::query_as::<_, Professional>(&query).bind(limit).bind(offset);
        if let Some(status) = status {
            q = q.bind(status);
        }
        q.fetch_all(pool).await
    }

    /// Move a registration to `approved` or `rejected`. Only pending rows
    /// can be decided; returns `None` otherwise.
    pub async fn decide(
        pool: &PgPool,
        id: DbId,
        new_status: &str,
    ) -> Result<Option<Professional>, sqlx::Error> {
        let query = format!(
            "UPDATE professionals SET status = $2, updated_at = NOW()
             WHERE id = $1 AND status = 'pending'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Professional>(&query)
            .bind(id)
            .bind(new_status)
            .fetch_optional(pool)
            .await
    }

    pub async fn count_by_status(pool: &PgPool) -> Result<Vec<(String, i64)>, sqlx::Error> {
        sqlx::query_as::<_, (String, i64)>(
            "SELECT status, COUNT(*) FROM professionals GROUP BY status",
        )
        .fetch_all(pool)
        .await
    }
}
