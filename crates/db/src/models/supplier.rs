//! Equipment supplier entity models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use hrx_core::types::{DbId, Timestamp};

/// A row from the `equipment_suppliers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Supplier {
    pub id: DbId,
    pub company_name: String,
    pub legal_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub cnpj: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub equipment_types: serde_json::Value,
    pub delivery_radius_km: i32,
    pub shipping_fee_per_km: f64,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a supplier.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSupplier {
    pub company_name: String,
    #[serde(default)]
    pub legal_name: String,
    pub contact_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub cnpj: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub equipment_types: Vec<String>,
    pub delivery_radius_km: Option<i32>,
    pub shipping_fee_per_km: Option<f64>,
}
