//! Supplier quotation model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use hrx_core::types::{DbId, Timestamp};

/// A row from the `supplier_quotations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Quotation {
    pub id: DbId,
    pub project_id: DbId,
    pub supplier_id: DbId,
    #[serde(skip_serializing)]
    pub token: String,
    pub requested_items: serde_json::Value,
    pub status: String,
    pub valid_until: Option<Timestamp>,
    pub total_price: Option<f64>,
    pub daily_rate: Option<f64>,
    pub delivery_fee: f64,
    pub setup_fee: f64,
    pub payment_terms: Option<String>,
    pub delivery_details: Option<String>,
    pub notes: Option<String>,
    pub submitted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for the admin quote fan-out request.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestQuotes {
    pub supplier_ids: Vec<DbId>,
    pub equipment_ids: Vec<DbId>,
    /// Days until the token expires. Defaults to 7.
    pub valid_days: Option<i64>,
}

/// Public view of a quotation joined with its project, returned through the
/// token-addressed endpoint. Excludes internal ids and pricing of others.
#[derive(Debug, Serialize)]
pub struct PublicQuotation {
    pub status: String,
    pub requested_items: serde_json::Value,
    pub valid_until: Option<Timestamp>,
    pub submitted_at: Option<Timestamp>,
    pub total_price: Option<f64>,
    pub project_number: String,
    pub event_name: String,
    pub event_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub venue_name: Option<String>,
    pub venue_address: String,
    pub venue_city: String,
    pub venue_state: String,
    pub supplier_company: String,
    pub supplier_contact: String,
}
