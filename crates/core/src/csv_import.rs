//! Row mapping for the bulk CSV importer.
//!
//! The importer accepts three record kinds (professionals, clients/events,
//! suppliers). Parsing the CSV itself is done with the `csv` crate at the
//! API layer; this module owns the pure part: normalizing a header -> value
//! record into a typed row, and the per-row error report.
//!
//! Field conventions carried over from the legacy import format:
//! - boolean fields are the literal string `"true"`
//! - list fields (categories, equipment_types) accept either a JSON array
//!   or a comma-separated fallback
//! - CPF/CNPJ/phone/CEP keep digits only

use std::collections::HashMap;

use serde::Serialize;

use crate::error::CoreError;

/// A parsed CSV data row: header name -> trimmed value.
pub type Record = HashMap<String, String>;

/// Which table a CSV file feeds. The wire names are the legacy
/// Portuguese form values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Professionals,
    Clients,
    Suppliers,
}

impl ImportKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "profissionais" => Some(Self::Professionals),
            "clientes" => Some(Self::Clients),
            "fornecedores" => Some(Self::Suppliers),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Professionals => "profissionais",
            Self::Clients => "clientes",
            Self::Suppliers => "fornecedores",
        }
    }
}

/// One failed row in an import batch. `row` is the 1-based data row number
/// (the header row is not counted).
#[derive(Debug, Clone, Serialize)]
pub struct RowError {
    pub row: usize,
    pub message: String,
}

/// Final report returned to the admin: per-row failures never abort the
/// batch and there is no batch-level rollback.
#[derive(Debug, Default, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub failed: usize,
    pub errors: Vec<RowError>,
}

impl ImportReport {
    pub fn record_success(&mut self) {
        self.imported += 1;
    }

    pub fn record_failure(&mut self, row: usize, message: impl Into<String>) {
        self.failed += 1;
        self.errors.push(RowError {
            row,
            message: message.into(),
        });
    }
}

// ---------------------------------------------------------------------------
// Field normalization helpers
// ---------------------------------------------------------------------------

/// Keep digits only (CPF, CNPJ, phone, CEP).
pub fn digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Boolean fields are the literal string "true"; anything else is false.
pub fn flag(record: &Record, key: &str) -> bool {
    record.get(key).map(String::as_str) == Some("true")
}

/// Optional string field: missing or empty becomes `None`.
pub fn opt(record: &Record, key: &str) -> Option<String> {
    record
        .get(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Required string field.
pub fn required(record: &Record, key: &str) -> Result<String, CoreError> {
    opt(record, key).ok_or_else(|| CoreError::Validation(format!("Missing required field '{key}'")))
}

/// List fields accept a JSON array (`["som","luz"]`) or a comma-separated
/// fallback (`som, luz`).
pub fn string_list(record: &Record, key: &str) -> Vec<String> {
    let Some(raw) = opt(record, key) else {
        return Vec::new();
    };
    if let Ok(serde_json::Value::Array(items)) = serde_json::from_str::<serde_json::Value>(&raw) {
        return items
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .filter(|s| !s.is_empty())
            .collect();
    }
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// Typed rows
// ---------------------------------------------------------------------------

/// A professional registration row.
#[derive(Debug, Clone)]
pub struct ProfessionalRow {
    pub full_name: String,
    pub cpf: String,
    pub email: String,
    pub phone: String,
    pub birth_date: Option<String>,
    pub cep: String,
    pub street: Option<String>,
    pub number: Option<String>,
    pub complement: Option<String>,
    pub neighborhood: Option<String>,
    pub city: String,
    pub state: String,
    pub categories: Vec<String>,
    pub has_experience: bool,
    pub years_of_experience: Option<String>,
    pub experience_description: Option<String>,
    pub availability: serde_json::Value,
    pub service_radius_km: i32,
}

impl ProfessionalRow {
    pub fn from_record(record: &Record) -> Result<Self, CoreError> {
        let availability = serde_json::json!({
            "weekdays": flag(record, "weekdays"),
            "weekends": flag(record, "weekends"),
            "holidays": flag(record, "holidays"),
            "night": flag(record, "night"),
            "travel": flag(record, "travel"),
        });

        Ok(Self {
            full_name: required(record, "full_name")?,
            cpf: digits(&required(record, "cpf")?),
            email: required(record, "email")?,
            phone: digits(&opt(record, "phone").unwrap_or_default()),
            birth_date: opt(record, "birth_date"),
            cep: digits(&opt(record, "cep").unwrap_or_default()),
            street: opt(record, "street"),
            number: opt(record, "number"),
            complement: opt(record, "complement"),
            neighborhood: opt(record, "neighborhood"),
            city: required(record, "city")?,
            state: required(record, "state")?.to_uppercase(),
            categories: string_list(record, "categories"),
            has_experience: flag(record, "has_experience"),
            years_of_experience: opt(record, "years_of_experience"),
            experience_description: opt(record, "experience_description"),
            availability,
            service_radius_km: opt(record, "service_radius_km")
                .and_then(|v| v.parse().ok())
                .unwrap_or(50),
        })
    }
}

/// A client/event request row. Creates a project in `new` status with the
/// default 20% margin; staffing and equipment are added by the admin later.
#[derive(Debug, Clone)]
pub struct ClientRow {
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub client_company: Option<String>,
    pub client_cnpj: Option<String>,
    pub event_name: String,
    pub event_type: String,
    pub event_description: Option<String>,
    pub event_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub expected_attendance: Option<i32>,
    pub venue_name: Option<String>,
    pub venue_address: String,
    pub venue_city: String,
    pub venue_state: String,
    pub venue_zip: Option<String>,
    pub budget_range: Option<String>,
    pub client_budget: Option<f64>,
    pub is_urgent: bool,
    pub additional_notes: Option<String>,
}

impl ClientRow {
    /// Default margin applied to imported projects; the admin adjusts later.
    pub const DEFAULT_PROFIT_MARGIN: f64 = 20.0;

    pub fn from_record(record: &Record) -> Result<Self, CoreError> {
        Ok(Self {
            client_name: required(record, "client_name")?,
            client_email: required(record, "client_email")?,
            client_phone: digits(&opt(record, "client_phone").unwrap_or_default()),
            client_company: opt(record, "client_company"),
            client_cnpj: opt(record, "client_cnpj").map(|v| digits(&v)).filter(|v| !v.is_empty()),
            event_name: required(record, "event_name")?,
            event_type: required(record, "event_type")?,
            event_description: opt(record, "event_description"),
            event_date: opt(record, "event_date"),
            start_time: opt(record, "start_time"),
            end_time: opt(record, "end_time"),
            expected_attendance: opt(record, "expected_attendance").and_then(|v| v.parse().ok()),
            venue_name: opt(record, "venue_name"),
            venue_address: required(record, "venue_address")?,
            venue_city: required(record, "venue_city")?,
            venue_state: required(record, "venue_state")?.to_uppercase(),
            venue_zip: opt(record, "venue_zip").map(|v| digits(&v)).filter(|v| !v.is_empty()),
            budget_range: opt(record, "budget_range"),
            client_budget: opt(record, "client_budget").and_then(|v| v.parse().ok()),
            is_urgent: flag(record, "is_urgent"),
            additional_notes: opt(record, "additional_notes"),
        })
    }
}

/// An equipment supplier row.
#[derive(Debug, Clone)]
pub struct SupplierRow {
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
    pub equipment_types: Vec<String>,
    pub delivery_radius_km: i32,
    pub shipping_fee_per_km: f64,
}

impl SupplierRow {
    pub fn from_record(record: &Record) -> Result<Self, CoreError> {
        let company_name = required(record, "company_name")?;
        Ok(Self {
            legal_name: opt(record, "legal_name").unwrap_or_else(|| company_name.clone()),
            company_name,
            contact_name: required(record, "contact_name")?,
            email: required(record, "email")?,
            phone: digits(&opt(record, "phone").unwrap_or_default()),
            cnpj: digits(&opt(record, "cnpj").unwrap_or_default()),
            address: opt(record, "address"),
            city: opt(record, "city"),
            state: opt(record, "state").map(|s| s.to_uppercase()),
            zip_code: digits(&opt(record, "zip_code").unwrap_or_default()),
            equipment_types: string_list(record, "equipment_types"),
            delivery_radius_km: opt(record, "delivery_radius_km")
                .and_then(|v| v.parse().ok())
                .unwrap_or(50),
            shipping_fee_per_km: opt(record, "shipping_fee_per_km")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn record(pairs: &[(&str, &str)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn kind_parses_legacy_names() {
        assert_eq!(ImportKind::parse("profissionais"), Some(ImportKind::Professionals));
        assert_eq!(ImportKind::parse("clientes"), Some(ImportKind::Clients));
        assert_eq!(ImportKind::parse("fornecedores"), Some(ImportKind::Suppliers));
        assert_eq!(ImportKind::parse("equipes"), None);
    }

    #[test]
    fn digits_strips_formatting() {
        assert_eq!(digits("123.456.789-00"), "12345678900");
        assert_eq!(digits("(11) 98765-4321"), "11987654321");
        assert_eq!(digits(""), "");
    }

    #[test]
    fn list_accepts_json_or_comma_fallback() {
        let rec = record(&[("categories", r#"["som","luz"]"#)]);
        assert_eq!(string_list(&rec, "categories"), vec!["som", "luz"]);

        let rec = record(&[("categories", "som, luz , palco")]);
        assert_eq!(string_list(&rec, "categories"), vec!["som", "luz", "palco"]);

        let rec = record(&[("categories", "")]);
        assert!(string_list(&rec, "categories").is_empty());
    }

    #[test]
    fn professional_row_maps_and_normalizes() {
        let rec = record(&[
            ("full_name", "João Silva"),
            ("cpf", "123.456.789-00"),
            ("email", "joao@example.com"),
            ("phone", "(11) 98765-4321"),
            ("city", "São Paulo"),
            ("state", "sp"),
            ("categories", "som,luz"),
            ("weekends", "true"),
            ("service_radius_km", "80"),
        ]);

        let row = ProfessionalRow::from_record(&rec).unwrap();
        assert_eq!(row.cpf, "12345678900");
        assert_eq!(row.phone, "11987654321");
        assert_eq!(row.state, "SP");
        assert_eq!(row.categories.len(), 2);
        assert_eq!(row.service_radius_km, 80);
        assert_eq!(row.availability["weekends"], true);
        assert_eq!(row.availability["weekdays"], false);
    }

    #[test]
    fn professional_row_missing_cpf_fails() {
        let rec = record(&[("full_name", "X"), ("email", "x@y.com")]);
        assert_matches!(
            ProfessionalRow::from_record(&rec),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn supplier_legal_name_falls_back_to_company_name() {
        let rec = record(&[
            ("company_name", "SomPro"),
            ("contact_name", "Ana"),
            ("email", "ana@sompro.com"),
            ("cnpj", "12.345.678/0001-00"),
        ]);
        let row = SupplierRow::from_record(&rec).unwrap();
        assert_eq!(row.legal_name, "SomPro");
        assert_eq!(row.cnpj, "12345678000100");
        assert_eq!(row.delivery_radius_km, 50);
    }

    #[test]
    fn report_counts_rows() {
        let mut report = ImportReport::default();
        report.record_success();
        report.record_success();
        report.record_failure(3, "duplicate CPF");
        assert_eq!(report.imported, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.errors[0].row, 3);
    }
}
