//! Supplier quotation lifecycle.
//!
//! A quotation is addressed by an opaque token, not a session. It moves
//! `sent -> submitted` exactly once; expiry is evaluated at read time
//! against `valid_until` (there is no background sweeper). After admin
//! review a submitted quotation becomes `accepted` or `rejected`.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Lifecycle states of a supplier quotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotationStatus {
    /// Sent to the supplier, awaiting pricing.
    Sent,
    /// Supplier filled in pricing. Terminal for the supplier.
    Submitted,
    /// Admin accepted this quote; it now feeds the equipment cost rollup.
    Accepted,
    /// Admin rejected this quote (or accepted a sibling).
    Rejected,
}

impl QuotationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Submitted => "submitted",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sent" => Some(Self::Sent),
            "submitted" => Some(Self::Submitted),
            "accepted" => Some(Self::Accepted),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// True when the quotation's validity deadline has passed.
pub fn is_expired(valid_until: Option<Timestamp>, now: Timestamp) -> bool {
    valid_until.is_some_and(|deadline| deadline < now)
}

/// Guard for the public GET/POST paths: an expired token is gone regardless
/// of state or payload.
pub fn ensure_not_expired(valid_until: Option<Timestamp>, now: Timestamp) -> Result<(), CoreError> {
    if is_expired(valid_until, now) {
        return Err(CoreError::Gone("This quotation request has expired".into()));
    }
    Ok(())
}

/// Pricing fields a supplier submits through the public token form.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteSubmission {
    pub total_price: f64,
    pub daily_rate: Option<f64>,
    #[serde(default)]
    pub delivery_fee: f64,
    #[serde(default)]
    pub setup_fee: f64,
    pub payment_terms: Option<String>,
    pub delivery_details: Option<String>,
    pub notes: Option<String>,
}

impl QuoteSubmission {
    /// Minimal validation: the total price must be positive, fees must not
    /// be negative.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.total_price <= 0.0 {
            return Err(CoreError::Validation(
                "total_price is required and must be greater than zero".into(),
            ));
        }
        if self.delivery_fee < 0.0 || self.setup_fee < 0.0 {
            return Err(CoreError::Validation("Fees must not be negative".into()));
        }
        if let Some(rate) = self.daily_rate {
            if rate < 0.0 {
                return Err(CoreError::Validation("daily_rate must not be negative".into()));
            }
        }
        Ok(())
    }
}
