//! Delivery status state machine.
//!
//! A delivery moves `pending -> preparing -> in_transit -> delivered`, with
//! `cancelled` reachable from any non-terminal state. Transitions are
//! validated against an explicit table, so out-of-order jumps
//! (`pending -> delivered`) and regressions (`delivered -> in_transit`) are
//! rejected. Location updates are only accepted while the shipment is
//! actually moving.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Lifecycle states of an equipment delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Pending,
    Preparing,
    InTransit,
    Delivered,
    Cancelled,
}

impl DeliveryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Preparing => "preparing",
            Self::InTransit => "in_transit",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "preparing" => Some(Self::Preparing),
            "in_transit" => Some(Self::InTransit),
            "delivered" => Some(Self::Delivered),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Terminal states accept no further transitions or location updates.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// The legal next states from this one.
    pub fn allowed_next(self) -> &'static [DeliveryStatus] {
        match self {
            Self::Pending => &[Self::Preparing, Self::Cancelled],
            Self::Preparing => &[Self::InTransit, Self::Cancelled],
            Self::InTransit => &[Self::Delivered, Self::Cancelled],
            Self::Delivered | Self::Cancelled => &[],
        }
    }
}

/// Validate a requested status transition.
pub fn validate_transition(from: DeliveryStatus, to: DeliveryStatus) -> Result<(), CoreError> {
    if from.allowed_next().contains(&to) {
        return Ok(());
    }
    Err(CoreError::Conflict(format!(
        "Cannot transition delivery from '{}' to '{}'",
        from.as_str(),
        to.as_str()
    )))
}

/// Location pings are only meaningful while the shipment is on the road.
pub fn validate_location_update(status: DeliveryStatus) -> Result<(), CoreError> {
    if status == DeliveryStatus::InTransit {
        return Ok(());
    }
    Err(CoreError::Conflict(format!(
        "Location updates are only accepted while in transit (current status: '{}')",
        status.as_str()
    )))
}
