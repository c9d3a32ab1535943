//! Team invitation token flow.
//!
//! A team member row starts as `draft`, becomes `invited` when an admin
//! issues a single-use token, and is decided exactly once: `confirmed` or
//! `rejected`. Admins may also `cancel` an invite. Validation order is
//! fixed so each failure maps to a distinct HTTP status and the public
//! confirmation page can render a specific message:
//!
//! 1. unknown token            -> 404 (checked by the caller at lookup)
//! 2. token expired            -> 410
//! 3. already decided          -> 409 (confirmed / rejected)
//!    cancelled by admin       -> 410
//! 4. parent project cancelled -> 410

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Lifecycle states of a team member line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    Draft,
    Invited,
    Confirmed,
    Rejected,
    Cancelled,
}

impl InvitationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Invited => "invited",
            Self::Confirmed => "confirmed",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "invited" => Some(Self::Invited),
            "confirmed" => Some(Self::Confirmed),
            "rejected" => Some(Self::Rejected),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// The two actions a professional can take on an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationAction {
    Confirm,
    Reject,
}

impl InvitationAction {
    /// The status this action transitions the member into.
    pub fn target_status(self) -> InvitationStatus {
        match self {
            Self::Confirm => InvitationStatus::Confirmed,
            Self::Reject => InvitationStatus::Rejected,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "confirm" => Some(Self::Confirm),
            "reject" => Some(Self::Reject),
            _ => None,
        }
    }
}

/// Validate that an invitation token may still be acted on.
///
/// Applies the documented checks in strict order. On success the caller may
/// attempt the atomic `invited -> confirmed|rejected` update.
pub fn validate_response(
    status: InvitationStatus,
    token_expires_at: Option<Timestamp>,
    now: Timestamp,
    project_cancelled: bool,
) -> Result<(), CoreError> {
    if token_expires_at.is_some_and(|deadline| deadline < now) {
        return Err(CoreError::Gone(
            "The deadline to answer this invitation has passed".into(),
        ));
    }

    match status {
        InvitationStatus::Confirmed => {
            return Err(CoreError::Conflict(
                "This invitation was already confirmed".into(),
            ));
        }
        InvitationStatus::Rejected => {
            return Err(CoreError::Conflict(
                "This invitation was already rejected".into(),
            ));
        }
        InvitationStatus::Cancelled => {
            return Err(CoreError::Gone("This invitation was cancelled".into()));
        }
        InvitationStatus::Draft => {
            return Err(CoreError::Validation(
                "This team member has not been invited yet".into(),
            ));
        }
        InvitationStatus::Invited => {}
    }

    if project_cancelled {
        return Err(CoreError::Gone("This event was cancelled".into()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    #[test]
    fn invited_and_valid_passes() {
        let now = Utc::now();
        let result = validate_response(
            InvitationStatus::Invited,
            Some(now + Duration::days(3)),
            now,
            false,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn expired_token_wins_over_status() {
        // Expiry is checked before the status, so even an already-confirmed
        // member reports 410 once the token deadline has passed.
        let now = Utc::now();
        let result = validate_response(
            InvitationStatus::Confirmed,
            Some(now - Duration::hours(1)),
            now,
            false,
        );
        assert_matches!(result, Err(CoreError::Gone(_)));
    }

    #[test]
    fn already_decided_is_conflict() {
        let now = Utc::now();
        for status in [InvitationStatus::Confirmed, InvitationStatus::Rejected] {
            let result = validate_response(status, None, now, false);
            assert_matches!(result, Err(CoreError::Conflict(_)));
        }
    }

    #[test]
    fn cancelled_invite_is_gone() {
        let now = Utc::now();
        let result = validate_response(InvitationStatus::Cancelled, None, now, false);
        assert_matches!(result, Err(CoreError::Gone(_)));
    }

    #[test]
    fn cancelled_project_is_gone() {
        let now = Utc::now();
        let result = validate_response(InvitationStatus::Invited, None, now, true);
        assert_matches!(result, Err(CoreError::Gone(_)));
    }

    #[test]
    fn action_targets() {
        assert_eq!(
            InvitationAction::Confirm.target_status(),
            InvitationStatus::Confirmed
        );
        assert_eq!(
            InvitationAction::Reject.target_status(),
            InvitationStatus::Rejected
        );
        assert_eq!(InvitationAction::parse("confirm"), Some(InvitationAction::Confirm));
        assert_eq!(InvitationAction::parse("accept"), None);
    }
}
