//! Shared domain enums
//!
//! Stored as their wire names in `VARCHAR` columns.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

// ---------------------------------------------------------------------------
// CheckOutStatus
// ---------------------------------------------------------------------------

/// Review state of a checkout request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckOutStatus {
    Pending,
    Accepted,
    Refused,
}

impl CheckOutStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckOutStatus::Pending => "PENDING",
            CheckOutStatus::Accepted => "ACCEPTED",
            CheckOutStatus::Refused => "REFUSED",
        }
    }
}

impl FromStr for CheckOutStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(CheckOutStatus::Pending),
            "ACCEPTED" => Ok(CheckOutStatus::Accepted),
            "REFUSED" => Ok(CheckOutStatus::Refused),
            other => Err(UnknownVariant {
                kind: "checkout status",
                value: other.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// NotificationType
// ---------------------------------------------------------------------------

/// Reason a notification was sent to a patron
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    Available,
    Overdue,
    Reminder,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Available => "AVAILABLE",
            NotificationType::Overdue => "OVERDUE",
            NotificationType::Reminder => "REMINDER",
        }
    }
}

impl FromStr for NotificationType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AVAILABLE" => Ok(NotificationType::Available),
            "OVERDUE" => Ok(NotificationType::Overdue),
            "REMINDER" => Ok(NotificationType::Reminder),
            other => Err(UnknownVariant {
                kind: "notification type",
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_match_storage_names() {
        for status in [CheckOutStatus::Pending, CheckOutStatus::Accepted, CheckOutStatus::Refused] {
            let wire = serde_json::to_value(status).unwrap();
            assert_eq!(wire, status.as_str());
            assert_eq!(status.as_str().parse::<CheckOutStatus>().unwrap(), status);
        }
        assert!("LOST".parse::<NotificationType>().is_err());
    }
}
