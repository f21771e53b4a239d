//! Attendee model
//!
//! The attendee row is the join entity between a user and an event and
//! carries the payment lifecycle. The only legal transition is
//! Incompleted -> Completed; completed rows never move backward.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Attendee {
    pub attendee_id: i64,
    pub user_id: i64,
    /// Registrant name snapshot taken at registration time
    pub user_name: String,
    pub user_email: String,
    pub event_id: i64,
    pub ticket_number: i64,
    pub payment_status: String,
    pub created_at: DateTime<Utc>,
}

impl Attendee {
    pub fn status(&self) -> Option<PaymentStatus> {
        PaymentStatus::parse(&self.payment_status)
    }
}

/// Payment lifecycle state of an attendance record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Checkout session opened, awaiting provider confirmation
    Incompleted,
    /// Paid, or free event registered directly as complete. Terminal.
    Completed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Incompleted => "Incompleted",
            PaymentStatus::Completed => "Completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Incompleted" => Some(PaymentStatus::Incompleted),
            "Completed" => Some(PaymentStatus::Completed),
            _ => None,
        }
    }

    /// Whether moving from `self` to `to` is a legal transition
    pub fn can_transition_to(&self, to: PaymentStatus) -> bool {
        matches!(
            (self, to),
            (PaymentStatus::Incompleted, PaymentStatus::Completed)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        assert_eq!(PaymentStatus::parse("Incompleted"), Some(PaymentStatus::Incompleted));
        assert_eq!(PaymentStatus::parse("Completed"), Some(PaymentStatus::Completed));
        assert_eq!(PaymentStatus::parse("Pending"), None);
    }

    #[test]
    fn test_completed_is_terminal() {
        assert!(PaymentStatus::Incompleted.can_transition_to(PaymentStatus::Completed));
        assert!(!PaymentStatus::Completed.can_transition_to(PaymentStatus::Incompleted));
        assert!(!PaymentStatus::Completed.can_transition_to(PaymentStatus::Completed));
    }
}
