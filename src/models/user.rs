//! User model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub user_id: i64,
    /// Opaque id assigned by the external identity provider
    pub firebase_uid: String,
    pub user_name: String,
    pub user_email: String,
    pub user_role: String,
    pub calendar_activated: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub firebase_uid: String,
    pub user_name: String,
    pub user_email: String,
    pub user_role: String,
}

/// Role a user signed up with. Any user may register for events; only the
/// organizer of an event may delete it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    Organizer,
    Attendee,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Organizer => "organizer",
            UserRole::Attendee => "attendee",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "organizer" => Some(UserRole::Organizer),
            "attendee" => Some(UserRole::Attendee),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!(UserRole::parse("organizer"), Some(UserRole::Organizer));
        assert_eq!(UserRole::parse("attendee"), Some(UserRole::Attendee));
        assert_eq!(UserRole::parse("admin"), None);
        assert_eq!(UserRole::Organizer.as_str(), "organizer");
    }
}
