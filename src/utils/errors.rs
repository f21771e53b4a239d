//! Error handling for PlanMe
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy. Every variant carries
//! enough context for the boundary layer to render a structured
//! `{status, message}` response without leaking provider internals.

use thiserror::Error;

/// Main error type for the PlanMe backend
#[derive(Error, Debug)]
pub enum PlanMeError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Identity provider error: {0}")]
    Identity(#[from] IdentityError),

    #[error("Payment provider error: {0}")]
    Payment(#[from] PaymentError),

    #[error("Google Calendar error: {0}")]
    Google(#[from] GoogleError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("User not found: {uid}")]
    UserNotFound { uid: String },

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: i64 },

    #[error("Attendee not found: {attendee_id}")]
    AttendeeNotFound { attendee_id: i64 },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Identity provider specific errors
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("identity provider request failed: {0}")]
    RequestFailed(String),

    #[error("email is already in use")]
    EmailAlreadyInUse,

    #[error("missing password")]
    MissingPassword,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("email address is not verified")]
    EmailNotVerified,

    #[error("invalid identity provider response: {0}")]
    InvalidResponse(String),
}

/// Payment provider specific errors
#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("payment provider request failed: {0}")]
    RequestFailed(String),

    #[error("payment provider timeout")]
    Timeout,

    #[error("invalid payment provider response: {0}")]
    InvalidResponse(String),

    #[error("invalid webhook payload: {0}")]
    InvalidWebhookPayload(String),
}

/// Google OAuth / Calendar API specific errors
#[derive(Error, Debug)]
pub enum GoogleError {
    #[error("Google API error: {0}")]
    ApiError(String),

    #[error("token exchange failed: {0}")]
    TokenExchangeFailed(String),

    #[error("event insertion failed: {0}")]
    EventInsertionFailed(String),

    #[error("invalid event data: {0}")]
    InvalidEventData(String),
}

/// Result type alias for PlanMe operations
pub type Result<T> = std::result::Result<T, PlanMeError>;

impl PlanMeError {
    /// HTTP status the boundary layer should respond with
    pub fn status_code(&self) -> u16 {
        match self {
            PlanMeError::Validation(_) => 400,
            PlanMeError::Authentication(_) => 403,
            PlanMeError::Forbidden(_) => 403,
            PlanMeError::Conflict(_) => 409,
            PlanMeError::UserNotFound { .. } => 404,
            PlanMeError::EventNotFound { .. } => 404,
            PlanMeError::AttendeeNotFound { .. } => 404,
            PlanMeError::Identity(IdentityError::EmailAlreadyInUse) => 409,
            PlanMeError::Identity(IdentityError::MissingPassword) => 400,
            PlanMeError::Identity(IdentityError::InvalidCredentials) => 400,
            PlanMeError::Identity(IdentityError::EmailNotVerified) => 403,
            PlanMeError::Identity(_) => 500,
            PlanMeError::Payment(_) => 502,
            PlanMeError::Google(_) => 502,
            _ => 500,
        }
    }

    /// Message safe to surface to the client. Internal faults collapse to a
    /// generic message so provider payloads never leak.
    pub fn public_message(&self) -> String {
        match self {
            PlanMeError::Validation(msg) => msg.clone(),
            PlanMeError::Conflict(msg) => msg.clone(),
            PlanMeError::Authentication(msg) => msg.clone(),
            PlanMeError::Forbidden(msg) => msg.clone(),
            PlanMeError::UserNotFound { .. } => "No matching user found".to_string(),
            PlanMeError::EventNotFound { .. } => "Event does not exist".to_string(),
            PlanMeError::AttendeeNotFound { .. } => "No matching attendance record".to_string(),
            PlanMeError::Identity(IdentityError::EmailAlreadyInUse) => {
                "Email is already in use".to_string()
            }
            PlanMeError::Identity(IdentityError::MissingPassword) => "Missing password".to_string(),
            PlanMeError::Identity(IdentityError::EmailNotVerified) => {
                "Please verify your email.".to_string()
            }
            _ => "An unexpected error occurred".to_string(),
        }
    }

    /// Check if the error is recoverable by retrying
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PlanMeError::Http(_)
                | PlanMeError::Payment(PaymentError::Timeout)
                | PlanMeError::Payment(PaymentError::RequestFailed(_))
                | PlanMeError::Google(GoogleError::ApiError(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_match_taxonomy() {
        assert_eq!(PlanMeError::Validation("missing title".into()).status_code(), 400);
        assert_eq!(PlanMeError::Conflict("already registered".into()).status_code(), 409);
        assert_eq!(PlanMeError::Forbidden("not the organizer".into()).status_code(), 403);
        assert_eq!(PlanMeError::EventNotFound { event_id: 7 }.status_code(), 404);
        assert_eq!(
            PlanMeError::Identity(IdentityError::EmailAlreadyInUse).status_code(),
            409
        );
        assert_eq!(
            PlanMeError::Identity(IdentityError::EmailNotVerified).status_code(),
            403
        );
    }

    #[test]
    fn test_internal_errors_do_not_leak_detail() {
        let err = PlanMeError::Payment(PaymentError::RequestFailed(
            "sk_live key rejected by upstream".into(),
        ));
        assert_eq!(err.public_message(), "An unexpected error occurred");
    }
}
