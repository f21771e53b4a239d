//! Calendar credentials model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Durable OAuth token set enabling server-initiated writes to a user's
/// external calendar. One row per user; repeated authorization upserts.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GoogleTokens {
    pub token_id: i64,
    pub user_id: i64,
    pub google_account_email: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub scope: String,
    pub token_type: String,
    /// Expiry timestamp, milliseconds since the epoch
    pub expiry_date: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreTokensRequest {
    pub user_id: i64,
    pub google_account_email: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub scope: String,
    pub token_type: String,
    pub expiry_date: i64,
}
