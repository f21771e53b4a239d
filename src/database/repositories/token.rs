//! Calendar credentials repository implementation

use sqlx::PgPool;

use crate::models::token::{GoogleTokens, StoreTokensRequest};
use crate::utils::errors::PlanMeError;

#[derive(Debug, Clone)]
pub struct TokenRepository {
    pool: PgPool,
}

impl TokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store credentials for a user. Repeated authorization replaces the
    /// existing row rather than stacking duplicates.
    pub async fn upsert(&self, request: StoreTokensRequest) -> Result<GoogleTokens, PlanMeError> {
        let tokens = sqlx::query_as::<_, GoogleTokens>(
            r#"
            INSERT INTO google_tokens (user_id, google_account_email, access_token, refresh_token, scope, token_type, expiry_date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
            ON CONFLICT (user_id) DO UPDATE
            SET google_account_email = EXCLUDED.google_account_email,
                access_token = EXCLUDED.access_token,
                refresh_token = COALESCE(EXCLUDED.refresh_token, google_tokens.refresh_token),
                scope = EXCLUDED.scope,
                token_type = EXCLUDED.token_type,
                expiry_date = EXCLUDED.expiry_date
            RETURNING token_id, user_id, google_account_email, access_token, refresh_token, scope, token_type, expiry_date, created_at
            "#,
        )
        .bind(request.user_id)
        .bind(request.google_account_email)
        .bind(request.access_token)
        .bind(request.refresh_token)
        .bind(request.scope)
        .bind(request.token_type)
        .bind(request.expiry_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(tokens)
    }

    /// Most recently stored credentials for a user
    pub async fn find_by_user(&self, user_id: i64) -> Result<Option<GoogleTokens>, PlanMeError> {
        let tokens = sqlx::query_as::<_, GoogleTokens>(
            "SELECT token_id, user_id, google_account_email, access_token, refresh_token, scope, token_type, expiry_date, created_at FROM google_tokens WHERE user_id = $1 ORDER BY created_at DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tokens)
    }
}
