//! User repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::user::{CreateUserRequest, User};
use crate::utils::errors::PlanMeError;

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, PlanMeError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (firebase_uid, user_name, user_email, user_role, calendar_activated, created_at, updated_at)
            VALUES ($1, $2, $3, $4, false, $5, $6)
            RETURNING user_id, firebase_uid, user_name, user_email, user_role, calendar_activated, created_at, updated_at
            "#,
        )
        .bind(request.firebase_uid)
        .bind(request.user_name)
        .bind(request.user_email)
        .bind(request.user_role)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by internal ID
    pub async fn find_by_id(&self, user_id: i64) -> Result<Option<User>, PlanMeError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT user_id, firebase_uid, user_name, user_email, user_role, calendar_activated, created_at, updated_at FROM users WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by the identity provider's opaque uid
    pub async fn find_by_firebase_uid(&self, uid: &str) -> Result<Option<User>, PlanMeError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT user_id, firebase_uid, user_name, user_email, user_role, calendar_activated, created_at, updated_at FROM users WHERE firebase_uid = $1",
        )
        .bind(uid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Flip the calendar-activated flag for a user
    pub async fn set_calendar_activated(
        &self,
        user_id: i64,
        activated: bool,
    ) -> Result<User, PlanMeError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET calendar_activated = $2, updated_at = $3
            WHERE user_id = $1
            RETURNING user_id, firebase_uid, user_name, user_email, user_role, calendar_activated, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(activated)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Delete user by identity uid. Cascades to owned events, attendances
    /// and stored calendar credentials.
    pub async fn delete_by_firebase_uid(&self, uid: &str) -> Result<u64, PlanMeError> {
        let result = sqlx::query("DELETE FROM users WHERE firebase_uid = $1")
            .bind(uid)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
