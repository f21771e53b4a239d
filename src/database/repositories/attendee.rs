//! Attendee repository implementation
//!
//! Registration touches three tables in sequence (select user, select
//! event, insert attendee), so the whole read-then-insert path runs inside
//! one transaction here. Remote checkout-session creation stays outside as
//! a post-commit, compensable side effect owned by the service layer.

use sqlx::PgPool;

use crate::models::attendee::{Attendee, PaymentStatus};
use crate::models::event::Event;
use crate::models::user::User;
use crate::utils::errors::PlanMeError;

/// Outcome of the transactional registration insert
#[derive(Debug, Clone)]
pub struct RegistrationRecord {
    pub user: User,
    pub event: Event,
    pub attendee: Attendee,
}

#[derive(Debug, Clone)]
pub struct AttendeeRepository {
    pool: PgPool,
}

impl AttendeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Atomically resolve the caller, fetch the event, reject duplicate
    /// registrations and insert the pending attendee row.
    ///
    /// Free events are inserted directly as Completed; priced events start
    /// Incompleted until reconciliation confirms payment. The ticket number
    /// is a placeholder until ticket issuance exists.
    pub async fn create_registration(
        &self,
        firebase_uid: &str,
        event_id: i64,
    ) -> Result<RegistrationRecord, PlanMeError> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            "SELECT user_id, firebase_uid, user_name, user_email, user_role, calendar_activated, created_at, updated_at FROM users WHERE firebase_uid = $1",
        )
        .bind(firebase_uid)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| PlanMeError::UserNotFound {
            uid: firebase_uid.to_string(),
        })?;

        let event = sqlx::query_as::<_, Event>(
            "SELECT event_id, organizer_id, organizer_name, title, description, start_time, end_time, date, venue, price, address, post_code, city, created_at FROM events WHERE event_id = $1",
        )
        .bind(event_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(PlanMeError::EventNotFound { event_id })?;

        let existing: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM attendees WHERE user_id = $1 AND event_id = $2",
        )
        .bind(user.user_id)
        .bind(event_id)
        .fetch_one(&mut *tx)
        .await?;

        if existing.0 > 0 {
            return Err(PlanMeError::Conflict(
                "User is already registered for this event".to_string(),
            ));
        }

        let status = if event.is_free() {
            PaymentStatus::Completed
        } else {
            PaymentStatus::Incompleted
        };

        let attendee = sqlx::query_as::<_, Attendee>(
            r#"
            INSERT INTO attendees (user_id, user_name, user_email, event_id, ticket_number, payment_status, created_at)
            VALUES ($1, $2, $3, $4, 0, $5, NOW())
            RETURNING attendee_id, user_id, user_name, user_email, event_id, ticket_number, payment_status, created_at
            "#,
        )
        .bind(user.user_id)
        .bind(&user.user_name)
        .bind(&user.user_email)
        .bind(event_id)
        .bind(status.as_str())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(RegistrationRecord {
            user,
            event,
            attendee,
        })
    }

    /// Mark the attendance matching the full metadata triple as Completed.
    ///
    /// Keyed on {attendee_id, user_id, event_id} exactly as carried in the
    /// checkout session metadata, and idempotent: a second application
    /// matches zero Incompleted rows but the record is already Completed.
    pub async fn complete_payment(
        &self,
        attendee_id: i64,
        user_id: i64,
        event_id: i64,
    ) -> Result<Option<Attendee>, PlanMeError> {
        let attendee = sqlx::query_as::<_, Attendee>(
            r#"
            UPDATE attendees
            SET payment_status = $4
            WHERE attendee_id = $1 AND user_id = $2 AND event_id = $3
            RETURNING attendee_id, user_id, user_name, user_email, event_id, ticket_number, payment_status, created_at
            "#,
        )
        .bind(attendee_id)
        .bind(user_id)
        .bind(event_id)
        .bind(PaymentStatus::Completed.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(attendee)
    }

    /// Find one attendance record
    pub async fn find_by_id(&self, attendee_id: i64) -> Result<Option<Attendee>, PlanMeError> {
        let attendee = sqlx::query_as::<_, Attendee>(
            "SELECT attendee_id, user_id, user_name, user_email, event_id, ticket_number, payment_status, created_at FROM attendees WHERE attendee_id = $1",
        )
        .bind(attendee_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attendee)
    }

    /// All attendance records for an event
    pub async fn find_by_event(&self, event_id: i64) -> Result<Vec<Attendee>, PlanMeError> {
        let attendees = sqlx::query_as::<_, Attendee>(
            "SELECT attendee_id, user_id, user_name, user_email, event_id, ticket_number, payment_status, created_at FROM attendees WHERE event_id = $1 ORDER BY created_at ASC",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(attendees)
    }

    /// Compensating delete used when checkout-session creation fails after
    /// the pending row was committed.
    pub async fn delete(&self, attendee_id: i64) -> Result<(), PlanMeError> {
        sqlx::query("DELETE FROM attendees WHERE attendee_id = $1")
            .bind(attendee_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
