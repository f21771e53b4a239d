//! Event repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::database::query::{Bind, EventQuery};
use crate::models::event::{CreateEventRequest, Event, EventPage};
use crate::utils::errors::PlanMeError;

#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event. The organizer fields are snapshots resolved by
    /// the caller from the authenticated principal.
    pub async fn create(
        &self,
        organizer_id: i64,
        organizer_name: &str,
        request: CreateEventRequest,
    ) -> Result<Event, PlanMeError> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (organizer_id, organizer_name, title, description, start_time, end_time, date, venue, price, address, post_code, city, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING event_id, organizer_id, organizer_name, title, description, start_time, end_time, date, venue, price, address, post_code, city, created_at
            "#,
        )
        .bind(organizer_id)
        .bind(organizer_name)
        .bind(request.title)
        .bind(request.description)
        .bind(request.start_time)
        .bind(request.end_time)
        .bind(request.date)
        .bind(request.venue)
        .bind(request.price)
        .bind(request.address)
        .bind(request.post_code)
        .bind(request.city)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find event by ID
    pub async fn find_by_id(&self, event_id: i64) -> Result<Option<Event>, PlanMeError> {
        let event = sqlx::query_as::<_, Event>(
            "SELECT event_id, organizer_id, organizer_name, title, description, start_time, end_time, date, venue, price, address, post_code, city, created_at FROM events WHERE event_id = $1",
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// List events through a compiled filter/sort/paginate plan. Returns
    /// both the requested page and the unbounded result set.
    pub async fn list(&self, query: &EventQuery) -> Result<EventPage, PlanMeError> {
        let plan = query.compile();

        let mut page_query = sqlx::query_as::<_, Event>(&plan.page_sql);
        for bind in &plan.binds {
            page_query = match bind {
                Bind::Int(value) => page_query.bind(*value),
                Bind::Text(value) => page_query.bind(value.as_str()),
            };
        }
        let events = page_query.bind(plan.offset).fetch_all(&self.pool).await?;

        let mut full_query = sqlx::query_as::<_, Event>(&plan.full_sql);
        for bind in &plan.binds {
            full_query = match bind {
                Bind::Int(value) => full_query.bind(*value),
                Bind::Text(value) => full_query.bind(value.as_str()),
            };
        }
        let all_events = full_query.fetch_all(&self.pool).await?;

        Ok(EventPage { events, all_events })
    }

    /// Events hosted by a given organizer
    pub async fn find_by_organizer(&self, organizer_id: i64) -> Result<Vec<Event>, PlanMeError> {
        let events = sqlx::query_as::<_, Event>(
            "SELECT event_id, organizer_id, organizer_name, title, description, start_time, end_time, date, venue, price, address, post_code, city, created_at FROM events WHERE organizer_id = $1",
        )
        .bind(organizer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Distinct events a user holds attendance records for
    pub async fn find_booked_by_user(&self, user_id: i64) -> Result<Vec<Event>, PlanMeError> {
        let events = sqlx::query_as::<_, Event>(
            r#"
            SELECT DISTINCT e.event_id, e.organizer_id, e.organizer_name, e.title, e.description, e.start_time, e.end_time, e.date, e.venue, e.price, e.address, e.post_code, e.city, e.created_at
            FROM events e
            INNER JOIN attendees a ON e.event_id = a.event_id
            WHERE a.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Delete an event owned by the given organizer. Returns the number of
    /// rows removed so the caller can distinguish a foreign-owned event.
    pub async fn delete_owned(
        &self,
        event_id: i64,
        organizer_id: i64,
    ) -> Result<u64, PlanMeError> {
        let result = sqlx::query("DELETE FROM events WHERE event_id = $1 AND organizer_id = $2")
            .bind(event_id)
            .bind(organizer_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
