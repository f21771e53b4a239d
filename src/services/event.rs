//! Event lifecycle service
//!
//! Create, read, list and delete events. Creation normalizes every textual
//! field before storage; deletion is restricted to the owning organizer.

use tracing::{info, warn};

use crate::database::query::EventQuery;
use crate::database::repositories::{EventRepository, UserRepository};
use crate::models::event::{CreateEventRequest, Event, EventPage};
use crate::models::user::User;
use crate::services::auth::Principal;
use crate::utils::errors::{PlanMeError, Result};
use crate::utils::sanitize::{is_alphanumeric, sanitize, trim};

#[derive(Debug, Clone)]
pub struct EventService {
    event_repository: EventRepository,
    user_repository: UserRepository,
}

impl EventService {
    pub fn new(event_repository: EventRepository, user_repository: UserRepository) -> Self {
        Self {
            event_repository,
            user_repository,
        }
    }

    /// Create a new event on behalf of the caller. All fields must be
    /// non-empty; the organizer name is snapshotted from the local user row.
    pub async fn create_event(
        &self,
        principal: &Principal,
        request: CreateEventRequest,
    ) -> Result<Event> {
        let required = [
            ("title", &request.title),
            ("description", &request.description),
            ("start_time", &request.start_time),
            ("end_time", &request.end_time),
            ("date", &request.date),
            ("venue", &request.venue),
            ("price", &request.price),
            ("address", &request.address),
            ("post_code", &request.post_code),
            ("city", &request.city),
        ];
        if required.iter().any(|(_, value)| value.trim().is_empty()) {
            return Err(PlanMeError::Validation("Missing information.".to_string()));
        }

        // Price stays un-escaped so "Free" and numeric strings remain
        // machine-parseable; everything else is trimmed and HTML-escaped.
        let request = CreateEventRequest {
            title: sanitize(&request.title),
            description: sanitize(&request.description),
            start_time: sanitize(&request.start_time),
            end_time: sanitize(&request.end_time),
            date: sanitize(&request.date),
            venue: sanitize(&request.venue),
            price: trim(&request.price),
            address: sanitize(&request.address),
            post_code: sanitize(&request.post_code),
            city: sanitize(&request.city),
        };

        let organizer = self
            .user_repository
            .find_by_firebase_uid(principal.uid())
            .await?
            .ok_or_else(|| PlanMeError::UserNotFound {
                uid: principal.uid().to_string(),
            })?;

        let event = self
            .event_repository
            .create(organizer.user_id, &organizer.user_name, request)
            .await?;

        info!(
            event_id = event.event_id,
            organizer_id = organizer.user_id,
            title = %event.title,
            "Event created"
        );
        Ok(event)
    }

    /// Fetch one event by its raw id as received off the wire. The id must
    /// be alphanumeric before it is used in a lookup.
    pub async fn get_event(&self, raw_event_id: &str) -> Result<Event> {
        if !is_alphanumeric(raw_event_id) {
            warn!(event_id = %raw_event_id, "Rejected malformed event id");
            return Err(PlanMeError::Validation("Invalid event ID".to_string()));
        }

        let event_id: i64 = raw_event_id
            .parse()
            .map_err(|_| PlanMeError::Validation("Invalid event ID".to_string()))?;

        self.event_repository
            .find_by_id(event_id)
            .await?
            .ok_or(PlanMeError::EventNotFound { event_id })
    }

    /// List events with dynamic filtering, multi-field sort and pagination
    pub async fn list_events(&self, query: &EventQuery) -> Result<EventPage> {
        self.event_repository.list(query).await
    }

    /// Events the caller organizes
    pub async fn hosted_events(&self, principal: &Principal) -> Result<Vec<Event>> {
        let user = self.resolve_user(principal).await?;
        self.event_repository.find_by_organizer(user.user_id).await
    }

    /// Events the caller has registered for
    pub async fn booked_events(&self, principal: &Principal) -> Result<Vec<Event>> {
        let user = self.resolve_user(principal).await?;
        self.event_repository.find_booked_by_user(user.user_id).await
    }

    /// Delete an event. Only the owning organizer may delete; deletion
    /// cascades to the event's attendance records.
    pub async fn delete_event(&self, principal: &Principal, event_id: i64) -> Result<()> {
        let user = self.resolve_user(principal).await?;

        let event = self
            .event_repository
            .find_by_id(event_id)
            .await?
            .ok_or(PlanMeError::EventNotFound { event_id })?;

        if event.organizer_id != user.user_id {
            warn!(
                event_id = event_id,
                user_id = user.user_id,
                organizer_id = event.organizer_id,
                "Delete rejected: caller is not the organizer"
            );
            return Err(PlanMeError::Forbidden(
                "Only the organizer may delete this event".to_string(),
            ));
        }

        let deleted = self
            .event_repository
            .delete_owned(event_id, user.user_id)
            .await?;
        if deleted == 0 {
            // The event disappeared between the check and the delete.
            return Err(PlanMeError::EventNotFound { event_id });
        }

        info!(event_id = event_id, user_id = user.user_id, "Event deleted");
        Ok(())
    }

    async fn resolve_user(&self, principal: &Principal) -> Result<User> {
        self.user_repository
            .find_by_firebase_uid(principal.uid())
            .await?
            .ok_or_else(|| PlanMeError::UserNotFound {
                uid: principal.uid().to_string(),
            })
    }
}
