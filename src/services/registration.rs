//! Attendee registration workflow
//!
//! State machine per attendance record: a row is inserted Incompleted with
//! the price captured (or directly Completed for free events), a checkout
//! session is opened for priced events, and the provider's webhook later
//! moves the row Incompleted -> Completed. Completed is terminal.

use tracing::{info, warn};

use crate::database::repositories::{AttendeeRepository, RegistrationRecord};
use crate::models::attendee::{Attendee, PaymentStatus};
use crate::services::auth::Principal;
use crate::services::payment::{CheckoutSession, PaymentService, SessionMetadata};
use crate::utils::errors::{PlanMeError, Result};

/// Result of a registration: the persisted attendance record plus the
/// checkout session handle for priced events
#[derive(Debug, Clone)]
pub struct Registration {
    pub attendee: Attendee,
    pub checkout_session: Option<CheckoutSession>,
}

#[derive(Debug, Clone)]
pub struct RegistrationService {
    attendee_repository: AttendeeRepository,
    payment: PaymentService,
}

impl RegistrationService {
    pub fn new(attendee_repository: AttendeeRepository, payment: PaymentService) -> Self {
        Self {
            attendee_repository,
            payment,
        }
    }

    /// Register the caller for an event.
    ///
    /// The user lookup, event fetch and attendee insert run in one
    /// transaction; the remote provider calls happen after commit. If the
    /// provider calls fail, the pending row is removed again so no
    /// attendance is left dangling without a session.
    pub async fn register(&self, principal: &Principal, event_id: i64) -> Result<Registration> {
        let record = self
            .attendee_repository
            .create_registration(principal.uid(), event_id)
            .await?;

        if record.event.is_free() {
            info!(
                attendee_id = record.attendee.attendee_id,
                event_id = event_id,
                "Registered for free event, payment complete"
            );
            return Ok(Registration {
                attendee: record.attendee,
                checkout_session: None,
            });
        }

        match self.open_checkout(&record).await {
            Ok(session) => Ok(Registration {
                attendee: record.attendee,
                checkout_session: Some(session),
            }),
            Err(e) => {
                warn!(
                    attendee_id = record.attendee.attendee_id,
                    error = %e,
                    "Checkout setup failed, rolling back pending registration"
                );
                self.attendee_repository
                    .delete(record.attendee.attendee_id)
                    .await?;
                Err(e)
            }
        }
    }

    async fn open_checkout(&self, record: &RegistrationRecord) -> Result<CheckoutSession> {
        let amount = record.event.minor_unit_amount()?;
        let price_id = self
            .payment
            .create_price(amount, &record.event.title)
            .await?;

        let metadata = SessionMetadata {
            attendee_id: record.attendee.attendee_id,
            user_id: record.user.user_id,
            user_name: record.user.user_name.clone(),
            event_id: record.event.event_id,
            payment_status: PaymentStatus::Incompleted.as_str().to_string(),
        };

        self.payment
            .create_checkout_session(&price_id, &metadata)
            .await
    }

    /// Reconcile a completed checkout against its pending attendance row.
    ///
    /// The webhook payload identifies the exact session; its metadata
    /// triple {attendee_id, user_id, event_id} selects the row to update.
    /// Idempotent: replaying the webhook leaves the row Completed.
    pub async fn complete_payment(&self, webhook_payload: &str) -> Result<Attendee> {
        let metadata = PaymentService::parse_completed_webhook(webhook_payload)?;

        let attendee = self
            .attendee_repository
            .complete_payment(metadata.attendee_id, metadata.user_id, metadata.event_id)
            .await?
            .ok_or(PlanMeError::AttendeeNotFound {
                attendee_id: metadata.attendee_id,
            })?;

        info!(
            attendee_id = attendee.attendee_id,
            event_id = attendee.event_id,
            "Payment reconciled, attendance complete"
        );
        Ok(attendee)
    }

    /// All attendance records for an event
    pub async fn attendees_by_event(
        &self,
        _principal: &Principal,
        event_id: i64,
    ) -> Result<Vec<Attendee>> {
        self.attendee_repository.find_by_event(event_id).await
    }
}
