//! Services module
//!
//! This module contains business logic services

pub mod auth;
pub mod calendar;
pub mod event;
pub mod identity;
pub mod payment;
pub mod registration;
pub mod user;

// Re-export commonly used services
pub use auth::Principal;
pub use calendar::{CalendarPush, CalendarService};
pub use event::EventService;
pub use identity::{IdentityAccount, IdentityService};
pub use payment::{CheckoutSession, PaymentService, SessionMetadata};
pub use registration::{Registration, RegistrationService};
pub use user::{SignIn, UserService};

use crate::config::settings::Settings;
use crate::database::repositories::{
    AttendeeRepository, EventRepository, TokenRepository, UserRepository,
};
use crate::database::DatabasePool;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Debug, Clone)]
pub struct ServiceFactory {
    pub user_service: UserService,
    pub event_service: EventService,
    pub registration_service: RegistrationService,
    pub calendar_service: CalendarService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(pool: DatabasePool, settings: Settings) -> Result<Self> {
        let user_repository = UserRepository::new(pool.clone());
        let event_repository = EventRepository::new(pool.clone());
        let attendee_repository = AttendeeRepository::new(pool.clone());
        let token_repository = TokenRepository::new(pool);

        let identity_service = IdentityService::new(settings.clone())?;
        let payment_service = PaymentService::new(settings.clone())?;

        let user_service = UserService::new(user_repository.clone(), identity_service);
        let event_service = EventService::new(event_repository.clone(), user_repository.clone());
        let registration_service = RegistrationService::new(attendee_repository, payment_service);
        let calendar_service = CalendarService::new(
            token_repository,
            user_repository,
            event_repository,
            settings,
        )?;

        Ok(Self {
            user_service,
            event_service,
            registration_service,
            calendar_service,
        })
    }
}
