//! Repository modules for database operations

pub mod attendee;
pub mod event;
pub mod token;
pub mod user;

pub use attendee::{AttendeeRepository, RegistrationRecord};
pub use event::EventRepository;
pub use token::TokenRepository;
pub use user::UserRepository;
