//! Data models module
//!
//! This module contains all data structures used in the application

pub mod attendee;
pub mod event;
pub mod token;
pub mod user;

pub use attendee::{Attendee, PaymentStatus};
pub use event::{CreateEventRequest, Event, EventFilter, EventPage, DATE_FORMAT, FREE_PRICE};
pub use token::{GoogleTokens, StoreTokensRequest};
pub use user::{CreateUserRequest, User, UserRole};
