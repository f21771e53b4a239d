//! Database module
//!
//! This module handles database connections, the event listing query
//! compiler and the table repositories

pub mod connection;
pub mod query;
pub mod repositories;

pub use connection::{create_pool, health_check, run_migrations, DatabasePool};
pub use query::{EventQuery, QueryPlan, SortDirection, SortKey, PAGE_SIZE};
pub use repositories::{AttendeeRepository, EventRepository, TokenRepository, UserRepository};
