//! PlanMe event ticketing backend
//!
//! This library provides the service layer for an event-ticketing product:
//! event listing with dynamic filtering, multi-field sort and pagination,
//! attendee registration coordinated with a hosted checkout provider, and
//! optional calendar sync. HTTP routing mounts these services; it is not
//! part of this crate.

pub mod config;
pub mod database;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{PlanMeError, Result};

// Re-export main components for easy access
pub use database::{EventQuery, SortDirection, SortKey};
pub use services::{Principal, ServiceFactory};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
