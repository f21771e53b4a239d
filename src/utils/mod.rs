//! Utilities module
//!
//! This module contains error handling, logging and input normalization

pub mod errors;
pub mod logging;
pub mod sanitize;

pub use errors::{GoogleError, IdentityError, PaymentError, PlanMeError, Result};
