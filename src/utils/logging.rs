//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging
//! utilities for the PlanMe backend.

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "planme.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(())
}

/// Log event management actions with structured data
pub fn log_event_action(event_id: i64, action: &str, user_id: i64) {
    info!(
        event_id = event_id,
        action = action,
        user_id = user_id,
        "Event action performed"
    );
}

/// Log payment lifecycle transitions
pub fn log_payment_transition(attendee_id: i64, from: &str, to: &str) {
    info!(
        attendee_id = attendee_id,
        from = from,
        to = to,
        "Payment status transition"
    );
}

/// Log provider API errors with context
pub fn log_provider_error(provider: &str, error: &str, context: Option<&str>) {
    warn!(
        provider = provider,
        error = error,
        context = context,
        "Provider API error occurred"
    );
}
