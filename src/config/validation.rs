//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use super::Settings;
use crate::utils::errors::{PlanMeError, Result};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_database_config(&settings.database)?;
    validate_identity_config(&settings.identity)?;
    validate_payment_config(&settings.payment)?;
    validate_google_config(&settings.google)?;
    validate_urls_config(&settings.urls)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(PlanMeError::Config("Database URL is required".to_string()));
    }

    if config.max_connections == 0 {
        return Err(PlanMeError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(PlanMeError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

/// Validate identity provider configuration
fn validate_identity_config(config: &super::IdentityConfig) -> Result<()> {
    if config.api_url.is_empty() {
        return Err(PlanMeError::Config(
            "Identity provider API URL is required".to_string(),
        ));
    }

    if config.api_key.is_empty() {
        return Err(PlanMeError::Config(
            "Identity provider API key is required".to_string(),
        ));
    }

    Ok(())
}

/// Validate payment provider configuration
fn validate_payment_config(config: &super::PaymentConfig) -> Result<()> {
    if config.api_url.is_empty() {
        return Err(PlanMeError::Config(
            "Payment provider API URL is required".to_string(),
        ));
    }

    if config.secret_key.is_empty() {
        return Err(PlanMeError::Config(
            "Payment provider secret key is required".to_string(),
        ));
    }

    if config.currency.len() != 3 {
        return Err(PlanMeError::Config(
            "Currency must be a three-letter ISO code".to_string(),
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(PlanMeError::Config(
            "Payment provider timeout must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate Google OAuth configuration
fn validate_google_config(config: &super::GoogleConfig) -> Result<()> {
    if config.client_id.is_empty() {
        return Err(PlanMeError::Config(
            "Google client ID is required".to_string(),
        ));
    }

    if config.client_secret.is_empty() {
        return Err(PlanMeError::Config(
            "Google client secret is required".to_string(),
        ));
    }

    if config.redirect_uri.is_empty() {
        return Err(PlanMeError::Config(
            "Google redirect URI is required".to_string(),
        ));
    }

    Ok(())
}

/// Validate redirect URL configuration
fn validate_urls_config(config: &super::UrlsConfig) -> Result<()> {
    for (name, value) in [
        ("checkout success URL", &config.checkout_success),
        ("checkout cancel URL", &config.checkout_cancel),
        ("post-auth redirect URL", &config.post_auth_redirect),
    ] {
        if value.is_empty() {
            return Err(PlanMeError::Config(format!("{} is required", name)));
        }

        url::Url::parse(value)
            .map_err(|e| PlanMeError::Config(format!("{} is not a valid URL: {}", name, e)))?;
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(PlanMeError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(PlanMeError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured_settings() -> Settings {
        let mut settings = Settings::default();
        settings.identity.api_key = "test-key".to_string();
        settings.payment.secret_key = "sk_test_123".to_string();
        settings.google.client_id = "client".to_string();
        settings.google.client_secret = "secret".to_string();
        settings
    }

    #[test]
    fn test_configured_settings_validate() {
        assert!(validate_settings(&configured_settings()).is_ok());
    }

    #[test]
    fn test_missing_payment_key_rejected() {
        let mut settings = configured_settings();
        settings.payment.secret_key.clear();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_bad_log_level_rejected() {
        let mut settings = configured_settings();
        settings.logging.level = "verbose".to_string();
        assert!(validate_settings(&settings).is_err());
    }
}
