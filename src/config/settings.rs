//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub identity: IdentityConfig,
    pub payment: PaymentConfig,
    pub google: GoogleConfig,
    pub urls: UrlsConfig,
    pub logging: LoggingConfig,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Identity provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IdentityConfig {
    pub api_url: String,
    pub api_key: String,
    pub timeout_seconds: u64,
}

/// Payment provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaymentConfig {
    pub api_url: String,
    pub secret_key: String,
    pub currency: String,
    pub timeout_seconds: u64,
}

/// Google OAuth and Calendar configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub calendar_api_url: String,
    pub timezone: String,
}

/// Fixed redirect destinations handed to the checkout and OAuth providers
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UrlsConfig {
    pub checkout_success: String,
    pub checkout_cancel: String,
    pub post_auth_redirect: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("PLANME"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::PlanMeError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "postgresql://localhost/planme".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            identity: IdentityConfig {
                api_url: "https://identitytoolkit.googleapis.com/v1".to_string(),
                api_key: String::new(),
                timeout_seconds: 10,
            },
            payment: PaymentConfig {
                api_url: "https://api.stripe.com/v1".to_string(),
                secret_key: String::new(),
                currency: "gbp".to_string(),
                timeout_seconds: 30,
            },
            google: GoogleConfig {
                client_id: String::new(),
                client_secret: String::new(),
                redirect_uri: "http://localhost:9090/api/google_auth/authenticated".to_string(),
                auth_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
                token_url: "https://oauth2.googleapis.com/token".to_string(),
                userinfo_url: "https://www.googleapis.com/oauth2/v2/userinfo".to_string(),
                calendar_api_url: "https://www.googleapis.com/calendar/v3".to_string(),
                timezone: "Europe/London".to_string(),
            },
            urls: UrlsConfig {
                checkout_success: "https://plan-me-lp.netlify.app/dashboard".to_string(),
                checkout_cancel: "https://plan-me-lp.netlify.app/".to_string(),
                post_auth_redirect: "http://localhost:5173/".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "/var/log/planme".to_string(),
            },
        }
    }
}
