//! Shared helpers for provider-client integration tests

use planme::config::Settings;

/// Settings wired to point every provider at a local mock server
pub fn test_settings(mock_base_url: &str) -> Settings {
    let mut settings = Settings::default();

    settings.identity.api_url = mock_base_url.to_string();
    settings.identity.api_key = "test-api-key".to_string();

    settings.payment.api_url = mock_base_url.to_string();
    settings.payment.secret_key = "sk_test_123".to_string();

    settings.google.client_id = "test-client".to_string();
    settings.google.client_secret = "test-secret".to_string();
    settings.google.token_url = format!("{}/token", mock_base_url);
    settings.google.userinfo_url = format!("{}/userinfo", mock_base_url);
    settings.google.calendar_api_url = mock_base_url.to_string();

    settings
}
