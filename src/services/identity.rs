//! Identity provider client
//!
//! REST client for the external authentication provider: account creation,
//! password sign-in, verification email dispatch and account deletion.
//! Provider error codes are mapped onto the crate error taxonomy here so
//! nothing upstream needs to know the provider's wire format.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::config::settings::Settings;
use crate::utils::errors::{IdentityError, PlanMeError, Result};

/// A provider-side account, as returned by sign-up and sign-in
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityAccount {
    #[serde(rename = "localId")]
    pub local_id: String,
    pub email: String,
    #[serde(rename = "idToken")]
    pub id_token: String,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
struct LookupUser {
    #[serde(rename = "emailVerified", default)]
    email_verified: bool,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: ProviderError,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    message: String,
}

/// Identity provider service
#[derive(Debug, Clone)]
pub struct IdentityService {
    client: Client,
    settings: Settings,
}

impl IdentityService {
    /// Create a new IdentityService instance
    pub fn new(settings: Settings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.identity.timeout_seconds))
            .user_agent("PlanMe-Backend/1.0")
            .build()
            .map_err(PlanMeError::Http)?;

        Ok(Self { client, settings })
    }

    /// Create a provider account for a new user
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<IdentityAccount> {
        debug!(email = %email, "Creating identity provider account");

        let account: IdentityAccount = self
            .post(
                "accounts:signUp",
                json!({
                    "email": email,
                    "password": password,
                    "returnSecureToken": true,
                }),
            )
            .await?;

        info!(uid = %account.local_id, "Identity provider account created");
        Ok(account)
    }

    /// Send the verification email for a freshly created account
    pub async fn send_email_verification(&self, id_token: &str) -> Result<()> {
        let _: serde_json::Value = self
            .post(
                "accounts:sendOobCode",
                json!({
                    "requestType": "VERIFY_EMAIL",
                    "idToken": id_token,
                }),
            )
            .await?;

        debug!("Verification email dispatched");
        Ok(())
    }

    /// Sign in with email and password
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<IdentityAccount> {
        debug!(email = %email, "Signing in with identity provider");

        self.post(
            "accounts:signInWithPassword",
            json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }),
        )
        .await
    }

    /// Whether the account behind the token has a verified email address
    pub async fn is_email_verified(&self, id_token: &str) -> Result<bool> {
        let response: LookupResponse = self
            .post("accounts:lookup", json!({ "idToken": id_token }))
            .await?;

        Ok(response
            .users
            .first()
            .map(|user| user.email_verified)
            .unwrap_or(false))
    }

    /// Delete the provider account behind the token
    pub async fn delete_account(&self, id_token: &str) -> Result<()> {
        let _: serde_json::Value = self
            .post("accounts:delete", json!({ "idToken": id_token }))
            .await?;

        info!("Identity provider account deleted");
        Ok(())
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        body: serde_json::Value,
    ) -> Result<T> {
        let url = format!(
            "{}/{}?key={}",
            self.settings.identity.api_url, endpoint, self.settings.identity.api_key
        );

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                PlanMeError::Identity(IdentityError::RequestFailed(e.to_string()))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(PlanMeError::Identity(Self::map_provider_error(
                status.as_u16(),
                &text,
            )));
        }

        response
            .json()
            .await
            .map_err(|e| PlanMeError::Identity(IdentityError::InvalidResponse(e.to_string())))
    }

    /// Map the provider's error codes onto the crate taxonomy
    fn map_provider_error(status: u16, body: &str) -> IdentityError {
        let code = serde_json::from_str::<ProviderErrorBody>(body)
            .map(|body| body.error.message)
            .unwrap_or_default();

        match code.as_str() {
            "EMAIL_EXISTS" => IdentityError::EmailAlreadyInUse,
            "MISSING_PASSWORD" => IdentityError::MissingPassword,
            "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
                IdentityError::InvalidCredentials
            }
            other => {
                warn!(status = status, code = other, "Unmapped identity provider error");
                IdentityError::RequestFailed(format!("HTTP {}", status))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_duplicate_email_maps_to_conflict() {
        let body = r#"{"error": {"message": "EMAIL_EXISTS", "code": 400}}"#;
        let err = IdentityService::map_provider_error(400, body);
        assert_matches!(err, IdentityError::EmailAlreadyInUse);
        assert_eq!(PlanMeError::Identity(err).status_code(), 409);
    }

    #[test]
    fn test_missing_password_maps_to_validation() {
        let body = r#"{"error": {"message": "MISSING_PASSWORD"}}"#;
        assert_matches!(
            IdentityService::map_provider_error(400, body),
            IdentityError::MissingPassword
        );
    }

    #[test]
    fn test_unknown_code_is_generic_failure() {
        let err = IdentityService::map_provider_error(500, "not even json");
        assert_matches!(err, IdentityError::RequestFailed(_));
        assert_eq!(PlanMeError::Identity(err).status_code(), 500);
    }
}
