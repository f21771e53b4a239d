//! Calendar sync bridge
//!
//! Exchanges a one-time authorization code for durable credentials,
//! persists them per user, and later uses them to push one event into the
//! user's external calendar. Stored dates and times are locale strings;
//! they are parsed into calendar values here, at the boundary.

use std::time::Duration;

use chrono::{NaiveDate, NaiveTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::config::settings::{GoogleConfig, Settings};
use crate::database::repositories::{EventRepository, TokenRepository, UserRepository};
use crate::models::event::{Event, DATE_FORMAT};
use crate::models::token::StoreTokensRequest;
use crate::services::auth::Principal;
use crate::utils::errors::{GoogleError, PlanMeError, Result};

const CALENDAR_SCOPES: [&str; 3] = [
    "https://www.googleapis.com/auth/calendar",
    "https://www.googleapis.com/auth/userinfo.email",
    "https://www.googleapis.com/auth/userinfo.profile",
];

/// Outcome of a calendar push: either the event went in, or the user has
/// no stored credentials and must authorize first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CalendarPush {
    Added {
        message: String,
        event_link: Option<String>,
    },
    AuthorizationRequired {
        url: String,
    },
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    scope: String,
    token_type: String,
    expires_in: i64,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    email: String,
}

#[derive(Debug, Deserialize)]
struct InsertedEvent {
    #[serde(rename = "htmlLink")]
    html_link: Option<String>,
}

/// Build the consent URL users are redirected to: calendar and profile
/// scopes, offline access, forced consent.
pub fn build_authorization_url(config: &GoogleConfig) -> String {
    format!(
        "{}?client_id={}&redirect_uri={}&response_type=code&access_type=offline&prompt=consent&scope={}",
        config.auth_url,
        urlencoding::encode(&config.client_id),
        urlencoding::encode(&config.redirect_uri),
        urlencoding::encode(&CALENDAR_SCOPES.join(" ")),
    )
}

/// Turn a stored `DD-MM-YYYY` date and `HH:MM` time into the provider's
/// local datetime format. The timezone label travels alongside, so no
/// offset arithmetic happens here.
pub fn to_calendar_datetime(date: &str, time: &str) -> Result<String> {
    let date = NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|e| {
        PlanMeError::Google(GoogleError::InvalidEventData(format!(
            "invalid date {:?}: {}",
            date, e
        )))
    })?;
    let time = NaiveTime::parse_from_str(time, "%H:%M").map_err(|e| {
        PlanMeError::Google(GoogleError::InvalidEventData(format!(
            "invalid time {:?}: {}",
            time, e
        )))
    })?;

    Ok(date.and_time(time).format("%Y-%m-%dT%H:%M:%S").to_string())
}

/// Calendar provider service
#[derive(Debug, Clone)]
pub struct CalendarService {
    client: Client,
    token_repository: TokenRepository,
    user_repository: UserRepository,
    event_repository: EventRepository,
    settings: Settings,
}

impl CalendarService {
    /// Create a new CalendarService instance
    pub fn new(
        token_repository: TokenRepository,
        user_repository: UserRepository,
        event_repository: EventRepository,
        settings: Settings,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("PlanMe-Backend/1.0")
            .build()
            .map_err(PlanMeError::Http)?;

        Ok(Self {
            client,
            token_repository,
            user_repository,
            event_repository,
            settings,
        })
    }

    /// The consent URL for starting calendar authorization
    pub fn authorization_url(&self) -> String {
        build_authorization_url(&self.settings.google)
    }

    /// Exchange a one-time authorization code for durable credentials,
    /// persist them for the caller, and flip the calendar-activated flag.
    /// Returns the post-authorization redirect destination.
    pub async fn store_token(&self, principal: &Principal, code: &str) -> Result<String> {
        debug!(uid = %principal.uid(), "Exchanging authorization code");

        let tokens = self.exchange_code(code).await?;
        let account_email = self.fetch_account_email(&tokens.access_token).await?;

        if tokens.refresh_token.is_none() {
            warn!(uid = %principal.uid(), "No refresh token received from provider");
        }

        let user = self
            .user_repository
            .find_by_firebase_uid(principal.uid())
            .await?
            .ok_or_else(|| PlanMeError::UserNotFound {
                uid: principal.uid().to_string(),
            })?;

        let expiry_date = Utc::now().timestamp_millis() + tokens.expires_in * 1000;
        self.token_repository
            .upsert(StoreTokensRequest {
                user_id: user.user_id,
                google_account_email: account_email,
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token,
                scope: tokens.scope,
                token_type: tokens.token_type,
                expiry_date,
            })
            .await?;

        self.user_repository
            .set_calendar_activated(user.user_id, true)
            .await?;

        info!(user_id = user.user_id, "Calendar credentials stored");
        Ok(self.settings.urls.post_auth_redirect.clone())
    }

    /// Push one event into the caller's external calendar. Callers with no
    /// stored credentials get the consent URL instead of a push.
    pub async fn add_event_to_calendar(
        &self,
        principal: &Principal,
        event_id: i64,
    ) -> Result<CalendarPush> {
        let user = self
            .user_repository
            .find_by_firebase_uid(principal.uid())
            .await?
            .ok_or_else(|| PlanMeError::UserNotFound {
                uid: principal.uid().to_string(),
            })?;

        let tokens = match self.token_repository.find_by_user(user.user_id).await? {
            Some(tokens) => tokens,
            None => {
                info!(user_id = user.user_id, "No calendar credentials, returning consent URL");
                return Ok(CalendarPush::AuthorizationRequired {
                    url: self.authorization_url(),
                });
            }
        };

        let event = self
            .event_repository
            .find_by_id(event_id)
            .await?
            .ok_or(PlanMeError::EventNotFound { event_id })?;

        let link = self.insert_event(&tokens.access_token, &event).await?;

        info!(user_id = user.user_id, event_id = event_id, "Event pushed to calendar");
        Ok(CalendarPush::Added {
            message: "Event added to Google Calendar".to_string(),
            event_link: link,
        })
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenResponse> {
        let params = [
            ("code", code),
            ("client_id", self.settings.google.client_id.as_str()),
            ("client_secret", self.settings.google.client_secret.as_str()),
            ("redirect_uri", self.settings.google.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self
            .client
            .post(&self.settings.google.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| PlanMeError::Google(GoogleError::TokenExchangeFailed(e.to_string())))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(PlanMeError::Google(GoogleError::TokenExchangeFailed(
                format!("HTTP {}", status),
            )));
        }

        response
            .json()
            .await
            .map_err(|e| PlanMeError::Google(GoogleError::TokenExchangeFailed(e.to_string())))
    }

    async fn fetch_account_email(&self, access_token: &str) -> Result<String> {
        let response = self
            .client
            .get(&self.settings.google.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| PlanMeError::Google(GoogleError::ApiError(e.to_string())))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(PlanMeError::Google(GoogleError::ApiError(format!(
                "userinfo returned HTTP {}",
                status
            ))));
        }

        let info: UserInfo = response
            .json()
            .await
            .map_err(|e| PlanMeError::Google(GoogleError::ApiError(e.to_string())))?;

        Ok(info.email)
    }

    async fn insert_event(&self, access_token: &str, event: &Event) -> Result<Option<String>> {
        let timezone = &self.settings.google.timezone;
        let payload = json!({
            "summary": event.title,
            "location": event.venue,
            "description": event.description,
            "start": {
                "dateTime": to_calendar_datetime(&event.date, &event.start_time)?,
                "timeZone": timezone,
            },
            "end": {
                "dateTime": to_calendar_datetime(&event.date, &event.end_time)?,
                "timeZone": timezone,
            },
        });

        let url = format!(
            "{}/calendars/primary/events",
            self.settings.google.calendar_api_url
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| PlanMeError::Google(GoogleError::EventInsertionFailed(e.to_string())))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(PlanMeError::Google(GoogleError::EventInsertionFailed(
                format!("HTTP {}", status),
            )));
        }

        let inserted: InsertedEvent = response
            .json()
            .await
            .map_err(|e| PlanMeError::Google(GoogleError::EventInsertionFailed(e.to_string())))?;

        Ok(inserted.html_link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_authorization_url_carries_scopes_and_consent() {
        let mut config = Settings::default().google;
        config.client_id = "client-1".to_string();
        let url = build_authorization_url(&config);

        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("client_id=client-1"));
        assert!(url.contains("access_type=offline"));
        assert!(url.contains("prompt=consent"));
        assert!(url.contains(&*urlencoding::encode(
            "https://www.googleapis.com/auth/calendar"
        )));
        assert!(url.contains(&*urlencoding::encode(
            "https://www.googleapis.com/auth/userinfo.email"
        )));
    }

    #[test]
    fn test_locale_date_and_time_become_calendar_datetime() {
        assert_eq!(
            to_calendar_datetime("01-03-2025", "18:00").unwrap(),
            "2025-03-01T18:00:00"
        );
        assert_eq!(
            to_calendar_datetime("31-12-2024", "09:30").unwrap(),
            "2024-12-31T09:30:00"
        );
    }

    #[test]
    fn test_unparseable_date_is_rejected() {
        assert_matches!(
            to_calendar_datetime("2025-03-01", "18:00"),
            Err(PlanMeError::Google(GoogleError::InvalidEventData(_)))
        );
        assert_matches!(
            to_calendar_datetime("01-03-2025", "6pm"),
            Err(PlanMeError::Google(GoogleError::InvalidEventData(_)))
        );
    }
}
