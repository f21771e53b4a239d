//! Calendar bridge integration tests
//!
//! The datetime translation and consent-URL construction are covered by
//! unit tests; these exercise the provider-facing failure mapping.

mod helpers;

use assert_matches::assert_matches;
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use planme::database::repositories::{EventRepository, TokenRepository, UserRepository};
use planme::services::calendar::CalendarService;
use planme::services::Principal;
use planme::utils::errors::{GoogleError, PlanMeError};

fn calendar_service(base_url: &str) -> CalendarService {
    // Lazy pool: never connects unless a repository is actually hit.
    let pool = PgPoolOptions::new()
        .connect_lazy("postgresql://localhost/planme_test")
        .unwrap();

    CalendarService::new(
        TokenRepository::new(pool.clone()),
        UserRepository::new(pool.clone()),
        EventRepository::new(pool),
        helpers::test_settings(base_url),
    )
    .unwrap()
}

#[tokio::test]
async fn consent_url_requests_offline_calendar_access() {
    let service = calendar_service("http://unused.invalid");
    let url = service.authorization_url();

    assert!(url.contains("access_type=offline"));
    assert!(url.contains("prompt=consent"));
    assert!(url.contains("response_type=code"));
    assert!(url.contains("client_id=test-client"));
}

#[tokio::test]
async fn rejected_code_exchange_maps_to_upstream_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant"
        })))
        .mount(&server)
        .await;

    let service = calendar_service(&server.uri());
    let principal = Principal::from_uid("uid-123").unwrap();
    let err = service.store_token(&principal, "stale-code").await.unwrap_err();

    assert_matches!(err, PlanMeError::Google(GoogleError::TokenExchangeFailed(_)));
    assert_eq!(err.status_code(), 502);
}
