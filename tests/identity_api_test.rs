//! Identity provider client integration tests

mod helpers;

use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use planme::services::identity::IdentityService;
use planme::utils::errors::{IdentityError, PlanMeError};

#[tokio::test]
async fn sign_up_returns_provider_account() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/accounts:signUp"))
        .and(query_param("key", "test-api-key"))
        .and(body_string_contains("ada@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "localId": "uid-123",
            "email": "ada@example.com",
            "idToken": "token-abc"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = IdentityService::new(helpers::test_settings(&server.uri())).unwrap();
    let account = service.sign_up("ada@example.com", "hunter22").await.unwrap();

    assert_eq!(account.local_id, "uid-123");
    assert_eq!(account.email, "ada@example.com");
    assert_eq!(account.id_token, "token-abc");
}

#[tokio::test]
async fn duplicate_email_maps_to_conflict() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/accounts:signUp"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 400, "message": "EMAIL_EXISTS" }
        })))
        .mount(&server)
        .await;

    let service = IdentityService::new(helpers::test_settings(&server.uri())).unwrap();
    let err = service.sign_up("ada@example.com", "hunter22").await.unwrap_err();

    assert_matches!(err, PlanMeError::Identity(IdentityError::EmailAlreadyInUse));
    assert_eq!(err.status_code(), 409);
}

#[tokio::test]
async fn lookup_reports_email_verification_state() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/accounts:lookup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{ "localId": "uid-123", "emailVerified": false }]
        })))
        .mount(&server)
        .await;

    let service = IdentityService::new(helpers::test_settings(&server.uri())).unwrap();
    assert!(!service.is_email_verified("token-abc").await.unwrap());
}

#[tokio::test]
async fn bad_credentials_map_to_invalid_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/accounts:signInWithPassword"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 400, "message": "INVALID_LOGIN_CREDENTIALS" }
        })))
        .mount(&server)
        .await;

    let service = IdentityService::new(helpers::test_settings(&server.uri())).unwrap();
    let err = service.sign_in("ada@example.com", "wrong").await.unwrap_err();

    assert_matches!(err, PlanMeError::Identity(IdentityError::InvalidCredentials));
    assert_eq!(err.status_code(), 400);
}
