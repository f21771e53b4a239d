//! Payment provider client integration tests
//!
//! Drives the checkout provider client against a wiremock server: price
//! creation, session creation with correlation metadata, and failure
//! mapping.

mod helpers;

use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use planme::services::payment::{PaymentService, SessionMetadata};
use planme::utils::errors::{PaymentError, PlanMeError};

fn metadata() -> SessionMetadata {
    SessionMetadata {
        attendee_id: 42,
        user_id: 7,
        user_name: "Ada".to_string(),
        event_id: 99,
        payment_status: "Incompleted".to_string(),
    }
}

#[tokio::test]
async fn create_price_posts_minor_units_and_product_name() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/prices"))
        .and(header_exists("authorization"))
        .and(header_exists("idempotency-key"))
        .and(body_string_contains("unit_amount=1250"))
        .and(body_string_contains("currency=gbp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "price_abc" })))
        .expect(1)
        .mount(&server)
        .await;

    let service = PaymentService::new(helpers::test_settings(&server.uri())).unwrap();
    let price_id = service.create_price(1250, "Launch Party").await.unwrap();

    assert_eq!(price_id, "price_abc");
}

#[tokio::test]
async fn checkout_session_carries_correlation_metadata() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/checkout/sessions"))
        .and(body_string_contains("mode=payment"))
        .and(body_string_contains("line_items%5B0%5D%5Bprice%5D=price_abc"))
        .and(body_string_contains("metadata%5Battendee_id%5D=42"))
        .and(body_string_contains("metadata%5Buser_id%5D=7"))
        .and(body_string_contains("metadata%5Bevent_id%5D=99"))
        .and(body_string_contains("metadata%5Bpayment_status%5D=Incompleted"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cs_test_1",
            "url": "https://checkout.example/c/cs_test_1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = PaymentService::new(helpers::test_settings(&server.uri())).unwrap();
    let session = service
        .create_checkout_session("price_abc", &metadata())
        .await
        .unwrap();

    assert_eq!(session.id, "cs_test_1");
    assert_eq!(
        session.url.as_deref(),
        Some("https://checkout.example/c/cs_test_1")
    );
}

#[tokio::test]
async fn provider_failure_maps_to_upstream_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/prices"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal provider fault"))
        .mount(&server)
        .await;

    let service = PaymentService::new(helpers::test_settings(&server.uri())).unwrap();
    let err = service.create_price(500, "Launch Party").await.unwrap_err();

    assert_matches!(err, PlanMeError::Payment(PaymentError::RequestFailed(_)));
    assert_eq!(err.status_code(), 502);
    // The provider's fault text never reaches the client
    assert_eq!(err.public_message(), "An unexpected error occurred");
}
