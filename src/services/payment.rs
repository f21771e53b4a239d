//! Payment provider client
//!
//! REST client for the hosted checkout provider: price creation, checkout
//! session creation, and webhook payload parsing. The checkout session is
//! ephemeral correlation state; its metadata carries the local identifiers
//! reconciliation needs, and the attendee row stays the source of truth.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::settings::Settings;
use crate::utils::errors::{PaymentError, PlanMeError, Result};

/// Webhook event type that confirms a finished checkout
const CHECKOUT_COMPLETED: &str = "checkout.session.completed";

/// A checkout session handle returned to the caller for redirection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    /// Hosted checkout page the client is redirected to
    pub url: Option<String>,
}

/// Correlation metadata attached to a checkout session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetadata {
    pub attendee_id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub event_id: i64,
    pub payment_status: String,
}

#[derive(Debug, Deserialize)]
struct PriceObject {
    id: String,
}

#[derive(Debug, Deserialize)]
struct WebhookEnvelope {
    #[serde(rename = "type")]
    event_type: String,
    data: WebhookData,
}

#[derive(Debug, Deserialize)]
struct WebhookData {
    object: WebhookSession,
}

#[derive(Debug, Deserialize)]
struct WebhookSession {
    id: String,
    metadata: WireMetadata,
}

// Metadata values come back as strings regardless of their original type.
#[derive(Debug, Deserialize)]
struct WireMetadata {
    attendee_id: String,
    user_id: String,
    #[serde(default)]
    user_name: String,
    event_id: String,
    #[serde(default)]
    payment_status: String,
}

/// Payment provider service
#[derive(Debug, Clone)]
pub struct PaymentService {
    client: Client,
    settings: Settings,
}

impl PaymentService {
    /// Create a new PaymentService instance
    pub fn new(settings: Settings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.payment.timeout_seconds))
            .user_agent("PlanMe-Backend/1.0")
            .build()
            .map_err(PlanMeError::Http)?;

        Ok(Self { client, settings })
    }

    /// Create a price descriptor for one ticket at the given minor-unit
    /// amount
    pub async fn create_price(&self, unit_amount: i64, product_name: &str) -> Result<String> {
        debug!(unit_amount = unit_amount, product = %product_name, "Creating provider price");

        let params = [
            ("currency", self.settings.payment.currency.clone()),
            ("unit_amount", unit_amount.to_string()),
            ("product_data[name]", product_name.to_string()),
        ];

        let price: PriceObject = self.post_form("prices", &params).await?;

        debug!(price_id = %price.id, "Provider price created");
        Ok(price.id)
    }

    /// Open a hosted checkout session carrying the registration metadata
    pub async fn create_checkout_session(
        &self,
        price_id: &str,
        metadata: &SessionMetadata,
    ) -> Result<CheckoutSession> {
        debug!(
            attendee_id = metadata.attendee_id,
            event_id = metadata.event_id,
            "Opening checkout session"
        );

        let params = [
            ("success_url", self.settings.urls.checkout_success.clone()),
            ("cancel_url", self.settings.urls.checkout_cancel.clone()),
            ("mode", "payment".to_string()),
            ("line_items[0][price]", price_id.to_string()),
            ("line_items[0][quantity]", "1".to_string()),
            ("metadata[attendee_id]", metadata.attendee_id.to_string()),
            ("metadata[user_id]", metadata.user_id.to_string()),
            ("metadata[user_name]", metadata.user_name.clone()),
            ("metadata[event_id]", metadata.event_id.to_string()),
            ("metadata[payment_status]", metadata.payment_status.clone()),
        ];

        let session: CheckoutSession = self.post_form("checkout/sessions", &params).await?;

        info!(
            session_id = %session.id,
            attendee_id = metadata.attendee_id,
            "Checkout session opened"
        );
        Ok(session)
    }

    /// Parse the webhook payload delivered when a checkout completes and
    /// return the metadata of that specific session. Reconciliation keys
    /// off this payload, never off a "most recent sessions" listing.
    pub fn parse_completed_webhook(payload: &str) -> Result<SessionMetadata> {
        let envelope: WebhookEnvelope = serde_json::from_str(payload).map_err(|e| {
            PlanMeError::Payment(PaymentError::InvalidWebhookPayload(e.to_string()))
        })?;

        if envelope.event_type != CHECKOUT_COMPLETED {
            return Err(PlanMeError::Payment(PaymentError::InvalidWebhookPayload(
                format!("unexpected event type {:?}", envelope.event_type),
            )));
        }

        let session = envelope.data.object;
        let wire = session.metadata;

        let parse_id = |name: &str, value: &str| -> Result<i64> {
            value.parse().map_err(|_| {
                PlanMeError::Payment(PaymentError::InvalidWebhookPayload(format!(
                    "metadata field {} is not an integer: {:?}",
                    name, value
                )))
            })
        };

        let metadata = SessionMetadata {
            attendee_id: parse_id("attendee_id", &wire.attendee_id)?,
            user_id: parse_id("user_id", &wire.user_id)?,
            user_name: wire.user_name,
            event_id: parse_id("event_id", &wire.event_id)?,
            payment_status: wire.payment_status,
        };

        debug!(
            session_id = %session.id,
            attendee_id = metadata.attendee_id,
            "Parsed completed-checkout webhook"
        );
        Ok(metadata)
    }

    async fn post_form<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.settings.payment.api_url, endpoint);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.settings.payment.secret_key)
            .header("Idempotency-Key", Uuid::new_v4().to_string())
            .form(params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PlanMeError::Payment(PaymentError::Timeout)
                } else {
                    PlanMeError::Payment(PaymentError::RequestFailed(e.to_string()))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(PlanMeError::Payment(PaymentError::RequestFailed(format!(
                "HTTP {}: {}",
                status, text
            ))));
        }

        response
            .json()
            .await
            .map_err(|e| PlanMeError::Payment(PaymentError::InvalidResponse(e.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn completed_payload() -> String {
        serde_json::json!({
            "id": "evt_1",
            "type": "checkout.session.completed",
            "data": {
                "object": {
                    "id": "cs_test_123",
                    "metadata": {
                        "attendee_id": "42",
                        "user_id": "7",
                        "user_name": "Ada",
                        "event_id": "99",
                        "payment_status": "Incompleted"
                    }
                }
            }
        })
        .to_string()
    }

    #[test]
    fn test_parse_completed_webhook() {
        let metadata = PaymentService::parse_completed_webhook(&completed_payload()).unwrap();
        assert_eq!(
            metadata,
            SessionMetadata {
                attendee_id: 42,
                user_id: 7,
                user_name: "Ada".to_string(),
                event_id: 99,
                payment_status: "Incompleted".to_string(),
            }
        );
    }

    #[test]
    fn test_wrong_event_type_rejected() {
        let payload = completed_payload().replace("checkout.session.completed", "invoice.paid");
        assert_matches!(
            PaymentService::parse_completed_webhook(&payload),
            Err(PlanMeError::Payment(PaymentError::InvalidWebhookPayload(_)))
        );
    }

    #[test]
    fn test_non_numeric_metadata_rejected() {
        let payload = completed_payload().replace("\"42\"", "\"forty-two\"");
        assert_matches!(
            PaymentService::parse_completed_webhook(&payload),
            Err(PlanMeError::Payment(PaymentError::InvalidWebhookPayload(_)))
        );
    }

    #[test]
    fn test_garbage_payload_rejected() {
        assert_matches!(
            PaymentService::parse_completed_webhook("not json"),
            Err(PlanMeError::Payment(PaymentError::InvalidWebhookPayload(_)))
        );
    }
}
