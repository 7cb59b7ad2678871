// src/services/stripe.rs
// DOCUMENTATION: Minimal Stripe REST client and webhook signature verification
// PURPOSE: Customers, payment methods, payment intents, products and prices over reqwest

use crate::config::Config;
use crate::errors::ApiError;
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use sha2::Sha256;
use std::time::Duration;
use thiserror::Error;

/// Maximum age of a webhook signature, in seconds
pub const WEBHOOK_TOLERANCE_SECS: i64 = 300;

#[derive(Error, Debug)]
pub enum StripeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Stripe API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Webhook signature verification failed: {0}")]
    Signature(String),

    #[error("Invalid webhook payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl From<StripeError> for ApiError {
    fn from(err: StripeError) -> Self {
        match err {
            StripeError::Signature(_) | StripeError::Payload(_) => {
                ApiError::InvalidInput(err.to_string())
            }
            _ => ApiError::ExternalApiError(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Customer {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Price {
    pub id: String,
}

/// Parameters of a confirmed one-off charge
#[derive(Debug, Clone)]
pub struct PaymentIntentParams<'a> {
    pub amount_cents: i64,
    pub currency: &'a str,
    pub customer_id: &'a str,
    pub payment_method_id: &'a str,
    pub description: String,
    pub metadata: Vec<(&'a str, String)>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
}

/// Convert a decimal amount to the smallest currency unit
pub fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

pub struct StripeClient {
    client: Client,
    api_base: String,
    secret_key: String,
}

impl StripeClient {
    pub fn new(api_base: &str, secret_key: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            secret_key: secret_key.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.stripe_api_base, &config.stripe_secret_key)
    }

    /// POST a form to `/v1/{path}` and decode the JSON response
    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(&str, String)],
    ) -> Result<T, StripeError> {
        let url = format!("{}/v1/{}", self.api_base, path);
        log::debug!("Stripe POST {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<StripeErrorBody>(&text)
                .ok()
                .and_then(|b| b.error.message)
                .unwrap_or(text);
            log::error!("Stripe API error on {} ({}): {}", path, status, message);
            return Err(StripeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<T>().await?)
    }

    pub async fn create_customer(
        &self,
        email: &str,
        name: &str,
        user_id: &str,
    ) -> Result<Customer, StripeError> {
        self.post(
            "customers",
            &[
                ("email", email.to_string()),
                ("name", name.to_string()),
                ("metadata[userId]", user_id.to_string()),
            ],
        )
        .await
    }

    pub async fn attach_payment_method(
        &self,
        payment_method_id: &str,
        customer_id: &str,
    ) -> Result<Value, StripeError> {
        self.post(
            &format!("payment_methods/{}/attach", payment_method_id),
            &[("customer", customer_id.to_string())],
        )
        .await
    }

    pub async fn set_default_payment_method(
        &self,
        customer_id: &str,
        payment_method_id: &str,
    ) -> Result<Customer, StripeError> {
        self.post(
            &format!("customers/{}", customer_id),
            &[(
                "invoice_settings[default_payment_method]",
                payment_method_id.to_string(),
            )],
        )
        .await
    }

    /// Create and immediately confirm a PaymentIntent without redirects
    pub async fn create_payment_intent(
        &self,
        params: &PaymentIntentParams<'_>,
    ) -> Result<PaymentIntent, StripeError> {
        let metadata: Vec<(String, String)> = params
            .metadata
            .iter()
            .map(|(k, v)| (format!("metadata[{}]", k), v.clone()))
            .collect();
        let mut form = vec![
            ("amount", params.amount_cents.to_string()),
            ("currency", params.currency.to_string()),
            ("customer", params.customer_id.to_string()),
            ("payment_method", params.payment_method_id.to_string()),
            ("confirm", "true".to_string()),
            ("automatic_payment_methods[enabled]", "true".to_string()),
            ("automatic_payment_methods[allow_redirects]", "never".to_string()),
            ("description", params.description.clone()),
        ];
        form.extend(metadata.iter().map(|(k, v)| (k.as_str(), v.clone())));

        self.post("payment_intents", &form).await
    }

    pub async fn create_product(
        &self,
        name: &str,
        description: &str,
        metadata: &[(&str, String)],
    ) -> Result<Product, StripeError> {
        let keys: Vec<String> = metadata
            .iter()
            .map(|(k, _)| format!("metadata[{}]", k))
            .collect();
        let mut form = vec![
            ("name", name.to_string()),
            ("description", description.to_string()),
        ];
        form.extend(keys.iter().zip(metadata).map(|(k, (_, v))| (k.as_str(), v.clone())));

        self.post("products", &form).await
    }

    pub async fn create_price(
        &self,
        product_id: &str,
        unit_amount_cents: i64,
        currency: &str,
    ) -> Result<Price, StripeError> {
        self.post(
            "prices",
            &[
                ("product", product_id.to_string()),
                ("unit_amount", unit_amount_cents.to_string()),
                ("currency", currency.to_string()),
            ],
        )
        .await
    }
}

/// A verified webhook event
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: EventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    pub object: Value,
}

/// HMAC-SHA256 state over `"{timestamp}.{payload}"`
fn signed_payload_mac(
    secret: &str,
    timestamp: i64,
    payload: &[u8],
) -> Result<Hmac<Sha256>, StripeError> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .map_err(|e| StripeError::Signature(e.to_string()))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac)
}

/// Hex signature Stripe would send for this payload
pub fn compute_signature(secret: &str, timestamp: i64, payload: &[u8]) -> Result<String, StripeError> {
    let mac = signed_payload_mac(secret, timestamp, payload)?;
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Verify a `Stripe-Signature` header and decode the event
/// DOCUMENTATION: Header format is `t=<unix>,v1=<hex>[,v1=<hex>...]`; any matching v1 passes
pub fn construct_event(
    payload: &[u8],
    signature_header: &str,
    secret: &str,
    now: i64,
) -> Result<Event, StripeError> {
    let mut timestamp: Option<i64> = None;
    let mut signatures: Vec<&str> = Vec::new();

    for part in signature_header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse().ok(),
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }

    let timestamp =
        timestamp.ok_or_else(|| StripeError::Signature("missing timestamp".to_string()))?;
    if signatures.is_empty() {
        return Err(StripeError::Signature("no v1 signature".to_string()));
    }

    let mac = signed_payload_mac(secret, timestamp, payload)?;
    let matched = signatures.iter().any(|candidate| match hex::decode(candidate) {
        Ok(expected) => mac.clone().verify_slice(&expected).is_ok(),
        Err(_) => false,
    });
    if !matched {
        return Err(StripeError::Signature(
            "no signature matches the payload".to_string(),
        ));
    }

    if (now - timestamp).abs() > WEBHOOK_TOLERANCE_SECS {
        return Err(StripeError::Signature(
            "timestamp outside the tolerance zone".to_string(),
        ));
    }

    Ok(serde_json::from_slice(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SECRET: &str = "whsec_test";

    fn event_body() -> &'static [u8] {
        br#"{"id":"evt_1","type":"payment_intent.succeeded","data":{"object":{"id":"pi_1","amount":1000}}}"#
    }

    #[test]
    fn test_to_cents_rounds() {
        assert_eq!(to_cents(10.0), 1000);
        assert_eq!(to_cents(19.99), 1999);
        assert_eq!(to_cents(0.1 + 0.2), 30);
    }

    #[test]
    fn test_construct_event_accepts_valid_signature() {
        let now = 1_700_000_000;
        let sig = compute_signature(SECRET, now, event_body()).unwrap();
        let header = format!("t={},v1=deadbeef,v1={}", now, sig);

        let event = construct_event(event_body(), &header, SECRET, now + 10).unwrap();
        assert_eq!(event.event_type, "payment_intent.succeeded");
        assert_eq!(event.data.object["id"], "pi_1");
    }

    #[test]
    fn test_construct_event_rejects_tampering() {
        let now = 1_700_000_000;
        let sig = compute_signature(SECRET, now, event_body()).unwrap();
        let header = format!("t={},v1={}", now, sig);

        let tampered = br#"{"id":"evt_1","type":"payment_intent.succeeded","data":{"object":{"id":"pi_2"}}}"#;
        assert!(matches!(
            construct_event(tampered, &header, SECRET, now),
            Err(StripeError::Signature(_))
        ));
        assert!(construct_event(event_body(), &header, "whsec_other", now).is_err());
    }

    #[test]
    fn test_construct_event_rejects_stale_and_malformed() {
        let now = 1_700_000_000;
        let sig = compute_signature(SECRET, now, event_body()).unwrap();

        let header = format!("t={},v1={}", now, sig);
        assert!(construct_event(event_body(), &header, SECRET, now + WEBHOOK_TOLERANCE_SECS + 1).is_err());

        assert!(construct_event(event_body(), &format!("v1={}", sig), SECRET, now).is_err());
        assert!(construct_event(event_body(), &format!("t={}", now), SECRET, now).is_err());
    }

    #[test]
    fn test_signature_error_is_client_error() {
        let err: ApiError = StripeError::Signature("x".into()).into();
        assert!(matches!(err, ApiError::InvalidInput(_)));

        let err: ApiError = StripeError::Api {
            status: 402,
            message: "card declined".into(),
        }
        .into();
        assert!(matches!(err, ApiError::ExternalApiError(_)));
    }

    #[tokio::test]
    async fn test_create_customer_posts_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/customers"))
            .and(header("authorization", "Bearer sk_test_123"))
            .and(body_string_contains("email=ada%40example.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "cus_123",
                "object": "customer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = StripeClient::new(&server.uri(), "sk_test_123");
        let customer = client
            .create_customer("ada@example.com", "Ada", "u-1")
            .await
            .unwrap();
        assert_eq!(customer.id, "cus_123");
    }

    #[tokio::test]
    async fn test_payment_intent_sends_metadata() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/payment_intents"))
            .and(body_string_contains("amount=1500"))
            .and(body_string_contains("confirm=true"))
            .and(body_string_contains("subcategoryId"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "pi_1",
                "client_secret": "pi_1_secret_x",
                "status": "succeeded"
            })))
            .mount(&server)
            .await;

        let client = StripeClient::new(&server.uri(), "sk_test_123");
        let intent = client
            .create_payment_intent(&PaymentIntentParams {
                amount_cents: 1500,
                currency: "usd",
                customer_id: "cus_1",
                payment_method_id: "pm_1",
                description: "Payment for premium subcategory: Surf".into(),
                metadata: vec![("userId", "u-1".into()), ("subcategoryId", "s-1".into())],
            })
            .await
            .unwrap();
        assert_eq!(intent.id, "pi_1");
        assert_eq!(intent.client_secret.as_deref(), Some("pi_1_secret_x"));
    }

    #[tokio::test]
    async fn test_api_error_message_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/payment_methods/pm_bad/attach"))
            .respond_with(ResponseTemplate::new(402).set_body_json(serde_json::json!({
                "error": {"message": "Your card was declined.", "type": "card_error"}
            })))
            .mount(&server)
            .await;

        let client = StripeClient::new(&server.uri(), "sk_test_123");
        match client.attach_payment_method("pm_bad", "cus_1").await {
            Err(StripeError::Api { status, message }) => {
                assert_eq!(status, 402);
                assert_eq!(message, "Your card was declined.");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
