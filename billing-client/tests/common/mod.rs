//! Shared helpers for billing-client integration tests.

use billing_client::{ApiClient, Settings};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const TEST_CSRF: &str = "test-csrf-token";

/// Spin up a mock Server API and a client pointed at it.
pub async fn spawn_api() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let mut settings = Settings::default().with_csrf_token(TEST_CSRF);
    settings.api_base_url = server.uri();
    settings.request_timeout_secs = 5;
    (server, ApiClient::new(settings))
}

/// A persisted draft record as the server would return it.
pub fn draft_json(id: &str) -> Value {
    json!({
        "_id": id,
        "firmName": "Acme",
        "billNumber": "D-7",
        "billDate": "2026-08-01",
        "customerName": "Bharat Traders",
        "customerAddress": "12 Market Road\nPune",
        "notes": "",
        "terms": "",
        "products": [
            { "name": "Widget", "quantity": 2, "rate": 50, "amount": 100 }
        ],
        "totalAmount": 100
    })
}

/// A success envelope wrapping extra top-level fields.
pub fn success_envelope(extra: Value) -> Value {
    let mut body = json!({ "status": "success", "message": "ok" });
    if let (Some(target), Some(source)) = (body.as_object_mut(), extra.as_object()) {
        for (key, value) in source {
            target.insert(key.clone(), value.clone());
        }
    }
    body
}
