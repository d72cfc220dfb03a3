//! HTTP client for the external Server API.
//!
//! Every response is decoded through one envelope path: the content type
//! is sniffed first (an HTML error page must never be parsed as data),
//! then the `{status, message, ...}` envelope is checked before any typed
//! payload is extracted. Server-provided messages pass through verbatim.

use crate::config::Settings;
use crate::error::AppError;
use crate::models::{
    BillDraft, BillStatus, CompanyProfile, DashboardData, NewNotificationCheck,
    NotificationSummary, OverdueBillCheck,
};
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tokio::sync::OnceCell;

/// Payload for `POST /api/save/`.
///
/// `draft_id` links a save to an existing draft so the server updates in
/// place; it is only ever attached in draft mode. Generating a kacha or
/// pakka bill always creates a new record and leaves any source draft
/// untouched — conversion is the server's own choreography.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveBillRequest {
    #[serde(flatten)]
    pub bill: BillDraft,
    pub status: BillStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft_id: Option<String>,
}

/// Successful `POST /api/save/` response.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveOutcome {
    #[serde(default)]
    pub message: String,
    pub bill_id: String,
    #[serde(default)]
    pub bill_number: Option<String>,
    /// True when an existing draft was updated rather than a new record
    /// created.
    #[serde(default)]
    pub updated: bool,
}

/// Successful conversion response.
#[derive(Debug, Clone)]
pub struct ConvertOutcome {
    pub message: String,
    pub bill_id: String,
}

/// Client for the Server API collaborator.
///
/// The company profile is cached per instance: fetched at most once per
/// client lifetime and reused across PDF generations without
/// revalidation. A failed fetch is not cached, so the next caller
/// retries.
pub struct ApiClient {
    client: Client,
    settings: Settings,
    company_profile: OnceCell<CompanyProfile>,
}

impl ApiClient {
    pub fn new(settings: Settings) -> Self {
        Self {
            client: Client::new(),
            settings,
            company_profile: OnceCell::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.settings.api_base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.api_base_url.trim_end_matches('/'), path)
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.settings.request_timeout_secs)
    }

    fn csrf_token(&self) -> Result<&str, AppError> {
        self.settings
            .csrf_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AppError::MissingCsrfToken)
    }

    // ---- transport -------------------------------------------------------

    async fn get(&self, path: &str) -> Result<Value, AppError> {
        let url = self.url(path);
        let response = self
            .client
            .get(&url)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(url = %url, error = %e, "GET request failed");
                AppError::Network(e)
            })?;
        decode_envelope(response).await
    }

    async fn post(&self, path: &str, body: Option<&Value>) -> Result<Value, AppError> {
        let token = self.csrf_token()?.to_string();
        let url = self.url(path);
        let mut request = self
            .client
            .post(&url)
            .timeout(self.timeout())
            .header("X-CSRFToken", token);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "POST request failed");
            AppError::Network(e)
        })?;
        decode_envelope(response).await
    }

    async fn delete(&self, path: &str) -> Result<Value, AppError> {
        let token = self.csrf_token()?.to_string();
        let url = self.url(path);
        let response = self
            .client
            .delete(&url)
            .timeout(self.timeout())
            .header("X-CSRFToken", token)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(url = %url, error = %e, "DELETE request failed");
                AppError::Network(e)
            })?;
        decode_envelope(response).await
    }

    // ---- bills and drafts ------------------------------------------------

    pub async fn get_draft(&self, draft_id: &str) -> Result<BillDraft, AppError> {
        let body = self.get(&format!("/api/get-draft/{}/", draft_id)).await?;
        let mut draft: BillDraft = payload(body, "draft")?;
        draft.status = BillStatus::Draft;
        Ok(draft)
    }

    pub async fn get_kacha_bill(&self, bill_id: &str) -> Result<BillDraft, AppError> {
        let body = self.get(&format!("/api/get-kacha-bill/{}/", bill_id)).await?;
        let mut bill: BillDraft = payload(body, "bill")?;
        bill.status = BillStatus::Kacha;
        Ok(bill)
    }

    pub async fn get_pakka_bill(&self, bill_id: &str) -> Result<BillDraft, AppError> {
        let body = self.get(&format!("/api/get-pakka-bill/{}/", bill_id)).await?;
        let mut bill: BillDraft = payload(body, "bill")?;
        bill.status = BillStatus::Pakka;
        Ok(bill)
    }

    /// Fetch one record of the given kind.
    pub async fn get_record(&self, kind: BillStatus, id: &str) -> Result<BillDraft, AppError> {
        match kind {
            BillStatus::Draft => self.get_draft(id).await,
            BillStatus::Kacha => self.get_kacha_bill(id).await,
            BillStatus::Pakka => self.get_pakka_bill(id).await,
        }
    }

    pub async fn get_drafts(&self) -> Result<Vec<BillDraft>, AppError> {
        let body = self.get("/api/get-drafts/").await?;
        payload(body, "drafts")
    }

    pub async fn get_kacha_bills(&self) -> Result<Vec<BillDraft>, AppError> {
        let body = self.get("/api/get-kacha-bills/").await?;
        payload(body, "kacha_bills")
    }

    pub async fn get_pakka_bills(&self) -> Result<Vec<BillDraft>, AppError> {
        let body = self.get("/api/get-pakka-bills/").await?;
        payload(body, "pakka_bills")
    }

    /// Fetch the whole collection of the given kind, newest first.
    pub async fn get_records(&self, kind: BillStatus) -> Result<Vec<BillDraft>, AppError> {
        match kind {
            BillStatus::Draft => self.get_drafts().await,
            BillStatus::Kacha => self.get_kacha_bills().await,
            BillStatus::Pakka => self.get_pakka_bills().await,
        }
    }

    /// Create or update a bill/draft.
    pub async fn save_bill(&self, request: &SaveBillRequest) -> Result<SaveOutcome, AppError> {
        let body = serde_json::to_value(request)
            .map_err(|e| AppError::server(format!("Failed to encode bill payload: {}", e)))?;
        let response = self.post("/api/save/", Some(&body)).await?;
        let outcome: SaveOutcome = envelope(response)?;
        tracing::info!(
            bill_id = %outcome.bill_id,
            status = request.status.as_str(),
            updated = outcome.updated,
            "bill saved"
        );
        Ok(outcome)
    }

    pub async fn delete_record(&self, kind: BillStatus, id: &str) -> Result<String, AppError> {
        let path = match kind {
            BillStatus::Draft => format!("/api/delete-draft/{}/", id),
            BillStatus::Kacha => format!("/api/delete-kacha-bill/{}/", id),
            BillStatus::Pakka => format!("/api/delete-pakka-bill/{}/", id),
        };
        let body = self.delete(&path).await?;
        Ok(message_of(&body))
    }

    /// Convert a record to a later lifecycle stage. The server deletes the
    /// source record as part of the conversion; only draft→kacha,
    /// draft→pakka and kacha→pakka exist.
    pub async fn convert(
        &self,
        from: BillStatus,
        id: &str,
        to: BillStatus,
    ) -> Result<ConvertOutcome, AppError> {
        let (path, key) = match (from, to) {
            (BillStatus::Draft, BillStatus::Kacha) => {
                (format!("/api/convert/draft-to-kacha/{}/", id), "kacha_bill_id")
            }
            (BillStatus::Draft, BillStatus::Pakka) => {
                (format!("/api/convert/draft-to-pakka/{}/", id), "pakka_bill_id")
            }
            (BillStatus::Kacha, BillStatus::Pakka) => {
                (format!("/api/convert/kacha-to-pakka/{}/", id), "pakka_bill_id")
            }
            _ => {
                return Err(AppError::IllegalConversion {
                    from: from.as_str(),
                    to: to.as_str(),
                })
            }
        };
        let body = self.post(&path, None).await?;
        let bill_id = body
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Ok(ConvertOutcome {
            message: message_of(&body),
            bill_id,
        })
    }

    // ---- company profile -------------------------------------------------

    pub async fn check_company_setup(&self) -> Result<bool, AppError> {
        let body = self.get("/api/check-company-setup/").await?;
        Ok(body
            .get("company_setup")
            .and_then(Value::as_bool)
            .unwrap_or(false))
    }

    pub async fn get_company_details(&self) -> Result<CompanyProfile, AppError> {
        let body = self.get("/api/get-company-details/").await?;
        payload(body, "company")
    }

    pub async fn save_company_details(&self, profile: &CompanyProfile) -> Result<String, AppError> {
        let body = serde_json::to_value(profile)
            .map_err(|e| AppError::server(format!("Failed to encode company details: {}", e)))?;
        let response = self.post("/api/save-company-details/", Some(&body)).await?;
        Ok(message_of(&response))
    }

    pub async fn update_company_details(
        &self,
        profile: &CompanyProfile,
    ) -> Result<String, AppError> {
        let body = serde_json::to_value(profile)
            .map_err(|e| AppError::server(format!("Failed to encode company details: {}", e)))?;
        let response = self
            .post("/api/update-company-details/", Some(&body))
            .await?;
        Ok(message_of(&response))
    }

    /// Cached company profile for PDF enrichment; fetched at most once per
    /// client lifetime.
    pub async fn company_profile(&self) -> Result<&CompanyProfile, AppError> {
        self.company_profile
            .get_or_try_init(|| self.get_company_details())
            .await
    }

    // ---- dashboard -------------------------------------------------------

    pub async fn get_dashboard_data(&self) -> Result<DashboardData, AppError> {
        let body = self.get("/api/dashboard-data/").await?;
        payload(body, "data")
    }

    // ---- notifications ---------------------------------------------------

    /// Badge payload: unread count plus the most recent notifications.
    pub async fn notification_badge(&self) -> Result<NotificationSummary, AppError> {
        let body = self.get("/api/notifications/").await?;
        envelope(body)
    }

    /// The full notification listing for the notifications page.
    pub async fn all_notifications(&self) -> Result<NotificationSummary, AppError> {
        let body = self.get("/api/notifications/all/").await?;
        envelope(body)
    }

    pub async fn mark_notification_read(&self, id: i64) -> Result<String, AppError> {
        let body = self
            .post(&format!("/api/notifications/{}/read/", id), None)
            .await?;
        Ok(message_of(&body))
    }

    pub async fn mark_notification_unread(&self, id: i64) -> Result<String, AppError> {
        let body = self
            .post(&format!("/api/notifications/{}/unread/", id), None)
            .await?;
        Ok(message_of(&body))
    }

    /// Returns the number of notifications that were marked read.
    pub async fn mark_all_notifications_read(&self) -> Result<i64, AppError> {
        let body = self.post("/api/notifications/read-all/", None).await?;
        Ok(body.get("count").and_then(Value::as_i64).unwrap_or(0))
    }

    pub async fn delete_notification(&self, id: i64) -> Result<String, AppError> {
        let body = self
            .delete(&format!("/api/notifications/{}/delete/", id))
            .await?;
        Ok(message_of(&body))
    }

    /// Returns the number of notifications that were cleared.
    pub async fn clear_all_notifications(&self) -> Result<i64, AppError> {
        let body = self.delete("/api/notifications/clear-all/").await?;
        Ok(body.get("count").and_then(Value::as_i64).unwrap_or(0))
    }

    pub async fn check_new_notifications(
        &self,
        last_check: Option<DateTime<Utc>>,
    ) -> Result<NewNotificationCheck, AppError> {
        let path = match last_check {
            Some(ts) => format!(
                "/api/notifications/check-new/?last_check={}",
                ts.to_rfc3339_opts(SecondsFormat::Secs, true)
            ),
            None => "/api/notifications/check-new/".to_string(),
        };
        let body = self.get(&path).await?;
        envelope(body)
    }

    /// Kacha bills older than seven days, surfaced as a reminder badge.
    pub async fn check_overdue_bills(&self) -> Result<OverdueBillCheck, AppError> {
        let body = self.get("/api/check-overdue-bills/").await?;
        envelope(body)
    }
}

/// Sniff the content type, then check HTTP status and the JSON envelope.
async fn decode_envelope(response: reqwest::Response) -> Result<Value, AppError> {
    let status = response.status();
    let is_json = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));

    if !is_json {
        // HTML error page or empty body where JSON was expected.
        let body = response.text().await.unwrap_or_default();
        tracing::error!(
            status = status.as_u16(),
            body = %body.chars().take(500).collect::<String>(),
            "non-JSON response from server"
        );
        return Err(AppError::UnexpectedResponse {
            status: status.as_u16(),
        });
    }

    let body: Value = match response.json().await {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(status = status.as_u16(), error = %e, "malformed JSON response");
            return Err(AppError::UnexpectedResponse {
                status: status.as_u16(),
            });
        }
    };

    let envelope_ok = body
        .get("status")
        .and_then(Value::as_str)
        .is_some_and(|s| s == "success");
    if !status.is_success() || !envelope_ok {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Server error: {}", status.as_u16()));
        return Err(AppError::Server { message });
    }

    Ok(body)
}

/// Extract a typed payload stored under one envelope key.
fn payload<T: DeserializeOwned>(mut body: Value, key: &str) -> Result<T, AppError> {
    let value = body
        .get_mut(key)
        .map(Value::take)
        .ok_or_else(|| AppError::server(format!("Missing '{}' in server response", key)))?;
    serde_json::from_value(value)
        .map_err(|e| AppError::server(format!("Malformed server response: {}", e)))
}

/// Decode a type whose fields sit directly in the envelope.
fn envelope<T: DeserializeOwned>(body: Value) -> Result<T, AppError> {
    serde_json::from_value(body)
        .map_err(|e| AppError::server(format!("Malformed server response: {}", e)))
}

fn message_of(body: &Value) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
