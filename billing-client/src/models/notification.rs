//! Notification models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One user-facing notification, as served by the notifications API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub notification_type: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    #[serde(default)]
    pub action_url: Option<String>,
    #[serde(default)]
    pub bill_type: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    /// Serialized decimal on the wire; absent for non-bill notifications.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// Server-side human formatting ("2 hours ago"); kept verbatim.
    #[serde(default)]
    pub formatted_time: Option<String>,
}

/// Badge payload: the most recent notifications plus unread/total counts.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationSummary {
    pub notifications: Vec<Notification>,
    pub unread_count: i64,
    pub total_count: i64,
}

/// Result of the new-since-last-check probe.
#[derive(Debug, Clone, Deserialize)]
pub struct NewNotificationCheck {
    pub new_count: i64,
    pub unread_count: i64,
    pub has_new: bool,
}

/// Result of the overdue kacha bill probe (bills older than seven days).
#[derive(Debug, Clone, Deserialize)]
pub struct OverdueBillCheck {
    pub overdue_count: i64,
    #[serde(default)]
    pub oldest_bill_date: Option<chrono::NaiveDate>,
}
