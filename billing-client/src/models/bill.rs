//! Bill document model.

use crate::models::LineItem;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Bill lifecycle status. Also names the server-side collection a record
/// lives in, so list and conversion operations are keyed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    #[default]
    Draft,
    Kacha,
    Pakka,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Draft => "draft",
            BillStatus::Kacha => "kacha",
            BillStatus::Pakka => "pakka",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "kacha" => BillStatus::Kacha,
            "pakka" => BillStatus::Pakka,
            _ => BillStatus::Draft,
        }
    }
}

/// Editor input fields, used to point the user at the first validation
/// failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillField {
    FirmName,
    GstNumber,
    CustomerName,
    SellerAddress,
    Products,
    ProductName { index: usize },
    ProductQuantity { index: usize },
    ProductRate { index: usize },
}

/// A bill in any lifecycle stage, as exchanged with the server.
///
/// The wire format keeps the server's camelCase field names; records
/// carry a Mongo-style `_id` once persisted. Kacha records omit the
/// seller/GST fields, so those are optional across the union.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BillDraft {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", default)]
    pub id: Option<String>,

    #[serde(default)]
    pub firm_name: String,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bill_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bill_date: Option<NaiveDate>,

    #[serde(default)]
    pub customer_name: String,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub customer_gst: Option<String>,

    #[serde(default)]
    pub customer_address: String,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub seller_address: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub gst_number: Option<String>,

    #[serde(default)]
    pub notes: String,

    #[serde(default)]
    pub terms: String,

    #[serde(default)]
    pub products: Vec<LineItem>,

    #[serde(default)]
    pub total_amount: Decimal,

    #[serde(default, skip_serializing)]
    pub status: BillStatus,
}

impl BillDraft {
    /// Sum of the current line-item amounts. `total_amount` must equal
    /// this at the moment of submission.
    pub fn computed_total(&self) -> Decimal {
        self.products.iter().map(|p| p.amount).sum()
    }
}
