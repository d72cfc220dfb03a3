//! Company profile model.

use serde::{Deserialize, Serialize};

/// Onboarded company details. Read-mostly: fetched to auto-fill forms and
/// to enrich the "Sold By" block of pakka PDFs; the bill editor never
/// mutates it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", default)]
    pub id: Option<String>,

    #[serde(default)]
    pub company_name: String,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub gst_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub address: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub city: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub state: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub pincode: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub website: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bank_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub account_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub ifsc_code: Option<String>,
}

impl CompanyProfile {
    pub fn has_bank_details(&self) -> bool {
        non_empty(&self.bank_name) || non_empty(&self.account_number)
    }

    /// Single-line "address, city, state pincode" form for PDF headers.
    pub fn full_address(&self) -> Option<String> {
        let mut parts: Vec<String> = Vec::new();
        if let Some(address) = self.address.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            parts.push(address.to_string());
        }
        let city_state: Vec<&str> = [self.city.as_deref(), self.state.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if !city_state.is_empty() {
            parts.push(city_state.join(", "));
        }
        if let Some(pincode) = self.pincode.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            parts.push(pincode.to_string());
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

fn non_empty(value: &Option<String>) -> bool {
    value.as_deref().map(str::trim).is_some_and(|s| !s.is_empty())
}
