//! Service clients for billing-client.

pub mod api;

pub use api::{ApiClient, ConvertOutcome, SaveBillRequest, SaveOutcome};
