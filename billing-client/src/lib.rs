//! billing-client: the client-side interaction layer of a small invoicing
//! application.
//!
//! Covers the draft/kacha/pakka bill lifecycle (editing, totals,
//! validation, submission), the collection pages, notifications, company
//! onboarding data, and PDF export. The server is an external
//! collaborator reached over JSON HTTP; see [`services::api::ApiClient`].

pub mod config;
pub mod editor;
pub mod error;
pub mod lists;
pub mod models;
pub mod observability;
pub mod pdf;
pub mod services;

pub use config::Settings;
pub use editor::{BillEditor, EditorEvent, EditorPhase, HeaderField, RowInput};
pub use error::AppError;
pub use lists::{BillCollection, ListState};
pub use pdf::{download_bill_pdf, PdfKind, PdfRenderer, RenderedPdf};
pub use services::api::{ApiClient, ConvertOutcome, SaveBillRequest, SaveOutcome};
