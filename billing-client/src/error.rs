use crate::models::BillField;
use thiserror::Error;

/// Errors surfaced by the interaction layer.
///
/// Nothing here is fatal to the host application: every variant aborts a
/// single requested operation and leaves local state (editor rows, loaded
/// lists) intact for retry.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { field: BillField, message: String },

    #[error("Unable to reach the server. Please check your connection.")]
    Network(#[from] reqwest::Error),

    #[error("{message}")]
    Server { message: String },

    #[error("Server returned an unexpected response (status {status})")]
    UnexpectedResponse { status: u16 },

    #[error("Bill must have at least one product.")]
    LastRow,

    #[error("This bill is read-only.")]
    ReadOnly,

    #[error("CSRF token not found. Please refresh the page.")]
    MissingCsrfToken,

    #[error("Cannot convert {from} to {to}")]
    IllegalConversion {
        from: &'static str,
        to: &'static str,
    },

    #[error("PDF generator is not available: {0}")]
    PdfUnavailable(String),

    #[error("Failed to render PDF: {0}")]
    PdfRender(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Server-reported failure with the message passed through verbatim.
    pub fn server(message: impl Into<String>) -> Self {
        AppError::Server {
            message: message.into(),
        }
    }
}
