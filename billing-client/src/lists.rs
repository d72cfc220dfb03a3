//! List controllers for the draft, kacha and pakka collection pages.
//!
//! Each page is a `BillCollection` over one record kind: refresh the
//! collection, delete a card, or dispatch a conversion. Mutations update
//! the loaded set in place; a failed mutation re-fetches the collection
//! so the local view never drifts from the server.

use crate::error::AppError;
use crate::models::{BillDraft, BillStatus};
use crate::services::api::{ApiClient, ConvertOutcome};

/// Render state of a collection page.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ListState {
    #[default]
    Loading,
    Empty,
    Loaded(Vec<BillDraft>),
}

pub struct BillCollection {
    kind: BillStatus,
    state: ListState,
}

impl BillCollection {
    pub fn new(kind: BillStatus) -> Self {
        Self {
            kind,
            state: ListState::Loading,
        }
    }

    pub fn drafts() -> Self {
        Self::new(BillStatus::Draft)
    }

    pub fn kacha_bills() -> Self {
        Self::new(BillStatus::Kacha)
    }

    pub fn pakka_bills() -> Self {
        Self::new(BillStatus::Pakka)
    }

    pub fn kind(&self) -> BillStatus {
        self.kind
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    /// Loaded records, or an empty slice while loading/empty.
    pub fn records(&self) -> &[BillDraft] {
        match &self.state {
            ListState::Loaded(records) => records,
            _ => &[],
        }
    }

    /// Fetch the collection. An empty result (or a failed fetch) lands in
    /// the empty state; the error is still surfaced to the caller.
    pub async fn refresh(&mut self, api: &ApiClient) -> Result<(), AppError> {
        self.state = ListState::Loading;
        match api.get_records(self.kind).await {
            Ok(records) if records.is_empty() => {
                self.state = ListState::Empty;
                Ok(())
            }
            Ok(records) => {
                self.state = ListState::Loaded(records);
                Ok(())
            }
            Err(e) => {
                self.state = ListState::Empty;
                Err(e)
            }
        }
    }

    /// Delete one record and drop its card from the loaded set.
    pub async fn delete(&mut self, api: &ApiClient, id: &str) -> Result<String, AppError> {
        match api.delete_record(self.kind, id).await {
            Ok(message) => {
                self.remove_card(id);
                Ok(message)
            }
            Err(e) => {
                self.reload_after_failure(api).await;
                Err(e)
            }
        }
    }

    /// Convert one record to a later lifecycle stage. The server deletes
    /// the source record as part of the conversion, so a success also
    /// drops the card here. Illegal conversions never reach the network.
    pub async fn convert(
        &mut self,
        api: &ApiClient,
        id: &str,
        target: BillStatus,
    ) -> Result<ConvertOutcome, AppError> {
        match api.convert(self.kind, id, target).await {
            Ok(outcome) => {
                self.remove_card(id);
                Ok(outcome)
            }
            Err(e @ AppError::IllegalConversion { .. }) => Err(e),
            Err(e) => {
                self.reload_after_failure(api).await;
                Err(e)
            }
        }
    }

    fn remove_card(&mut self, id: &str) {
        if let ListState::Loaded(records) = &mut self.state {
            records.retain(|record| record.id.as_deref() != Some(id));
            if records.is_empty() {
                self.state = ListState::Empty;
            }
        }
    }

    async fn reload_after_failure(&mut self, api: &ApiClient) {
        if let Err(e) = self.refresh(api).await {
            tracing::warn!(kind = self.kind.as_str(), error = %e, "reload after failed mutation also failed");
        }
    }
}
