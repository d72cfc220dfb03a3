//! Bill editor: in-memory row state, derived totals, validation and
//! submission.
//!
//! Rows keep quantity and rate as the raw text the user typed, the way a
//! form input would hold them; amounts and the grand total are derived on
//! every edit with tolerant parsing (unparsable or negative input counts
//! as zero and is left for validation to report).

use crate::error::AppError;
use crate::models::{BillDraft, BillField, BillStatus, LineItem};
use crate::services::api::{ApiClient, SaveBillRequest, SaveOutcome};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

/// Editor lifecycle.
///
/// `New` → `EditingDraft` on the first successful draft save (or when an
/// existing draft is loaded); `Finalized` once a kacha/pakka bill has been
/// generated; `ViewOnly` when an existing bill is opened for viewing, in
/// which case every mutating operation is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorPhase {
    #[default]
    New,
    EditingDraft,
    ViewOnly,
    Finalized,
}

/// One editable product row, mirroring a rendered table row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowInput {
    pub name: String,
    pub quantity: String,
    pub rate: String,
    /// Derived: `max(0, quantity) × max(0, rate)`, recomputed on edit.
    pub amount: Decimal,
}

impl RowInput {
    fn blank() -> Self {
        Self {
            name: String::new(),
            quantity: "0".to_string(),
            rate: "0".to_string(),
            amount: Decimal::ZERO,
        }
    }
}

/// Header fields of the bill form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    FirmName,
    BillNumber,
    CustomerName,
    CustomerGst,
    CustomerAddress,
    SellerAddress,
    GstNumber,
    Notes,
    Terms,
}

/// Every way the form can change, as a single reducible event stream.
#[derive(Debug, Clone)]
pub enum EditorEvent {
    RowAdded,
    RowRemoved { index: usize },
    NameEdited { index: usize, value: String },
    QuantityEdited { index: usize, value: String },
    RateEdited { index: usize, value: String },
    HeaderEdited { field: HeaderField, value: String },
    Reset,
}

/// The bill editor. All mutation flows through [`BillEditor::apply`], so
/// the derived amounts and total can never drift from the row inputs.
#[derive(Debug, Clone)]
pub struct BillEditor {
    firm_name: String,
    bill_number: String,
    bill_date: Option<NaiveDate>,
    customer_name: String,
    customer_gst: String,
    customer_address: String,
    seller_address: String,
    gst_number: String,
    notes: String,
    terms: String,
    rows: Vec<RowInput>,
    total: Decimal,
    current_draft_id: Option<String>,
    phase: EditorPhase,
}

impl BillEditor {
    /// A fresh editor: today's date and a single blank row.
    pub fn new() -> Self {
        Self {
            firm_name: String::new(),
            bill_number: String::new(),
            bill_date: Some(Utc::now().date_naive()),
            customer_name: String::new(),
            customer_gst: String::new(),
            customer_address: String::new(),
            seller_address: String::new(),
            gst_number: String::new(),
            notes: String::new(),
            terms: String::new(),
            rows: vec![RowInput::blank()],
            total: Decimal::ZERO,
            current_draft_id: None,
            phase: EditorPhase::New,
        }
    }

    pub fn phase(&self) -> EditorPhase {
        self.phase
    }

    pub fn rows(&self) -> &[RowInput] {
        &self.rows
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn current_draft_id(&self) -> Option<&str> {
        self.current_draft_id.as_deref()
    }

    pub fn bill_date(&self) -> Option<NaiveDate> {
        self.bill_date
    }

    pub fn set_bill_date(&mut self, date: NaiveDate) -> Result<(), AppError> {
        self.guard_mutable()?;
        self.bill_date = Some(date);
        Ok(())
    }

    // ---- reducer ---------------------------------------------------------

    /// Apply one form event. Rejected wholesale in `ViewOnly` and
    /// `Finalized` phases; otherwise only removing the last row can fail.
    pub fn apply(&mut self, event: EditorEvent) -> Result<(), AppError> {
        self.guard_mutable()?;
        match event {
            EditorEvent::RowAdded => {
                self.rows.push(RowInput::blank());
            }
            EditorEvent::RowRemoved { index } => {
                if self.rows.len() <= 1 {
                    return Err(AppError::LastRow);
                }
                if index < self.rows.len() {
                    self.rows.remove(index);
                    self.recompute_total();
                }
            }
            EditorEvent::NameEdited { index, value } => {
                if let Some(row) = self.rows.get_mut(index) {
                    row.name = value;
                }
            }
            EditorEvent::QuantityEdited { index, value } => {
                if let Some(row) = self.rows.get_mut(index) {
                    row.quantity = value;
                }
                self.recompute_row_amount(index);
            }
            EditorEvent::RateEdited { index, value } => {
                if let Some(row) = self.rows.get_mut(index) {
                    row.rate = value;
                }
                self.recompute_row_amount(index);
            }
            EditorEvent::HeaderEdited { field, value } => {
                let slot = match field {
                    HeaderField::FirmName => &mut self.firm_name,
                    HeaderField::BillNumber => &mut self.bill_number,
                    HeaderField::CustomerName => &mut self.customer_name,
                    HeaderField::CustomerGst => &mut self.customer_gst,
                    HeaderField::CustomerAddress => &mut self.customer_address,
                    HeaderField::SellerAddress => &mut self.seller_address,
                    HeaderField::GstNumber => &mut self.gst_number,
                    HeaderField::Notes => &mut self.notes,
                    HeaderField::Terms => &mut self.terms,
                };
                *slot = value;
            }
            EditorEvent::Reset => {
                *self = Self::new();
            }
        }
        Ok(())
    }

    /// Append a blank row. Always succeeds on a mutable editor.
    pub fn add_row(&mut self) -> Result<(), AppError> {
        self.apply(EditorEvent::RowAdded)
    }

    /// Remove a row. The last remaining row is a hard floor.
    pub fn delete_row(&mut self, index: usize) -> Result<(), AppError> {
        self.apply(EditorEvent::RowRemoved { index })
    }

    pub fn set_product_name(&mut self, index: usize, value: impl Into<String>) -> Result<(), AppError> {
        self.apply(EditorEvent::NameEdited {
            index,
            value: value.into(),
        })
    }

    pub fn set_quantity(&mut self, index: usize, value: impl Into<String>) -> Result<(), AppError> {
        self.apply(EditorEvent::QuantityEdited {
            index,
            value: value.into(),
        })
    }

    pub fn set_rate(&mut self, index: usize, value: impl Into<String>) -> Result<(), AppError> {
        self.apply(EditorEvent::RateEdited {
            index,
            value: value.into(),
        })
    }

    pub fn set_header(&mut self, field: HeaderField, value: impl Into<String>) -> Result<(), AppError> {
        self.apply(EditorEvent::HeaderEdited {
            field,
            value: value.into(),
        })
    }

    /// Clear the form back to a fresh editor.
    pub fn reset(&mut self) -> Result<(), AppError> {
        self.apply(EditorEvent::Reset)
    }

    fn guard_mutable(&self) -> Result<(), AppError> {
        match self.phase {
            EditorPhase::ViewOnly | EditorPhase::Finalized => Err(AppError::ReadOnly),
            _ => Ok(()),
        }
    }

    // ---- derived amounts -------------------------------------------------

    /// Recompute one row's amount from its raw inputs, then the total.
    pub fn recompute_row_amount(&mut self, index: usize) {
        if let Some(row) = self.rows.get_mut(index) {
            row.amount = parse_decimal(&row.quantity) * parse_decimal(&row.rate);
        }
        self.recompute_total();
    }

    /// Recompute the grand total from the current row amounts. Idempotent.
    pub fn recompute_total(&mut self) {
        self.total = self.rows.iter().map(|row| row.amount).sum();
    }

    // ---- collection and validation ---------------------------------------

    /// Snapshot the form into a bill payload.
    ///
    /// Rows that are entirely blank are dropped; partially filled rows are
    /// kept so `validate` can point at the exact problem. The total is
    /// recomputed from the retained rows, never read back from a display
    /// value.
    pub fn collect(&self) -> BillDraft {
        let products: Vec<LineItem> = self
            .rows
            .iter()
            .filter_map(|row| {
                let quantity = parse_decimal(&row.quantity);
                let rate = parse_decimal(&row.rate);
                if row.name.trim().is_empty() && quantity.is_zero() && rate.is_zero() {
                    None
                } else {
                    Some(LineItem::new(row.name.clone(), quantity, rate))
                }
            })
            .collect();
        let total_amount = products.iter().map(|p| p.amount).sum();

        BillDraft {
            id: None,
            firm_name: self.firm_name.clone(),
            bill_number: non_empty(&self.bill_number),
            bill_date: self.bill_date,
            customer_name: self.customer_name.clone(),
            customer_gst: non_empty(&self.customer_gst),
            customer_address: self.customer_address.clone(),
            seller_address: non_empty(&self.seller_address),
            gst_number: non_empty(&self.gst_number),
            notes: self.notes.clone(),
            terms: self.terms.clone(),
            products,
            total_amount,
            status: BillStatus::Draft,
        }
    }

    /// Fixed-order, first-failure validation. Returns the offending field
    /// so the caller can focus the matching input.
    ///
    /// Draft mode permits zero quantity and rate; kacha and pakka require
    /// positive values. The pakka form additionally requires the seller's
    /// GST number and address and the customer name.
    pub fn validate(draft: &BillDraft, mode: BillStatus) -> Result<(), AppError> {
        if draft.firm_name.trim().is_empty() {
            return fail(BillField::FirmName, "Please enter firm name.");
        }

        if mode == BillStatus::Pakka {
            if draft.gst_number.as_deref().unwrap_or("").trim().is_empty() {
                return fail(BillField::GstNumber, "Please enter GST number.");
            }
            if draft.customer_name.trim().is_empty() {
                return fail(BillField::CustomerName, "Please enter customer name.");
            }
            if draft.seller_address.as_deref().unwrap_or("").trim().is_empty() {
                return fail(BillField::SellerAddress, "Please enter seller address.");
            }
        }

        if draft.products.is_empty() {
            return fail(BillField::Products, "Please add at least one product.");
        }

        for (index, product) in draft.products.iter().enumerate() {
            if product.name.trim().is_empty() {
                return fail(
                    BillField::ProductName { index },
                    format!("Please enter a name for product {}.", index + 1),
                );
            }
            if mode != BillStatus::Draft {
                if product.quantity <= Decimal::ZERO {
                    return fail(
                        BillField::ProductQuantity { index },
                        format!("Please enter a quantity for product {}.", index + 1),
                    );
                }
                if product.rate <= Decimal::ZERO {
                    return fail(
                        BillField::ProductRate { index },
                        format!("Please enter a rate for product {}.", index + 1),
                    );
                }
            }
        }

        Ok(())
    }

    // ---- persistence -----------------------------------------------------

    /// Validate and submit the current form.
    ///
    /// Draft mode attaches the tracked draft id so a second save updates
    /// instead of duplicating, and adopts the returned id. Generating a
    /// kacha or pakka bill sends no draft linkage — the server creates a
    /// new finalized record and any source draft stays as it is — and
    /// finalizes this editor. On any failure no local state advances.
    pub async fn save(
        &mut self,
        api: &ApiClient,
        mode: BillStatus,
    ) -> Result<SaveOutcome, AppError> {
        self.guard_mutable()?;

        let bill = self.collect();
        Self::validate(&bill, mode)?;

        let draft_id = match mode {
            BillStatus::Draft => self.current_draft_id.clone(),
            _ => None,
        };
        let request = SaveBillRequest {
            bill,
            status: mode,
            draft_id,
        };
        let outcome = api.save_bill(&request).await?;

        match mode {
            BillStatus::Draft => {
                self.current_draft_id = Some(outcome.bill_id.clone());
                self.phase = EditorPhase::EditingDraft;
            }
            BillStatus::Kacha | BillStatus::Pakka => {
                self.phase = EditorPhase::Finalized;
            }
        }
        Ok(outcome)
    }

    /// Load an existing draft for editing.
    pub async fn load_draft(&mut self, api: &ApiClient, draft_id: &str) -> Result<(), AppError> {
        let draft = api.get_draft(draft_id).await?;
        self.hydrate(&draft);
        self.current_draft_id = Some(draft_id.to_string());
        self.phase = EditorPhase::EditingDraft;
        Ok(())
    }

    /// Open an existing kacha/pakka bill read-only; only PDF export
    /// remains available.
    pub async fn load_bill(
        &mut self,
        api: &ApiClient,
        kind: BillStatus,
        bill_id: &str,
    ) -> Result<(), AppError> {
        let bill = api.get_record(kind, bill_id).await?;
        self.hydrate(&bill);
        self.current_draft_id = None;
        self.phase = EditorPhase::ViewOnly;
        Ok(())
    }

    /// Fill the form from a fetched record. A record with no products
    /// still gets one blank row.
    pub fn hydrate(&mut self, bill: &BillDraft) {
        self.firm_name = bill.firm_name.clone();
        self.bill_number = bill.bill_number.clone().unwrap_or_default();
        self.bill_date = bill.bill_date;
        self.customer_name = bill.customer_name.clone();
        self.customer_gst = bill.customer_gst.clone().unwrap_or_default();
        self.customer_address = bill.customer_address.clone();
        self.seller_address = bill.seller_address.clone().unwrap_or_default();
        self.gst_number = bill.gst_number.clone().unwrap_or_default();
        self.notes = bill.notes.clone();
        self.terms = bill.terms.clone();

        self.rows = bill
            .products
            .iter()
            .map(|product| RowInput {
                name: product.name.clone(),
                quantity: product.quantity.to_string(),
                rate: product.rate.to_string(),
                amount: product.quantity.max(Decimal::ZERO) * product.rate.max(Decimal::ZERO),
            })
            .collect();
        if self.rows.is_empty() {
            self.rows.push(RowInput::blank());
        }
        self.recompute_total();
    }
}

impl Default for BillEditor {
    fn default() -> Self {
        Self::new()
    }
}

/// Tolerant numeric parsing: unparsable input and negative values count
/// as zero.
fn parse_decimal(input: &str) -> Decimal {
    input
        .trim()
        .parse::<Decimal>()
        .unwrap_or(Decimal::ZERO)
        .max(Decimal::ZERO)
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn fail(field: BillField, message: impl Into<String>) -> Result<(), AppError> {
    Err(AppError::Validation {
        field,
        message: message.into(),
    })
}
