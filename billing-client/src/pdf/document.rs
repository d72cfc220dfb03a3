//! Printable document model.
//!
//! A bill is first projected into this plain section model and the model
//! is then drawn onto pages. Keeping the projection pure means omission
//! rules (no empty "Notes:" header, bank details only when present) are
//! testable without touching a PDF library.

use crate::models::{BillDraft, CompanyProfile};
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Which printable document to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfKind {
    Kacha,
    Pakka,
}

impl PdfKind {
    pub fn file_prefix(&self) -> &'static str {
        match self {
            PdfKind::Kacha => "Kacha",
            PdfKind::Pakka => "Pakka",
        }
    }
}

/// A labelled party block ("From:" / "Sold By:" / "Billed To:").
#[derive(Debug, Clone, PartialEq)]
pub struct PartyBlock {
    pub heading: String,
    pub lines: Vec<String>,
}

/// One display-formatted line of the product table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableLine {
    pub serial: String,
    pub name: String,
    pub quantity: String,
    pub rate: String,
    pub amount: String,
}

/// A headed free-text section (notes, terms).
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub heading: String,
    pub body: String,
}

/// Everything the renderer draws, in drawing order.
#[derive(Debug, Clone)]
pub struct DocumentModel {
    pub filename: String,
    pub title: String,
    pub subtitle: String,
    pub seller: PartyBlock,
    /// Right-hand header column: bill number, date, GSTIN.
    pub meta: Vec<(String, String)>,
    pub buyer: PartyBlock,
    pub table: Vec<TableLine>,
    pub total: String,
    pub notes: Option<TextBlock>,
    pub terms: Option<TextBlock>,
    pub bank_details: Option<Vec<(String, String)>>,
    /// Left and right signature boxes; pakka only.
    pub signatures: Option<(String, String)>,
    pub footer: Vec<String>,
}

impl DocumentModel {
    /// Project a bill (optionally enriched with the company profile) into
    /// the printable model. Empty optional fields are omitted entirely;
    /// an absent buyer name becomes an explicit "Not Provided".
    pub fn build(kind: PdfKind, bill: &BillDraft, company: Option<&CompanyProfile>) -> Self {
        let bill_number = bill
            .bill_number
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let filename = format!(
            "{}_Bill_{}.pdf",
            kind.file_prefix(),
            sanitize_filename(bill_number.unwrap_or("Draft"))
        );

        let firm_name = trimmed(&bill.firm_name)
            .or_else(|| company.and_then(|c| trimmed(&c.company_name)))
            .unwrap_or_else(|| "Your Firm Name".to_string());
        let buyer_name = trimmed(&bill.customer_name).unwrap_or_else(|| "Not Provided".to_string());

        let table = bill
            .products
            .iter()
            .enumerate()
            .map(|(index, product)| TableLine {
                serial: (index + 1).to_string(),
                name: product.name.clone(),
                quantity: format_decimal(&product.quantity),
                rate: fmt_money(product.rate),
                amount: fmt_money(product.amount),
            })
            .collect();

        let mut buyer_lines = vec![buyer_name];
        if let Some(address) = trimmed(&bill.customer_address) {
            buyer_lines.extend(address.lines().map(str::to_string));
        }

        match kind {
            PdfKind::Kacha => Self {
                filename,
                title: "KACHA BILL".to_string(),
                subtitle: "Provisional Bill for Deal Negotiation".to_string(),
                seller: PartyBlock {
                    heading: "From:".to_string(),
                    lines: vec![firm_name, "Kacha Bill".to_string()],
                },
                meta: vec![
                    (
                        "Bill No".to_string(),
                        bill_number.unwrap_or("Pending").to_string(),
                    ),
                    ("Date".to_string(), format_date(bill.bill_date)),
                ],
                buyer: PartyBlock {
                    heading: "Bill To:".to_string(),
                    lines: buyer_lines,
                },
                table,
                total: format!("Total Amount: {}", fmt_money(bill.total_amount)),
                notes: text_block("Notes:", &bill.notes),
                terms: text_block("Terms & Conditions:", &bill.terms),
                bank_details: None,
                signatures: None,
                footer: vec![
                    "This is a provisional Kacha Bill for negotiation purposes only.".to_string(),
                    "Final Pakka Bill will be generated after deal confirmation.".to_string(),
                ],
            },
            PdfKind::Pakka => {
                let seller_address = bill
                    .seller_address
                    .as_deref()
                    .and_then(|s| trimmed(s))
                    .or_else(|| company.and_then(|c| c.full_address()));
                let gstin = bill
                    .gst_number
                    .as_deref()
                    .and_then(|s| trimmed(s))
                    .or_else(|| company.and_then(|c| c.gst_number.as_deref().and_then(trimmed)));

                let mut seller_lines = vec![firm_name.clone()];
                if let Some(address) = &seller_address {
                    seller_lines.extend(address.lines().map(str::to_string));
                }
                if let Some(gstin) = &gstin {
                    seller_lines.push(format!("GSTIN: {}", gstin));
                }
                if let Some(phone) = company.and_then(|c| c.phone.as_deref().and_then(trimmed)) {
                    seller_lines.push(format!("Phone: {}", phone));
                }
                if let Some(email) = company.and_then(|c| c.email.as_deref().and_then(trimmed)) {
                    seller_lines.push(format!("Email: {}", email));
                }

                let mut meta = vec![
                    (
                        "Invoice No".to_string(),
                        bill_number.unwrap_or("Pending").to_string(),
                    ),
                    ("Date".to_string(), format_date(bill.bill_date)),
                ];
                if let Some(gstin) = &gstin {
                    meta.push(("GSTIN".to_string(), gstin.clone()));
                }

                let bank_details = company.filter(|c| c.has_bank_details()).map(|c| {
                    let mut rows = Vec::new();
                    if let Some(bank) = c.bank_name.as_deref().and_then(trimmed) {
                        rows.push(("Bank".to_string(), bank));
                    }
                    if let Some(account) = c.account_number.as_deref().and_then(trimmed) {
                        rows.push(("Account No".to_string(), account));
                    }
                    if let Some(ifsc) = c.ifsc_code.as_deref().and_then(trimmed) {
                        rows.push(("IFSC Code".to_string(), ifsc));
                    }
                    rows
                });

                let buyer_name = buyer_lines[0].clone();
                Self {
                    filename,
                    title: "TAX INVOICE".to_string(),
                    subtitle: "Original for Recipient".to_string(),
                    seller: PartyBlock {
                        heading: "Sold By:".to_string(),
                        lines: seller_lines,
                    },
                    meta,
                    buyer: PartyBlock {
                        heading: "Billed To:".to_string(),
                        lines: buyer_lines,
                    },
                    table,
                    total: format!("Total Amount: {}", fmt_money(bill.total_amount)),
                    notes: None,
                    terms: text_block("Terms & Conditions:", &bill.terms),
                    bank_details,
                    signatures: Some((
                        format!("Authorized Signatory\n{}", firm_name),
                        format!("Customer Signature\n{}", buyer_name),
                    )),
                    footer: vec![
                        "This is a computer-generated invoice and does not require a physical signature."
                            .to_string(),
                    ],
                }
            }
        }
    }
}

fn text_block(heading: &str, body: &str) -> Option<TextBlock> {
    trimmed(body).map(|body| TextBlock {
        heading: heading.to_string(),
        body,
    })
}

fn trimmed(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Keep filenames filesystem-safe; anything exotic becomes an underscore.
pub fn sanitize_filename(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        let ok = ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == '.' || ch == ' ';
        out.push(if ok { ch } else { '_' });
    }
    let trimmed = out.trim().to_string();
    if trimmed.is_empty() {
        "Draft".to_string()
    } else {
        trimmed
    }
}

/// `Rs 1,234.50`: two decimals, grouped thousands. Builtin PDF fonts
/// cannot encode the rupee glyph, hence the `Rs` prefix.
pub fn fmt_money(value: Decimal) -> String {
    let s = format!("{:.2}", value);
    let (int_part, dec_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let mut grouped = String::new();
    let chars: Vec<char> = int_part.chars().collect();
    let mut count = 0;
    for i in (0..chars.len()).rev() {
        if count == 3 && chars[i] != '-' {
            grouped.push(',');
            count = 0;
        }
        grouped.push(chars[i]);
        count += 1;
    }
    let int_with_sep: String = grouped.chars().rev().collect();
    format!("Rs {}.{}", int_with_sep, dec_part)
}

/// Quantity display: a normalized decimal without trailing zeros.
pub fn format_decimal(value: &Decimal) -> String {
    let s = value.to_string();
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.format("%-d %B %Y").to_string(),
        None => "Not specified".to_string(),
    }
}
