//! PDF renderer tests: section omission rules, filenames, formatting,
//! and byte output.

use billing_client::models::{BillDraft, CompanyProfile, LineItem};
use billing_client::pdf::{fmt_money, DocumentModel, PdfKind};
use billing_client::PdfRenderer;
use chrono::NaiveDate;
use rust_decimal::Decimal;

fn sample_bill() -> BillDraft {
    BillDraft {
        firm_name: "Acme".to_string(),
        bill_number: Some("KB-0042".to_string()),
        bill_date: NaiveDate::from_ymd_opt(2026, 8, 1),
        customer_name: "Bharat Traders".to_string(),
        customer_address: "12 Market Road\nPune".to_string(),
        products: vec![
            LineItem::new("Widget", Decimal::from(2), Decimal::from(50)),
            LineItem::new("Gadget", Decimal::from(1), Decimal::from(25)),
        ],
        total_amount: Decimal::from(125),
        ..Default::default()
    }
}

fn sample_company() -> CompanyProfile {
    CompanyProfile {
        company_name: "Acme Industries".to_string(),
        gst_number: Some("27AAAAA0000A1Z5".to_string()),
        address: Some("Plot 4, MIDC".to_string()),
        city: Some("Pune".to_string()),
        state: Some("Maharashtra".to_string()),
        pincode: Some("411001".to_string()),
        phone: Some("+91 98765 43210".to_string()),
        email: Some("accounts@acme.example".to_string()),
        bank_name: Some("State Bank".to_string()),
        account_number: Some("123456789012".to_string()),
        ifsc_code: Some("SBIN0000300".to_string()),
        ..Default::default()
    }
}

#[test]
fn renderer_initializes_once() {
    PdfRenderer::new().expect("generator available");
}

#[test]
fn rendered_bytes_are_a_pdf_document() {
    let renderer = PdfRenderer::new().expect("renderer");
    let pdf = renderer
        .render(PdfKind::Kacha, &sample_bill(), None)
        .expect("render");

    assert!(pdf.bytes.starts_with(b"%PDF"));
    assert_eq!(pdf.filename, "Kacha_Bill_KB-0042.pdf");
}

#[test]
fn filename_falls_back_to_draft_and_is_sanitized() {
    let mut bill = sample_bill();
    bill.bill_number = None;
    let model = DocumentModel::build(PdfKind::Kacha, &bill, None);
    assert_eq!(model.filename, "Kacha_Bill_Draft.pdf");

    bill.bill_number = Some("INV/2026#1".to_string());
    let model = DocumentModel::build(PdfKind::Pakka, &bill, None);
    assert_eq!(model.filename, "Pakka_Bill_INV_2026_1.pdf");
}

#[test]
fn empty_notes_and_terms_are_omitted_entirely() {
    let bill = sample_bill();
    let model = DocumentModel::build(PdfKind::Kacha, &bill, None);
    assert!(model.notes.is_none());
    assert!(model.terms.is_none());

    let mut with_notes = sample_bill();
    with_notes.notes = "Deliver before Friday.".to_string();
    with_notes.terms = "Payment due in 15 days.".to_string();
    let model = DocumentModel::build(PdfKind::Kacha, &with_notes, None);
    assert_eq!(model.notes.as_ref().expect("notes").heading, "Notes:");
    assert_eq!(
        model.terms.as_ref().expect("terms").body,
        "Payment due in 15 days."
    );
}

#[test]
fn missing_customer_renders_not_provided() {
    let mut bill = sample_bill();
    bill.customer_name = "  ".to_string();
    bill.customer_address = String::new();
    let model = DocumentModel::build(PdfKind::Kacha, &bill, None);
    assert_eq!(model.buyer.lines, vec!["Not Provided".to_string()]);
}

#[test]
fn pakka_is_enriched_from_the_company_profile() {
    let bill = sample_bill();
    let company = sample_company();
    let model = DocumentModel::build(PdfKind::Pakka, &bill, Some(&company));

    assert_eq!(model.title, "TAX INVOICE");
    assert!(model
        .seller
        .lines
        .iter()
        .any(|line| line == "GSTIN: 27AAAAA0000A1Z5"));
    assert!(model.seller.lines.iter().any(|line| line.starts_with("Phone:")));

    let bank = model.bank_details.expect("bank details");
    assert_eq!(bank[0], ("Bank".to_string(), "State Bank".to_string()));
    assert!(model.signatures.is_some());
}

#[test]
fn bank_details_are_omitted_without_a_profile() {
    let model = DocumentModel::build(PdfKind::Pakka, &sample_bill(), None);
    assert!(model.bank_details.is_none());

    // Kacha documents never carry bank details, profile or not.
    let company = sample_company();
    let model = DocumentModel::build(PdfKind::Kacha, &sample_bill(), Some(&company));
    assert!(model.bank_details.is_none());
}

#[test]
fn money_and_quantity_formatting() {
    assert_eq!(fmt_money("1234.5".parse::<Decimal>().unwrap()), "Rs 1,234.50");
    assert_eq!(fmt_money(Decimal::from(100)), "Rs 100.00");
    assert_eq!(fmt_money(Decimal::from(1_000_000)), "Rs 1,000,000.00");

    let model = DocumentModel::build(PdfKind::Kacha, &sample_bill(), None);
    assert_eq!(model.table[0].serial, "1");
    assert_eq!(model.table[0].quantity, "2");
    assert_eq!(model.table[0].rate, "Rs 50.00");
    assert_eq!(model.table[0].amount, "Rs 100.00");
    assert_eq!(model.total, "Total Amount: Rs 125.00");
}

#[test]
fn long_bills_flow_onto_additional_pages() {
    let mut bill = sample_bill();
    bill.products = (0..120)
        .map(|i| {
            LineItem::new(
                format!("Line item number {} with a reasonably long description", i + 1),
                Decimal::from(1),
                Decimal::from(10),
            )
        })
        .collect();
    bill.total_amount = bill.computed_total();

    let renderer = PdfRenderer::new().expect("renderer");
    let pdf = renderer
        .render(PdfKind::Pakka, &bill, Some(&sample_company()))
        .expect("render");
    assert!(pdf.bytes.starts_with(b"%PDF"));

    // More page objects than the two-line bill produces.
    let short = renderer
        .render(PdfKind::Kacha, &sample_bill(), None)
        .expect("render short");
    let long_pages = String::from_utf8_lossy(&pdf.bytes).matches("/Page").count();
    let short_pages = String::from_utf8_lossy(&short.bytes).matches("/Page").count();
    assert!(long_pages > short_pages);
}

#[test]
fn save_to_writes_under_the_download_filename() {
    let renderer = PdfRenderer::new().expect("renderer");
    let pdf = renderer
        .render(PdfKind::Kacha, &sample_bill(), None)
        .expect("render");

    let dir = std::env::temp_dir().join("billing-client-pdf-test");
    std::fs::create_dir_all(&dir).expect("temp dir");
    let path = pdf.save_to(&dir).expect("save");
    assert!(path.ends_with("Kacha_Bill_KB-0042.pdf"));
    let written = std::fs::read(&path).expect("read back");
    assert_eq!(written, pdf.bytes);
    let _ = std::fs::remove_file(&path);
}
