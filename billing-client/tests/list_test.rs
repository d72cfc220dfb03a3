//! List controller tests: refresh states, deletion, and conversions.

mod common;

use billing_client::models::BillStatus;
use billing_client::{AppError, BillCollection, ListState};
use common::{draft_json, spawn_api, success_envelope, TEST_CSRF};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn refresh_loads_the_collection() {
    let (server, api) = spawn_api().await;
    Mock::given(method("GET"))
        .and(path("/api/get-drafts/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_envelope(json!({
            "drafts": [draft_json("d1"), draft_json("d2")]
        }))))
        .mount(&server)
        .await;

    let mut list = BillCollection::drafts();
    assert_eq!(*list.state(), ListState::Loading);

    list.refresh(&api).await.expect("refresh");
    assert_eq!(list.records().len(), 2);
    assert_eq!(list.records()[0].id.as_deref(), Some("d1"));
}

#[tokio::test]
async fn empty_collection_lands_in_empty_state() {
    let (server, api) = spawn_api().await;
    Mock::given(method("GET"))
        .and(path("/api/get-kacha-bills/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_envelope(json!({
            "kacha_bills": []
        }))))
        .mount(&server)
        .await;

    let mut list = BillCollection::kacha_bills();
    list.refresh(&api).await.expect("refresh");
    assert_eq!(*list.state(), ListState::Empty);
}

#[tokio::test]
async fn deleting_the_last_card_empties_the_list() {
    let (server, api) = spawn_api().await;
    Mock::given(method("GET"))
        .and(path("/api/get-drafts/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_envelope(json!({
            "drafts": [draft_json("d1")]
        }))))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/delete-draft/d1/"))
        .and(header("X-CSRFToken", TEST_CSRF))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": "Draft deleted successfully!"
        })))
        .mount(&server)
        .await;

    let mut list = BillCollection::drafts();
    list.refresh(&api).await.expect("refresh");

    let message = list.delete(&api, "d1").await.expect("delete");
    assert_eq!(message, "Draft deleted successfully!");
    assert_eq!(*list.state(), ListState::Empty);
}

#[tokio::test]
async fn failed_delete_reloads_the_collection() {
    let (server, api) = spawn_api().await;
    Mock::given(method("GET"))
        .and(path("/api/get-drafts/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_envelope(json!({
            "drafts": [draft_json("d1")]
        }))))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/delete-draft/d1/"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "status": "error",
            "message": "Database unavailable"
        })))
        .mount(&server)
        .await;

    let mut list = BillCollection::drafts();
    list.refresh(&api).await.expect("refresh");

    let err = list.delete(&api, "d1").await.unwrap_err();
    assert!(matches!(err, AppError::Server { .. }));
    // The card is still there after the healing re-fetch.
    assert_eq!(list.records().len(), 1);
}

#[tokio::test]
async fn converting_a_draft_removes_its_card() {
    let (server, api) = spawn_api().await;
    Mock::given(method("GET"))
        .and(path("/api/get-drafts/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_envelope(json!({
            "drafts": [draft_json("d1"), draft_json("d2")]
        }))))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/convert/draft-to-kacha/d1/"))
        .and(header("X-CSRFToken", TEST_CSRF))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": "Draft converted to Kacha Bill successfully!",
            "kacha_bill_id": "k9"
        })))
        .mount(&server)
        .await;

    let mut list = BillCollection::drafts();
    list.refresh(&api).await.expect("refresh");

    let outcome = list
        .convert(&api, "d1", BillStatus::Kacha)
        .await
        .expect("convert");
    assert_eq!(outcome.bill_id, "k9");
    assert_eq!(list.records().len(), 1);
    assert_eq!(list.records()[0].id.as_deref(), Some("d2"));
}

#[tokio::test]
async fn kacha_converts_to_pakka() {
    let (server, api) = spawn_api().await;
    Mock::given(method("GET"))
        .and(path("/api/get-kacha-bills/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_envelope(json!({
            "kacha_bills": [draft_json("k1")]
        }))))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/convert/kacha-to-pakka/k1/"))
        .and(header("X-CSRFToken", TEST_CSRF))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": "Kacha Bill converted to Pakka Bill successfully!",
            "pakka_bill_id": "p3"
        })))
        .mount(&server)
        .await;

    let mut list = BillCollection::kacha_bills();
    list.refresh(&api).await.expect("refresh");

    let outcome = list
        .convert(&api, "k1", BillStatus::Pakka)
        .await
        .expect("convert");
    assert_eq!(outcome.bill_id, "p3");
    assert_eq!(*list.state(), ListState::Empty);
}

#[tokio::test]
async fn downloading_a_pakka_bill_enriches_from_the_profile() {
    let (server, api) = spawn_api().await;
    let mut bill = draft_json("p1");
    bill["billNumber"] = json!("PB-9");
    Mock::given(method("GET"))
        .and(path("/api/get-pakka-bill/p1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_envelope(json!({
            "bill": bill
        }))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/get-company-details/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_envelope(json!({
            "company": {
                "companyName": "Acme Industries",
                "gstNumber": "27AAAAA0000A1Z5",
                "bankName": "State Bank",
                "accountNumber": "123456789012"
            }
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let renderer = billing_client::PdfRenderer::new().expect("renderer");
    let pdf = billing_client::download_bill_pdf(&api, &renderer, billing_client::PdfKind::Pakka, "p1")
        .await
        .expect("download");

    assert_eq!(pdf.filename, "Pakka_Bill_PB-9.pdf");
    assert!(pdf.bytes.starts_with(b"%PDF"));

    // A second download reuses the cached profile (expect(1) above).
    billing_client::download_bill_pdf(&api, &renderer, billing_client::PdfKind::Pakka, "p1")
        .await
        .expect("second download");
}

#[tokio::test]
async fn illegal_conversions_never_reach_the_network() {
    let (server, api) = spawn_api().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .expect(0)
        .mount(&server)
        .await;

    let mut pakka = BillCollection::pakka_bills();
    let err = pakka.convert(&api, "p1", BillStatus::Kacha).await.unwrap_err();
    assert!(matches!(err, AppError::IllegalConversion { .. }));

    let mut kacha = BillCollection::kacha_bills();
    let err = kacha.convert(&api, "k1", BillStatus::Draft).await.unwrap_err();
    assert!(matches!(err, AppError::IllegalConversion { .. }));
}
