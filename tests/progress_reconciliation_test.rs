mod common;

use axum::http::{Method, StatusCode};
use rust_decimal_macros::dec;

use common::{money, TestApp};

const CLIENT_RUT: &str = "76660180-4";

#[tokio::test]
async fn progress_against_budget_counts_paid_revenue() {
    let app = TestApp::new().await;
    app.seed_client(CLIENT_RUT, "Acme SpA").await;
    app.seed_project("PRJ-001", CLIENT_RUT, 100_000).await;

    let a = app
        .issue_document(101, "FAC", CLIENT_RUT, Some("PRJ-001"), 50_000)
        .await;
    let b = app
        .issue_document(102, "BOL", CLIENT_RUT, Some("PRJ-001"), 30_000)
        .await;
    app.set_document_status(a, "Paid").await;
    app.set_document_status(b, "Paid").await;

    let (status, body) = app
        .request_json(Method::GET, "/api/v1/projects/PRJ-001/progress", None)
        .await;

    assert_eq!(status, StatusCode::OK);
    let progress = &body["data"]["progress"];
    assert_eq!(money(&progress["total_billed"]), dec!(80000));
    assert_eq!(money(&progress["total_paid"]), dec!(80000));
    assert_eq!(money(&progress["total_outstanding"]), dec!(0));
    assert_eq!(progress["percent_paid"], 80.0);
    assert_eq!(progress["percent_remaining"], 20.0);
    assert_eq!(body["data"]["document_count"], 2);
    assert_eq!(body["data"]["project"]["client"], "Acme SpA");
}

#[tokio::test]
async fn progress_without_budget_uses_billed_as_denominator() {
    let app = TestApp::new().await;
    app.seed_client(CLIENT_RUT, "Acme SpA").await;
    app.seed_project("PRJ-002", CLIENT_RUT, 0).await;

    let paid = app
        .issue_document(201, "FAC", CLIENT_RUT, Some("PRJ-002"), 25_000)
        .await;
    app.issue_document(202, "FAC", CLIENT_RUT, Some("PRJ-002"), 25_000)
        .await;
    app.set_document_status(paid, "Paid").await;

    let (_, body) = app
        .request_json(Method::GET, "/api/v1/projects/PRJ-002/progress", None)
        .await;

    let progress = &body["data"]["progress"];
    assert_eq!(money(&progress["total_billed"]), dec!(50000));
    assert_eq!(money(&progress["total_outstanding"]), dec!(25000));
    assert_eq!(progress["percent_paid"], 50.0);
}

#[tokio::test]
async fn overpayment_clamps_percentage_and_floors_outstanding() {
    let app = TestApp::new().await;
    app.seed_client(CLIENT_RUT, "Acme SpA").await;
    app.seed_project("PRJ-003", CLIENT_RUT, 100_000).await;

    let doc = app
        .issue_document(301, "FAC", CLIENT_RUT, Some("PRJ-003"), 150_000)
        .await;
    app.set_document_status(doc, "Paid").await;

    let (_, body) = app
        .request_json(Method::GET, "/api/v1/projects/PRJ-003/progress", None)
        .await;

    let progress = &body["data"]["progress"];
    assert_eq!(progress["percent_paid"], 100.0);
    assert_eq!(progress["percent_remaining"], 0.0);
    assert_eq!(money(&progress["total_outstanding"]), dec!(0));
}

#[tokio::test]
async fn project_without_documents_reports_zeros() {
    let app = TestApp::new().await;
    app.seed_client(CLIENT_RUT, "Acme SpA").await;
    app.seed_project("PRJ-004", CLIENT_RUT, 0).await;

    let (status, body) = app
        .request_json(Method::GET, "/api/v1/projects/PRJ-004/progress", None)
        .await;

    assert_eq!(status, StatusCode::OK);
    let progress = &body["data"]["progress"];
    assert_eq!(money(&progress["total_billed"]), dec!(0));
    assert_eq!(money(&progress["total_paid"]), dec!(0));
    assert_eq!(money(&progress["total_outstanding"]), dec!(0));
    assert_eq!(progress["percent_paid"], 0.0);
    assert_eq!(body["data"]["document_count"], 0);
}

#[tokio::test]
async fn voided_documents_never_contribute() {
    let app = TestApp::new().await;
    app.seed_client(CLIENT_RUT, "Acme SpA").await;
    app.seed_project("PRJ-005", CLIENT_RUT, 100_000).await;

    let paid = app
        .issue_document(501, "FAC", CLIENT_RUT, Some("PRJ-005"), 40_000)
        .await;
    let voided = app
        .issue_document(502, "FAC", CLIENT_RUT, Some("PRJ-005"), 99_999)
        .await;
    app.issue_document(503, "BOL", CLIENT_RUT, Some("PRJ-005"), 10_000)
        .await;
    app.set_document_status(paid, "Paid").await;
    app.set_document_status(voided, "Voided").await;

    let (_, body) = app
        .request_json(Method::GET, "/api/v1/projects/PRJ-005/progress", None)
        .await;

    let progress = &body["data"]["progress"];
    assert_eq!(money(&progress["total_billed"]), dec!(50000));
    assert_eq!(money(&progress["total_paid"]), dec!(40000));
    assert_eq!(money(&progress["total_outstanding"]), dec!(10000));
    // the voided document still appears in the listing
    assert_eq!(body["data"]["document_count"], 3);
}

#[tokio::test]
async fn non_revenue_documents_are_listed_but_not_counted() {
    let app = TestApp::new().await;
    app.seed_client(CLIENT_RUT, "Acme SpA").await;
    app.seed_project("PRJ-006", CLIENT_RUT, 0).await;

    let invoice = app
        .issue_document(601, "FAC", CLIENT_RUT, Some("PRJ-006"), 30_000)
        .await;
    app.issue_document(602, "NC", CLIENT_RUT, Some("PRJ-006"), 5_000)
        .await;
    app.issue_document(603, "GD", CLIENT_RUT, Some("PRJ-006"), 9_000)
        .await;
    app.set_document_status(invoice, "Paid").await;

    let (_, body) = app
        .request_json(Method::GET, "/api/v1/projects/PRJ-006/progress", None)
        .await;

    let progress = &body["data"]["progress"];
    assert_eq!(money(&progress["total_billed"]), dec!(30000));
    assert_eq!(progress["percent_paid"], 100.0);
    assert_eq!(body["data"]["document_count"], 3);
}

#[tokio::test]
async fn unknown_project_returns_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request_json(Method::GET, "/api/v1/projects/NOPE/progress", None)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test]
async fn project_documents_listing_survives_project_deletion() {
    let app = TestApp::new().await;
    app.seed_client(CLIENT_RUT, "Acme SpA").await;
    app.seed_project("PRJ-007", CLIENT_RUT, 0).await;
    app.issue_document(701, "FAC", CLIENT_RUT, Some("PRJ-007"), 10_000)
        .await;

    let (status, _) = app
        .request_json(Method::DELETE, "/api/v1/projects/PRJ-007", None)
        .await;
    assert_eq!(status, StatusCode::OK);

    // documents keep their dangling project reference
    let (status, body) = app
        .request_json(Method::GET, "/api/v1/projects/PRJ-007/documents", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(|a| a.len()), Some(1));

    // but the progress endpoint now reports not-found
    let (status, _) = app
        .request_json(Method::GET, "/api/v1/projects/PRJ-007/progress", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
