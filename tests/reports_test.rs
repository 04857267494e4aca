mod common;

use axum::http::{Method, StatusCode};
use rust_decimal_macros::dec;

use common::{money, TestApp};

const ACME: &str = "76660180-4";
const BETA: &str = "77212362-0";

async fn seed_ledger(app: &TestApp) {
    app.seed_client(ACME, "Acme SpA").await;
    app.seed_client(BETA, "Beta Ltda").await;

    // Acme: one paid invoice, one pending invoice, one voided invoice
    let paid = app.issue_document(1, "FAC", ACME, None, 100_000).await;
    app.issue_document(2, "FAC", ACME, None, 50_000).await;
    let voided = app.issue_document(3, "FAC", ACME, None, 999_999).await;
    app.set_document_status(paid, "Paid").await;
    app.set_document_status(voided, "Voided").await;

    // Beta: one pending receipt, one pending debit note
    app.issue_document(4, "BOL", BETA, None, 30_000).await;
    app.issue_document(5, "ND", BETA, None, 7_000).await;
}

#[tokio::test]
async fn debt_report_counts_pending_documents_of_every_type() {
    let app = TestApp::new().await;
    seed_ledger(&app).await;

    let (status, body) = app
        .request_json(Method::GET, "/api/v1/reports/debt-by-client", None)
        .await;

    assert_eq!(status, StatusCode::OK);
    let rows = body["data"].as_array().expect("rows");
    assert_eq!(rows.len(), 2);

    // largest debt first: Acme owes its pending 50k invoice (the voided one
    // is not Pending); Beta owes 30k + 7k including the debit note
    assert_eq!(rows[0]["rut"], ACME);
    assert_eq!(money(&rows[0]["total_debt"]), dec!(50000));
    assert_eq!(rows[1]["rut"], BETA);
    assert_eq!(money(&rows[1]["total_debt"]), dec!(37000));
    assert_eq!(rows[1]["document_count"], 2);
}

#[tokio::test]
async fn debt_report_skips_clients_without_pending_documents() {
    let app = TestApp::new().await;
    app.seed_client(ACME, "Acme SpA").await;
    app.seed_client(BETA, "Beta Ltda").await;
    let paid = app.issue_document(1, "FAC", ACME, None, 100_000).await;
    app.set_document_status(paid, "Paid").await;

    let (_, body) = app
        .request_json(Method::GET, "/api/v1/reports/debt-by-client", None)
        .await;
    assert_eq!(body["data"].as_array().map(|a| a.len()), Some(0));
}

#[tokio::test]
async fn monthly_sales_exclude_voided_and_non_revenue_documents() {
    let app = TestApp::new().await;
    seed_ledger(&app).await;

    let (status, body) = app
        .request_json(Method::GET, "/api/v1/reports/monthly-sales", None)
        .await;

    assert_eq!(status, StatusCode::OK);
    let rows = body["data"].as_array().expect("rows");

    // All seeded documents share the issue date 2025-03-10, so one row per
    // revenue type: FAC (paid + pending, voided excluded) and BOL.
    assert_eq!(rows.len(), 2);
    let fac = rows
        .iter()
        .find(|r| r["document_type"] == "FAC")
        .expect("FAC row");
    assert_eq!(fac["month"], "2025-03");
    assert_eq!(fac["document_count"], 2);
    assert_eq!(money(&fac["total_sales"]), dec!(150000));

    let bol = rows
        .iter()
        .find(|r| r["document_type"] == "BOL")
        .expect("BOL row");
    assert_eq!(money(&bol["total_sales"]), dec!(30000));
}

#[tokio::test]
async fn top_clients_rank_by_billing_with_breakdowns() {
    let app = TestApp::new().await;
    seed_ledger(&app).await;

    let (status, body) = app
        .request_json(Method::GET, "/api/v1/reports/top-clients", None)
        .await;

    assert_eq!(status, StatusCode::OK);
    let rows = body["data"].as_array().expect("rows");
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0]["rut"], ACME);
    assert_eq!(money(&rows[0]["total_billed"]), dec!(150000));
    assert_eq!(money(&rows[0]["total_paid"]), dec!(100000));
    assert_eq!(money(&rows[0]["total_pending"]), dec!(50000));

    assert_eq!(rows[1]["rut"], BETA);
    assert_eq!(money(&rows[1]["total_billed"]), dec!(30000));
}

#[tokio::test]
async fn annual_rollup_tracks_sales_and_payments_per_year() {
    let app = TestApp::new().await;
    seed_ledger(&app).await;

    let (status, body) = app
        .request_json(Method::GET, "/api/v1/reports/annual", None)
        .await;

    assert_eq!(status, StatusCode::OK);
    let yearly = body["data"]["yearly"].as_array().expect("yearly");
    assert_eq!(yearly.len(), 1);
    assert_eq!(yearly[0]["year"], 2025);
    assert_eq!(yearly[0]["document_count"], 3);
    assert_eq!(money(&yearly[0]["total_sales"]), dec!(180000));
    assert_eq!(money(&yearly[0]["total_paid"]), dec!(100000));

    let monthly = body["data"]["monthly"].as_array().expect("monthly");
    assert_eq!(monthly.len(), 1);
    assert_eq!(monthly[0]["month"], 3);
}

#[tokio::test]
async fn dashboard_summary_reports_headline_numbers() {
    let app = TestApp::new().await;
    seed_ledger(&app).await;
    app.seed_project("PRJ-001", ACME, 100_000).await;

    let (status, body) = app
        .request_json(Method::GET, "/api/v1/reports/dashboard", None)
        .await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    // pending: Acme 50k FAC + Beta 30k BOL + Beta 7k ND
    assert_eq!(money(&data["total_debt"]), dec!(87000));
    assert_eq!(data["active_clients"], 2);
    assert_eq!(data["active_projects"], 1);
    assert_eq!(data["pending_documents"], 3);
}
