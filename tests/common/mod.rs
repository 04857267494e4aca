#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request},
    response::Response,
    Router,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;

use facturacion_api::{
    config::AppConfig,
    db::{self, DbConfig},
    handlers::AppServices,
    AppState,
};

/// Test harness backed by an in-memory SQLite database.
///
/// The pool is pinned to a single connection so every request sees the same
/// in-memory database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let db_cfg = DbConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        };

        let pool = db::establish_connection_with_config(&db_cfg)
            .await
            .expect("connect to in-memory sqlite");
        db::run_migrations(&pool).await.expect("run migrations");

        let db_arc = Arc::new(pool);
        let services = AppServices::new(db_arc.clone());
        let state = AppState {
            db: db_arc,
            config: AppConfig::new("sqlite::memory:"),
            services,
        };

        let router = Router::new()
            .nest("/api/v1", facturacion_api::api_v1_routes())
            .with_state(state.clone());

        Self { router, state }
    }

    /// Send a request and return the raw response.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.router
            .clone()
            .oneshot(builder.body(body).expect("build request"))
            .await
            .expect("send request")
    }

    /// Send a request and parse the JSON body.
    pub async fn request_json(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (axum::http::StatusCode, Value) {
        let response = self.request(method, uri, body).await;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read response body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("parse response body")
        };
        (status, json)
    }

    /// Seed an active client.
    pub async fn seed_client(&self, rut: &str, legal_name: &str) {
        let (status, body) = self
            .request_json(
                Method::POST,
                "/api/v1/clients",
                Some(json!({
                    "rut": rut,
                    "legal_name": legal_name,
                    "email": "billing@example.com"
                })),
            )
            .await;
        assert!(status.is_success(), "seed_client failed: {body}");
    }

    /// Seed a project owned by an existing client.
    pub async fn seed_project(&self, code: &str, client_rut: &str, budget: i64) {
        let (status, body) = self
            .request_json(
                Method::POST,
                "/api/v1/projects",
                Some(json!({
                    "code": code,
                    "name": format!("Project {code}"),
                    "client_rut": client_rut,
                    "budget": budget,
                    "start_date": "2025-01-15"
                })),
            )
            .await;
        assert!(status.is_success(), "seed_project failed: {body}");
    }

    /// Issue a ledger document; returns its id.
    pub async fn issue_document(
        &self,
        number: i64,
        document_type: &str,
        client_rut: &str,
        project_code: Option<&str>,
        total: i64,
    ) -> i64 {
        let (status, body) = self
            .request_json(
                Method::POST,
                "/api/v1/documents",
                Some(json!({
                    "document_number": number,
                    "document_type": document_type,
                    "issue_date": "2025-03-10",
                    "client_rut": client_rut,
                    "project_code": project_code,
                    "net_amount": total,
                    "tax_amount": 0,
                    "total_amount": total
                })),
            )
            .await;
        assert!(status.is_success(), "issue_document failed: {body}");
        body["data"]["id"].as_i64().expect("document id")
    }

    /// Overwrite a document's status.
    pub async fn set_document_status(&self, id: i64, status_name: &str) {
        let (status, body) = self
            .request_json(
                Method::PUT,
                &format!("/api/v1/documents/{id}/status"),
                Some(json!({ "status": status_name })),
            )
            .await;
        assert!(status.is_success(), "set_document_status failed: {body}");
    }
}

/// Parse a money field serialized by rust_decimal (a JSON string).
pub fn money(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().expect("decimal string")).expect("parse decimal")
}
