use axum::{extract::State, response::Json, routing::get, Router};
use tracing::info;

use crate::services::reports::{
    AnnualRollup, ClientDebt, DashboardSummary, MonthlySales, TopClient,
};
use crate::{errors::ServiceError, ApiResponse, AppState};

/// Pending debt grouped by client
async fn debt_by_client(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ClientDebt>>>, ServiceError> {
    let debts = state.services.reports.debt_by_client().await?;
    info!(groups = debts.len(), "generated debt report");
    Ok(Json(ApiResponse::success(debts)))
}

/// Revenue per month and document type
async fn monthly_sales(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<MonthlySales>>>, ServiceError> {
    let sales = state.services.reports.monthly_sales().await?;
    Ok(Json(ApiResponse::success(sales)))
}

/// Clients ranked by billing
async fn top_clients(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TopClient>>>, ServiceError> {
    let clients = state.services.reports.top_clients().await?;
    Ok(Json(ApiResponse::success(clients)))
}

/// Per-month and per-year revenue rollups
async fn annual_rollup(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<AnnualRollup>>, ServiceError> {
    let rollup = state.services.reports.annual_rollup().await?;
    Ok(Json(ApiResponse::success(rollup)))
}

/// Headline totals for the dashboard
async fn dashboard_summary(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardSummary>>, ServiceError> {
    let summary = state.services.reports.dashboard_summary().await?;
    Ok(Json(ApiResponse::success(summary)))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/debt-by-client", get(debt_by_client))
        .route("/monthly-sales", get(monthly_sales))
        .route("/top-clients", get(top_clients))
        .route("/annual", get(annual_rollup))
        .route("/dashboard", get(dashboard_summary))
}
