use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};

use crate::services::clients::{ClientResponse, UpdateClientRequest, UpsertClientRequest};
use crate::{errors::ServiceError, ApiResponse, AppState};

/// List active clients
#[utoipa::path(
    get,
    path = "/api/v1/clients",
    summary = "List clients",
    description = "Active clients ordered by legal name",
    responses(
        (status = 200, description = "Clients retrieved", body = ApiResponse<Vec<ClientResponse>>),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "Clients"
)]
pub async fn list_clients(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ClientResponse>>>, ServiceError> {
    let clients = state.services.clients.list_active().await?;
    Ok(Json(ApiResponse::success(clients)))
}

/// Create a client, or update and reactivate the record sharing the RUT
#[utoipa::path(
    post,
    path = "/api/v1/clients",
    summary = "Upsert client",
    request_body = UpsertClientRequest,
    responses(
        (status = 200, description = "Client created or updated", body = ApiResponse<ClientResponse>),
        (status = 400, description = "Invalid RUT, email or phone", body = crate::errors::ErrorResponse),
        (status = 409, description = "Duplicate key", body = crate::errors::ErrorResponse),
    ),
    tag = "Clients"
)]
pub async fn upsert_client(
    State(state): State<AppState>,
    Json(request): Json<UpsertClientRequest>,
) -> Result<Json<ApiResponse<ClientResponse>>, ServiceError> {
    let client = state.services.clients.upsert(request).await?;
    Ok(Json(ApiResponse::success(client)))
}

/// Update an existing client by RUT
#[utoipa::path(
    put,
    path = "/api/v1/clients/{rut}",
    summary = "Update client",
    params(("rut" = String, Path, description = "Client tax identifier")),
    request_body = UpdateClientRequest,
    responses(
        (status = 200, description = "Client updated", body = ApiResponse<ClientResponse>),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorResponse),
        (status = 404, description = "Client not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Clients"
)]
pub async fn update_client(
    State(state): State<AppState>,
    Path(rut): Path<String>,
    Json(request): Json<UpdateClientRequest>,
) -> Result<Json<ApiResponse<ClientResponse>>, ServiceError> {
    let client = state.services.clients.update(&rut, request).await?;
    Ok(Json(ApiResponse::success(client)))
}

/// Deactivate a client (soft delete)
#[utoipa::path(
    delete,
    path = "/api/v1/clients/{rut}",
    summary = "Deactivate client",
    params(("rut" = String, Path, description = "Client tax identifier")),
    responses(
        (status = 200, description = "Client deactivated", body = ApiResponse<Value>),
        (status = 404, description = "Client not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Clients"
)]
pub async fn deactivate_client(
    State(state): State<AppState>,
    Path(rut): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), ServiceError> {
    state.services.clients.deactivate(&rut).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(json!({ "rut": rut, "active": false }))),
    ))
}
