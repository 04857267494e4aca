use std::str::FromStr;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};

use crate::entities::document::DocumentType;
use crate::services::documents::{
    CreateDocumentRequest, DocumentResponse, DocumentSearchFilters, UpdateDocumentStatusRequest,
};
use crate::{errors::ServiceError, ApiResponse, AppState};

/// Issue a document into the ledger
#[utoipa::path(
    post,
    path = "/api/v1/documents",
    summary = "Issue document",
    description = "Appends a document with status Pending; amounts are recorded as supplied",
    request_body = CreateDocumentRequest,
    responses(
        (status = 201, description = "Document issued", body = ApiResponse<DocumentResponse>),
        (status = 400, description = "Missing required fields", body = crate::errors::ErrorResponse),
    ),
    tag = "Documents"
)]
pub async fn create_document(
    State(state): State<AppState>,
    Json(request): Json<CreateDocumentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<DocumentResponse>>), ServiceError> {
    let document = state.services.documents.create(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(document))))
}

/// Overwrite a document's status
#[utoipa::path(
    put,
    path = "/api/v1/documents/{id}/status",
    summary = "Set document status",
    params(("id" = i64, Path, description = "Ledger document id")),
    request_body = UpdateDocumentStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<DocumentResponse>),
        (status = 404, description = "Document not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Documents"
)]
pub async fn update_document_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateDocumentStatusRequest>,
) -> Result<Json<ApiResponse<DocumentResponse>>, ServiceError> {
    let document = state
        .services
        .documents
        .set_status(id, request.status)
        .await?;
    Ok(Json(ApiResponse::success(document)))
}

/// Search the ledger
#[utoipa::path(
    get,
    path = "/api/v1/documents",
    summary = "Search documents",
    description = "Filters combine as an intersection; results are newest first, capped at 500",
    params(
        ("document_type" = Option<String>, Query, description = "FAC, BOL, ND, NC or GD"),
        ("status" = Option<String>, Query, description = "Pending, Paid, Voided or Applied"),
        ("date_from" = Option<String>, Query, description = "Issue date lower bound (YYYY-MM-DD)"),
        ("date_to" = Option<String>, Query, description = "Issue date upper bound (YYYY-MM-DD)"),
        ("project_code" = Option<String>, Query, description = "Exact project code"),
        ("account_like" = Option<String>, Query, description = "Substring of the client's account number"),
    ),
    responses(
        (status = 200, description = "Matching documents", body = ApiResponse<Vec<DocumentResponse>>),
    ),
    tag = "Documents"
)]
pub async fn search_documents(
    State(state): State<AppState>,
    Query(filters): Query<DocumentSearchFilters>,
) -> Result<Json<ApiResponse<Vec<DocumentResponse>>>, ServiceError> {
    let documents = state.services.documents.search(filters).await?;
    Ok(Json(ApiResponse::success(documents)))
}

/// Latest documents of one type
#[utoipa::path(
    get,
    path = "/api/v1/documents/recent/{document_type}",
    summary = "Recent documents by type",
    params(("document_type" = String, Path, description = "FAC, BOL, ND, NC or GD")),
    responses(
        (status = 200, description = "Recent documents", body = ApiResponse<Vec<DocumentResponse>>),
        (status = 400, description = "Unknown document type", body = crate::errors::ErrorResponse),
    ),
    tag = "Documents"
)]
pub async fn recent_documents(
    State(state): State<AppState>,
    Path(raw_type): Path<String>,
) -> Result<Json<ApiResponse<Vec<DocumentResponse>>>, ServiceError> {
    let document_type = DocumentType::from_str(&raw_type)
        .map_err(|_| ServiceError::InvalidInput(format!("Unknown document type: {raw_type}")))?;

    let documents = state.services.documents.recent_by_type(document_type).await?;
    Ok(Json(ApiResponse::success(documents)))
}

/// Latest pending documents, for the dashboard
#[utoipa::path(
    get,
    path = "/api/v1/documents/pending",
    summary = "Pending documents",
    responses(
        (status = 200, description = "Pending documents", body = ApiResponse<Vec<DocumentResponse>>),
    ),
    tag = "Documents"
)]
pub async fn pending_documents(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<DocumentResponse>>>, ServiceError> {
    let documents = state.services.documents.pending().await?;
    Ok(Json(ApiResponse::success(documents)))
}
