use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};

use crate::services::documents::DocumentResponse;
use crate::services::progress::ProjectProgressReport;
use crate::services::projects::{ProjectResponse, UpsertProjectRequest};
use crate::{errors::ServiceError, ApiResponse, AppState};

/// List projects
#[utoipa::path(
    get,
    path = "/api/v1/projects",
    summary = "List projects",
    description = "All projects with owning client names, newest start date first",
    responses(
        (status = 200, description = "Projects retrieved", body = ApiResponse<Vec<ProjectResponse>>),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "Projects"
)]
pub async fn list_projects(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ProjectResponse>>>, ServiceError> {
    let projects = state.services.projects.list().await?;
    Ok(Json(ApiResponse::success(projects)))
}

/// Create a project, or update the one sharing the code
#[utoipa::path(
    post,
    path = "/api/v1/projects",
    summary = "Upsert project",
    request_body = UpsertProjectRequest,
    responses(
        (status = 200, description = "Project created or updated", body = ApiResponse<ProjectResponse>),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorResponse),
        (status = 404, description = "Owning client does not exist", body = crate::errors::ErrorResponse),
    ),
    tag = "Projects"
)]
pub async fn upsert_project(
    State(state): State<AppState>,
    Json(request): Json<UpsertProjectRequest>,
) -> Result<Json<ApiResponse<ProjectResponse>>, ServiceError> {
    let project = state.services.projects.upsert(request).await?;
    Ok(Json(ApiResponse::success(project)))
}

/// Update an existing project by code
#[utoipa::path(
    put,
    path = "/api/v1/projects/{code}",
    summary = "Update project",
    params(("code" = String, Path, description = "Project code")),
    request_body = UpsertProjectRequest,
    responses(
        (status = 200, description = "Project updated", body = ApiResponse<ProjectResponse>),
        (status = 404, description = "Project not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Projects"
)]
pub async fn update_project(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(request): Json<UpsertProjectRequest>,
) -> Result<Json<ApiResponse<ProjectResponse>>, ServiceError> {
    let project = state.services.projects.update(&code, request).await?;
    Ok(Json(ApiResponse::success(project)))
}

/// Delete a project (admin operation)
#[utoipa::path(
    delete,
    path = "/api/v1/projects/{code}",
    summary = "Delete project",
    params(("code" = String, Path, description = "Project code")),
    responses(
        (status = 200, description = "Project deleted", body = ApiResponse<Value>),
        (status = 404, description = "Project not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Projects"
)]
pub async fn delete_project(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), ServiceError> {
    state.services.projects.delete(&code).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(json!({ "code": code, "deleted": true }))),
    ))
}

/// Payment progress for one project
#[utoipa::path(
    get,
    path = "/api/v1/projects/{code}/progress",
    summary = "Project payment progress",
    description = "Billed, paid and outstanding totals plus completion percentage, derived from the project's ledger documents",
    params(("code" = String, Path, description = "Project code")),
    responses(
        (status = 200, description = "Progress report", body = ApiResponse<ProjectProgressReport>),
        (status = 404, description = "Project not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Projects"
)]
pub async fn get_project_progress(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<ProjectProgressReport>>, ServiceError> {
    let report = state.services.progress.project_progress(&code).await?;
    Ok(Json(ApiResponse::success(report)))
}

/// Documents associated with one project
#[utoipa::path(
    get,
    path = "/api/v1/projects/{code}/documents",
    summary = "Project documents",
    params(("code" = String, Path, description = "Project code")),
    responses(
        (status = 200, description = "Documents retrieved", body = ApiResponse<Vec<DocumentResponse>>),
    ),
    tag = "Projects"
)]
pub async fn get_project_documents(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<Vec<DocumentResponse>>>, ServiceError> {
    let documents = state.services.progress.project_documents(&code).await?;
    Ok(Json(ApiResponse::success(documents)))
}
