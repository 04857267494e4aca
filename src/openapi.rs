use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::document::{DocumentStatus, DocumentType};
use crate::entities::project::ProjectStatus;
use crate::errors::ErrorResponse;
use crate::services::clients::{ClientResponse, UpdateClientRequest, UpsertClientRequest};
use crate::services::documents::{
    CreateDocumentRequest, DocumentResponse, UpdateDocumentStatusRequest,
};
use crate::services::progress::{PaymentProgress, ProjectProgressReport, ProjectSummary};
use crate::services::projects::{ProjectResponse, UpsertProjectRequest};
use crate::services::reports::{
    AnnualMonth, AnnualRollup, AnnualSummary, ClientDebt, DashboardSummary, MonthlySales,
    TopClient,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Facturación API",
        version = "0.1.0",
        description = r#"
# Invoicing & Project Reconciliation API

Backend for a Chilean invoicing workflow: clients identified by RUT,
projects with budgets, an append-mostly ledger of issued tax documents
(FAC, BOL, ND, NC, GD), and the reconciliation that derives each
project's payment progress and outstanding debt.

## Conventions

- RUTs are normalized to `body-checkDigit` and checksum-validated before
  any client or project write.
- Documents are appended with status `Pending`; afterwards only their
  status changes (`Pending`, `Paid`, `Voided`, `Applied`).
- Money fields are exact decimal sums; percentages are rounded to two
  decimals for display.
- Failing requests return an `ErrorResponse` body with the matching HTTP
  status code.
        "#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(
        crate::handlers::clients::list_clients,
        crate::handlers::clients::upsert_client,
        crate::handlers::clients::update_client,
        crate::handlers::clients::deactivate_client,
        crate::handlers::projects::list_projects,
        crate::handlers::projects::upsert_project,
        crate::handlers::projects::update_project,
        crate::handlers::projects::delete_project,
        crate::handlers::projects::get_project_progress,
        crate::handlers::projects::get_project_documents,
        crate::handlers::documents::create_document,
        crate::handlers::documents::update_document_status,
        crate::handlers::documents::search_documents,
        crate::handlers::documents::recent_documents,
        crate::handlers::documents::pending_documents,
    ),
    components(schemas(
        ErrorResponse,
        ClientResponse,
        UpsertClientRequest,
        UpdateClientRequest,
        ProjectResponse,
        UpsertProjectRequest,
        ProjectStatus,
        DocumentResponse,
        CreateDocumentRequest,
        UpdateDocumentStatusRequest,
        DocumentType,
        DocumentStatus,
        ProjectProgressReport,
        ProjectSummary,
        PaymentProgress,
        ClientDebt,
        MonthlySales,
        TopClient,
        AnnualMonth,
        AnnualSummary,
        AnnualRollup,
        DashboardSummary,
    )),
    tags(
        (name = "Clients", description = "Billed parties, keyed by RUT"),
        (name = "Projects", description = "Client engagements and payment progress"),
        (name = "Documents", description = "The issued-document ledger"),
    )
)]
pub struct ApiDoc;

/// Swagger UI router serving the generated document.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
