use crate::{
    db::DbPool,
    entities::{
        client::Entity as ClientEntity,
        document::{self, DocumentStatus, Entity as DocumentEntity, Model as DocumentModel},
        project::{self, Entity as ProjectEntity, ProjectStatus},
    },
    errors::ServiceError,
    services::documents::DocumentResponse,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProjectSummary {
    pub code: String,
    pub name: String,
    /// Legal name of the owning client, when it still exists.
    pub client: Option<String>,
    pub budget: Decimal,
    pub status: ProjectStatus,
}

/// The reconciled payment state of a project. Money totals are exact
/// currency sums; percentages are rounded to two decimals for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PaymentProgress {
    pub total_billed: Decimal,
    pub total_paid: Decimal,
    pub total_outstanding: Decimal,
    pub percent_paid: f64,
    pub percent_remaining: f64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProjectProgressReport {
    pub project: ProjectSummary,
    pub progress: PaymentProgress,
    pub documents: Vec<DocumentResponse>,
    pub document_count: usize,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn percentage(part: Decimal, whole: Decimal) -> f64 {
    let whole = whole.to_f64().unwrap_or(0.0);
    if whole <= 0.0 {
        return 0.0;
    }
    (part.to_f64().unwrap_or(0.0) / whole) * 100.0
}

/// Derive a project's payment progress from its ledger entries.
///
/// Billing and payment only count invoices and receipts; Voided documents
/// never contribute. Outstanding is floored at zero, and the completion
/// percentage is clamped to 100 as a deliberate safety net (when billing is
/// the denominator, paid > billed is not arithmetically impossible).
pub fn reconcile(budget: Decimal, documents: &[DocumentModel]) -> PaymentProgress {
    let total_billed: Decimal = documents
        .iter()
        .filter(|doc| doc.document_type.is_revenue() && doc.status != DocumentStatus::Voided)
        .map(|doc| doc.total_amount)
        .sum();

    let total_paid: Decimal = documents
        .iter()
        .filter(|doc| doc.document_type.is_revenue() && doc.status == DocumentStatus::Paid)
        .map(|doc| doc.total_amount)
        .sum();

    let total_outstanding = (total_billed - total_paid).max(Decimal::ZERO);

    let percent_paid = if budget > Decimal::ZERO {
        if total_paid >= budget {
            100.0
        } else {
            percentage(total_paid, budget)
        }
    } else if total_billed > Decimal::ZERO {
        percentage(total_paid, total_billed)
    } else {
        0.0
    };

    let percent_paid = percent_paid.min(100.0);

    PaymentProgress {
        total_billed,
        total_paid,
        total_outstanding,
        percent_paid: round2(percent_paid),
        percent_remaining: round2(100.0 - percent_paid),
    }
}

/// Derives payment completion and outstanding balance for projects from
/// their associated ledger documents.
#[derive(Clone)]
pub struct ProgressService {
    db_pool: Arc<DbPool>,
}

impl ProgressService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Full progress report for one project; NotFound when the code is
    /// unknown. A project without documents reports all-zero progress.
    #[instrument(skip(self), fields(code = %code))]
    pub async fn project_progress(
        &self,
        code: &str,
    ) -> Result<ProjectProgressReport, ServiceError> {
        let db = &*self.db_pool;

        let (project, owner) = ProjectEntity::find()
            .filter(project::Column::Code.eq(code))
            .find_also_related(ClientEntity)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Project {code} not found")))?;

        let rows = DocumentEntity::find()
            .find_also_related(ClientEntity)
            .filter(document::Column::ProjectCode.eq(code))
            .order_by_desc(document::Column::IssueDate)
            .order_by_desc(document::Column::Id)
            .all(db)
            .await?;

        let models: Vec<DocumentModel> = rows.iter().map(|(model, _)| model.clone()).collect();
        let progress = reconcile(project.budget, &models);

        info!(
            code = %code,
            billed = %progress.total_billed,
            paid = %progress.total_paid,
            outstanding = %progress.total_outstanding,
            "reconciled project progress"
        );

        let documents: Vec<DocumentResponse> = rows
            .into_iter()
            .map(|(model, doc_owner)| DocumentResponse::from_model(model, doc_owner))
            .collect();
        let document_count = documents.len();

        Ok(ProjectProgressReport {
            project: ProjectSummary {
                code: project.code,
                name: project.name,
                client: owner.map(|c| c.legal_name),
                budget: project.budget,
                status: project.status,
            },
            progress,
            documents,
            document_count,
        })
    }

    /// All ledger documents referencing the project code, newest first.
    /// Returns an empty list for codes with no documents.
    #[instrument(skip(self), fields(code = %code))]
    pub async fn project_documents(
        &self,
        code: &str,
    ) -> Result<Vec<DocumentResponse>, ServiceError> {
        let db = &*self.db_pool;

        let rows = DocumentEntity::find()
            .find_also_related(ClientEntity)
            .filter(document::Column::ProjectCode.eq(code))
            .order_by_desc(document::Column::IssueDate)
            .order_by_desc(document::Column::Id)
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(model, owner)| DocumentResponse::from_model(model, owner))
            .collect())
    }
}
