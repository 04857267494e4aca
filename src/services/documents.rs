use crate::{
    db::DbPool,
    entities::{
        client::{self, Entity as ClientEntity, Model as ClientModel},
        document::{
            self, DocumentStatus, DocumentType, Entity as DocumentEntity, Model as DocumentModel,
        },
    },
    errors::ServiceError,
    rut,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Hard cap on ledger search results to bound response size.
pub const MAX_SEARCH_RESULTS: u64 = 500;

/// Window for the per-type "latest documents" listing.
const RECENT_LIMIT: u64 = 20;

/// Window for the dashboard pending-documents listing.
const PENDING_LIMIT: u64 = 10;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateDocumentRequest {
    #[validate(range(min = 1, message = "Document number is required"))]
    pub document_number: i64,

    pub document_type: DocumentType,
    pub issue_date: NaiveDate,

    #[validate(length(min = 1, message = "Client RUT is required"))]
    pub client_rut: String,

    pub project_code: Option<String>,
    pub description: Option<String>,

    /// Precomputed by the caller; total = net + tax is not re-validated.
    pub net_amount: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,

    /// Defaults to "Contado".
    pub payment_terms: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateDocumentStatusRequest {
    pub status: DocumentStatus,
}

/// Ledger search filters, combined as an intersection. Unset fields are
/// omitted from the predicate.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct DocumentSearchFilters {
    pub document_type: Option<DocumentType>,
    pub status: Option<DocumentStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub project_code: Option<String>,
    /// Substring match on the owning client's account number.
    pub account_like: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentResponse {
    pub id: i64,
    pub document_number: i64,
    pub document_type: DocumentType,
    pub issue_date: NaiveDate,
    pub client_rut: String,
    pub client_name: Option<String>,
    pub project_code: Option<String>,
    pub description: Option<String>,
    pub net_amount: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub status: DocumentStatus,
    pub payment_terms: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DocumentResponse {
    pub(crate) fn from_model(model: DocumentModel, owner: Option<ClientModel>) -> Self {
        Self {
            id: model.id,
            document_number: model.document_number,
            document_type: model.document_type,
            issue_date: model.issue_date,
            client_rut: model.client_rut,
            client_name: owner.map(|c| c.legal_name),
            project_code: model.project_code,
            description: model.description,
            net_amount: model.net_amount,
            tax_amount: model.tax_amount,
            total_amount: model.total_amount,
            status: model.status,
            payment_terms: model.payment_terms,
            created_at: model.created_at,
        }
    }
}

/// The document ledger: append-mostly record of issued tax documents.
/// No monetary math is validated here; callers supply precomputed amounts.
#[derive(Clone)]
pub struct DocumentService {
    db_pool: Arc<DbPool>,
}

impl DocumentService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Appends a document to the ledger with status Pending.
    #[instrument(skip(self, request), fields(number = request.document_number, doc_type = %request.document_type))]
    pub async fn create(
        &self,
        request: CreateDocumentRequest,
    ) -> Result<DocumentResponse, ServiceError> {
        request.validate()?;

        let client_rut = rut::normalize(&request.client_rut).ok_or_else(|| {
            ServiceError::ValidationError(format!("Invalid client RUT: {}", request.client_rut))
        })?;

        let project_code = request
            .project_code
            .map(|code| code.trim().to_string())
            .filter(|code| !code.is_empty());

        let payment_terms = request
            .payment_terms
            .filter(|terms| !terms.trim().is_empty())
            .or_else(|| Some("Contado".to_string()));

        let db = &*self.db_pool;
        let active = document::ActiveModel {
            document_number: Set(request.document_number),
            document_type: Set(request.document_type),
            issue_date: Set(request.issue_date),
            client_rut: Set(client_rut.clone()),
            project_code: Set(project_code),
            description: Set(request.description),
            net_amount: Set(request.net_amount),
            tax_amount: Set(request.tax_amount),
            total_amount: Set(request.total_amount),
            status: Set(DocumentStatus::Pending),
            payment_terms: Set(payment_terms),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let model = active.insert(db).await.map_err(ServiceError::write_error)?;

        info!(id = model.id, client_rut = %client_rut, "document appended to ledger");

        let owner = ClientEntity::find()
            .filter(client::Column::Rut.eq(model.client_rut.clone()))
            .one(db)
            .await?;
        Ok(DocumentResponse::from_model(model, owner))
    }

    /// Overwrites a document's status. Any status is reachable from any
    /// other; repeating a status is a no-op success.
    #[instrument(skip(self), fields(id = id, status = %status))]
    pub async fn set_status(
        &self,
        id: i64,
        status: DocumentStatus,
    ) -> Result<DocumentResponse, ServiceError> {
        let db = &*self.db_pool;

        let existing = DocumentEntity::find_by_id(id).one(db).await?.ok_or_else(|| {
            warn!(id = id, "document not found for status change");
            ServiceError::NotFound(format!("Document {id} not found"))
        })?;

        let mut active: document::ActiveModel = existing.into();
        active.status = Set(status);
        let model = active.update(db).await?;

        info!(id = id, status = %status, "document status updated");

        let owner = ClientEntity::find()
            .filter(client::Column::Rut.eq(model.client_rut.clone()))
            .one(db)
            .await?;
        Ok(DocumentResponse::from_model(model, owner))
    }

    /// Searches the ledger with AND-combined filters, newest first, capped
    /// at [`MAX_SEARCH_RESULTS`] rows.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        filters: DocumentSearchFilters,
    ) -> Result<Vec<DocumentResponse>, ServiceError> {
        let db = &*self.db_pool;

        let mut query = DocumentEntity::find().find_also_related(ClientEntity);

        if let Some(document_type) = filters.document_type {
            query = query.filter(document::Column::DocumentType.eq(document_type));
        }
        if let Some(status) = filters.status {
            query = query.filter(document::Column::Status.eq(status));
        }
        if let Some(date_from) = filters.date_from {
            query = query.filter(document::Column::IssueDate.gte(date_from));
        }
        if let Some(date_to) = filters.date_to {
            query = query.filter(document::Column::IssueDate.lte(date_to));
        }
        if let Some(project_code) = filters.project_code.filter(|c| !c.is_empty()) {
            query = query.filter(document::Column::ProjectCode.eq(project_code));
        }
        if let Some(account) = filters.account_like.filter(|a| !a.is_empty()) {
            query = query.filter(client::Column::AccountNumber.like(format!("%{account}%")));
        }

        let rows = query
            .order_by_desc(document::Column::IssueDate)
            .order_by_desc(document::Column::Id)
            .limit(MAX_SEARCH_RESULTS)
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(model, owner)| DocumentResponse::from_model(model, owner))
            .collect())
    }

    /// Latest documents of one type, for the issuance screens.
    #[instrument(skip(self))]
    pub async fn recent_by_type(
        &self,
        document_type: DocumentType,
    ) -> Result<Vec<DocumentResponse>, ServiceError> {
        let db = &*self.db_pool;

        let rows = DocumentEntity::find()
            .find_also_related(ClientEntity)
            .filter(document::Column::DocumentType.eq(document_type))
            .order_by_desc(document::Column::IssueDate)
            .order_by_desc(document::Column::Id)
            .limit(RECENT_LIMIT)
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(model, owner)| DocumentResponse::from_model(model, owner))
            .collect())
    }

    /// Latest pending documents, for the dashboard.
    #[instrument(skip(self))]
    pub async fn pending(&self) -> Result<Vec<DocumentResponse>, ServiceError> {
        let db = &*self.db_pool;

        let rows = DocumentEntity::find()
            .find_also_related(ClientEntity)
            .filter(document::Column::Status.eq(DocumentStatus::Pending))
            .order_by_desc(document::Column::IssueDate)
            .order_by_desc(document::Column::Id)
            .limit(PENDING_LIMIT)
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(model, owner)| DocumentResponse::from_model(model, owner))
            .collect())
    }
}
