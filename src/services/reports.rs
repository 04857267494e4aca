use crate::{
    db::DbPool,
    entities::{
        client::{self, Entity as ClientEntity},
        document::{self, DocumentStatus, DocumentType, Entity as DocumentEntity},
        project::{self, Entity as ProjectEntity, ProjectStatus},
    },
    errors::ServiceError,
};
use chrono::Datelike;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

/// Outstanding debt of one client: every Pending document counts,
/// regardless of type.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClientDebt {
    pub rut: String,
    pub legal_name: String,
    pub document_count: i64,
    pub total_debt: Decimal,
}

/// Sales of one month for one revenue document type.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MonthlySales {
    /// `YYYY-MM`
    pub month: String,
    pub document_type: DocumentType,
    pub document_count: i64,
    pub total_sales: Decimal,
}

/// A client ranked by non-voided invoice/receipt billing.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TopClient {
    pub rut: String,
    pub legal_name: String,
    pub document_count: i64,
    pub total_billed: Decimal,
    pub total_paid: Decimal,
    pub total_pending: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AnnualMonth {
    pub year: i32,
    pub month: u32,
    pub document_count: i64,
    pub total_sales: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AnnualSummary {
    pub year: i32,
    pub document_count: i64,
    pub total_sales: Decimal,
    pub total_paid: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AnnualRollup {
    pub monthly: Vec<AnnualMonth>,
    pub yearly: Vec<AnnualSummary>,
}

/// Headline numbers for the dashboard.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardSummary {
    /// Sum of all Pending document totals.
    pub total_debt: Decimal,
    pub active_clients: u64,
    pub active_projects: u64,
    pub pending_documents: u64,
}

const TOP_CLIENTS_LIMIT: usize = 10;

/// Cross-project and cross-client aggregations over the document ledger.
/// Voided documents are excluded from sales figures; revenue figures only
/// count invoices and receipts.
#[derive(Clone)]
pub struct ReportService {
    db_pool: Arc<DbPool>,
}

impl ReportService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Pending debt grouped by active client, positive balances only,
    /// largest debt first.
    #[instrument(skip(self))]
    pub async fn debt_by_client(&self) -> Result<Vec<ClientDebt>, ServiceError> {
        let db = &*self.db_pool;

        let rows = DocumentEntity::find()
            .find_also_related(ClientEntity)
            .filter(document::Column::Status.eq(DocumentStatus::Pending))
            .all(db)
            .await?;

        let mut debts: HashMap<String, (String, i64, Decimal)> = HashMap::new();
        for (doc, owner) in rows {
            let owner = match owner {
                Some(owner) if owner.is_active => owner,
                _ => continue,
            };
            let entry = debts
                .entry(doc.client_rut.clone())
                .or_insert((owner.legal_name, 0, Decimal::ZERO));
            entry.1 += 1;
            entry.2 += doc.total_amount;
        }

        let mut result: Vec<ClientDebt> = debts
            .into_iter()
            .filter(|(_, (_, _, total))| *total > Decimal::ZERO)
            .map(|(rut, (legal_name, count, total))| ClientDebt {
                rut,
                legal_name,
                document_count: count,
                total_debt: total,
            })
            .collect();

        result.sort_by(|a, b| b.total_debt.cmp(&a.total_debt));
        Ok(result)
    }

    /// Revenue per month and document type, most recent month first.
    #[instrument(skip(self))]
    pub async fn monthly_sales(&self) -> Result<Vec<MonthlySales>, ServiceError> {
        let docs = self.revenue_documents().await?;

        let mut months: BTreeMap<(String, String), (DocumentType, i64, Decimal)> = BTreeMap::new();
        for doc in docs {
            let month = doc.issue_date.format("%Y-%m").to_string();
            let entry = months
                .entry((month, doc.document_type.to_string()))
                .or_insert((doc.document_type, 0, Decimal::ZERO));
            entry.1 += 1;
            entry.2 += doc.total_amount;
        }

        Ok(months
            .into_iter()
            .rev()
            .map(|((month, _), (document_type, count, total))| MonthlySales {
                month,
                document_type,
                document_count: count,
                total_sales: total,
            })
            .collect())
    }

    /// Top clients by billing, with paid/pending breakdowns.
    #[instrument(skip(self))]
    pub async fn top_clients(&self) -> Result<Vec<TopClient>, ServiceError> {
        let db = &*self.db_pool;

        let rows = DocumentEntity::find()
            .find_also_related(ClientEntity)
            .filter(document::Column::DocumentType.is_in([
                DocumentType::Invoice,
                DocumentType::Receipt,
            ]))
            .filter(document::Column::Status.ne(DocumentStatus::Voided))
            .all(db)
            .await?;

        let mut clients: HashMap<String, (String, i64, Decimal, Decimal, Decimal)> =
            HashMap::new();
        for (doc, owner) in rows {
            let owner = match owner {
                Some(owner) if owner.is_active => owner,
                _ => continue,
            };
            let entry = clients.entry(doc.client_rut.clone()).or_insert((
                owner.legal_name,
                0,
                Decimal::ZERO,
                Decimal::ZERO,
                Decimal::ZERO,
            ));
            entry.1 += 1;
            entry.2 += doc.total_amount;
            match doc.status {
                DocumentStatus::Paid => entry.3 += doc.total_amount,
                DocumentStatus::Pending => entry.4 += doc.total_amount,
                _ => {}
            }
        }

        let mut result: Vec<TopClient> = clients
            .into_iter()
            .filter(|(_, (_, _, billed, _, _))| *billed > Decimal::ZERO)
            .map(|(rut, (legal_name, count, billed, paid, pending))| TopClient {
                rut,
                legal_name,
                document_count: count,
                total_billed: billed,
                total_paid: paid,
                total_pending: pending,
            })
            .collect();

        result.sort_by(|a, b| b.total_billed.cmp(&a.total_billed));
        result.truncate(TOP_CLIENTS_LIMIT);
        Ok(result)
    }

    /// Per-month and per-year revenue rollups.
    #[instrument(skip(self))]
    pub async fn annual_rollup(&self) -> Result<AnnualRollup, ServiceError> {
        let docs = self.revenue_documents().await?;

        let mut monthly: BTreeMap<(i32, u32), (i64, Decimal)> = BTreeMap::new();
        let mut yearly: BTreeMap<i32, (i64, Decimal, Decimal)> = BTreeMap::new();

        for doc in docs {
            let year = doc.issue_date.year();
            let month = doc.issue_date.month();

            let month_entry = monthly.entry((year, month)).or_insert((0, Decimal::ZERO));
            month_entry.0 += 1;
            month_entry.1 += doc.total_amount;

            let year_entry = yearly
                .entry(year)
                .or_insert((0, Decimal::ZERO, Decimal::ZERO));
            year_entry.0 += 1;
            year_entry.1 += doc.total_amount;
            if doc.status == DocumentStatus::Paid {
                year_entry.2 += doc.total_amount;
            }
        }

        Ok(AnnualRollup {
            monthly: monthly
                .into_iter()
                .map(|((year, month), (count, total))| AnnualMonth {
                    year,
                    month,
                    document_count: count,
                    total_sales: total,
                })
                .collect(),
            yearly: yearly
                .into_iter()
                .map(|(year, (count, total, paid))| AnnualSummary {
                    year,
                    document_count: count,
                    total_sales: total,
                    total_paid: paid,
                })
                .collect(),
        })
    }

    /// Headline totals for the dashboard.
    #[instrument(skip(self))]
    pub async fn dashboard_summary(&self) -> Result<DashboardSummary, ServiceError> {
        let db = &*self.db_pool;

        let pending_docs = DocumentEntity::find()
            .filter(document::Column::Status.eq(DocumentStatus::Pending))
            .all(db)
            .await?;
        let total_debt: Decimal = pending_docs.iter().map(|doc| doc.total_amount).sum();
        let pending_documents = pending_docs.len() as u64;

        let active_clients = ClientEntity::find()
            .filter(client::Column::IsActive.eq(true))
            .count(db)
            .await?;

        let active_projects = ProjectEntity::find()
            .filter(project::Column::Status.eq(ProjectStatus::Active))
            .count(db)
            .await?;

        Ok(DashboardSummary {
            total_debt,
            active_clients,
            active_projects,
            pending_documents,
        })
    }

    /// Non-voided invoices and receipts, the base set for revenue reports.
    async fn revenue_documents(&self) -> Result<Vec<document::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(DocumentEntity::find()
            .filter(document::Column::DocumentType.is_in([
                DocumentType::Invoice,
                DocumentType::Receipt,
            ]))
            .filter(document::Column::Status.ne(DocumentStatus::Voided))
            .all(db)
            .await?)
    }
}
