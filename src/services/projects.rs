use crate::{
    db::DbPool,
    entities::{
        client::{self, Entity as ClientEntity},
        project::{self, Entity as ProjectEntity, Model as ProjectModel, ProjectStatus},
    },
    errors::ServiceError,
    rut,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpsertProjectRequest {
    #[validate(length(min = 1, message = "Project code is required"))]
    pub code: String,

    #[validate(length(min = 1, message = "Project name is required"))]
    pub name: String,

    pub description: Option<String>,

    #[validate(length(min = 1, message = "Client RUT is required"))]
    pub client_rut: String,

    /// Defaults to zero when omitted; must be non-negative.
    pub budget: Option<Decimal>,

    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,

    /// Defaults to Active.
    pub status: Option<ProjectStatus>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProjectResponse {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub client_rut: String,
    /// Legal name of the owning client, when it still exists.
    pub client_name: Option<String>,
    pub budget: Decimal,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
}

impl ProjectResponse {
    fn from_model(model: ProjectModel, client_name: Option<String>) -> Self {
        Self {
            code: model.code,
            name: model.name,
            description: model.description,
            client_rut: model.client_rut,
            client_name,
            budget: model.budget,
            start_date: model.start_date,
            end_date: model.end_date,
            status: model.status,
            created_at: model.created_at,
        }
    }
}

/// Service managing client projects, keyed by unique code.
#[derive(Clone)]
pub struct ProjectService {
    db_pool: Arc<DbPool>,
}

impl ProjectService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Lists every project with its owning client's legal name, most recent
    /// start date first.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<ProjectResponse>, ServiceError> {
        let db = &*self.db_pool;

        let rows = ProjectEntity::find()
            .find_also_related(ClientEntity)
            .order_by_desc(project::Column::StartDate)
            .order_by_desc(project::Column::Id)
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(model, owner)| {
                ProjectResponse::from_model(model, owner.map(|c| c.legal_name))
            })
            .collect())
    }

    /// Creates a project, or updates the existing record with the same code.
    #[instrument(skip(self, request), fields(code = %request.code))]
    pub async fn upsert(
        &self,
        request: UpsertProjectRequest,
    ) -> Result<ProjectResponse, ServiceError> {
        request.validate()?;
        let (client_rut, budget, status) = self.prepare(&request).await?;

        let db = &*self.db_pool;
        let txn = db.begin().await?;

        let existing = ProjectEntity::find()
            .filter(project::Column::Code.eq(request.code.clone()))
            .one(&txn)
            .await?;

        let model = match existing {
            Some(model) => {
                let mut active: project::ActiveModel = model.into();
                active.name = Set(request.name);
                active.description = Set(request.description);
                active.client_rut = Set(client_rut);
                active.budget = Set(budget);
                active.start_date = Set(request.start_date);
                active.end_date = Set(request.end_date);
                active.status = Set(status);
                active.update(&txn).await.map_err(ServiceError::write_error)?
            }
            None => {
                let active = project::ActiveModel {
                    code: Set(request.code.clone()),
                    name: Set(request.name),
                    description: Set(request.description),
                    client_rut: Set(client_rut),
                    budget: Set(budget),
                    start_date: Set(request.start_date),
                    end_date: Set(request.end_date),
                    status: Set(status),
                    created_at: Set(Utc::now()),
                    ..Default::default()
                };
                active.insert(&txn).await.map_err(ServiceError::write_error)?
            }
        };

        txn.commit().await?;

        info!(code = %model.code, "project upserted");
        let client_name = self.owner_name(&model.client_rut).await?;
        Ok(ProjectResponse::from_model(model, client_name))
    }

    /// Updates an existing project by code; fails with NotFound otherwise.
    #[instrument(skip(self, request), fields(code = %code))]
    pub async fn update(
        &self,
        code: &str,
        request: UpsertProjectRequest,
    ) -> Result<ProjectResponse, ServiceError> {
        request.validate()?;
        let (client_rut, budget, status) = self.prepare(&request).await?;

        let db = &*self.db_pool;

        let existing = ProjectEntity::find()
            .filter(project::Column::Code.eq(code))
            .one(db)
            .await?
            .ok_or_else(|| {
                warn!(code = %code, "project not found for update");
                ServiceError::NotFound(format!("Project {code} not found"))
            })?;

        let mut active: project::ActiveModel = existing.into();
        active.name = Set(request.name);
        active.description = Set(request.description);
        active.client_rut = Set(client_rut);
        active.budget = Set(budget);
        active.start_date = Set(request.start_date);
        active.end_date = Set(request.end_date);
        active.status = Set(status);

        let model = active.update(db).await.map_err(ServiceError::write_error)?;

        let client_name = self.owner_name(&model.client_rut).await?;
        Ok(ProjectResponse::from_model(model, client_name))
    }

    /// Hard-deletes a project by code (admin operation). Its documents keep
    /// their dangling project reference for historical integrity.
    #[instrument(skip(self), fields(code = %code))]
    pub async fn delete(&self, code: &str) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let result = ProjectEntity::delete_many()
            .filter(project::Column::Code.eq(code))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("Project {code} not found")));
        }

        info!(code = %code, "project deleted");
        Ok(())
    }

    /// Shared validation for upsert/update: RUT gate, client existence,
    /// budget sign, defaults.
    async fn prepare(
        &self,
        request: &UpsertProjectRequest,
    ) -> Result<(String, Decimal, ProjectStatus), ServiceError> {
        let client_rut = rut::normalize(&request.client_rut)
            .filter(|normalized| rut::validate(normalized))
            .ok_or_else(|| {
                ServiceError::ValidationError(format!(
                    "Invalid client RUT: {}",
                    request.client_rut
                ))
            })?;

        let db = &*self.db_pool;
        let owner = ClientEntity::find()
            .filter(client::Column::Rut.eq(client_rut.clone()))
            .one(db)
            .await?;
        if owner.is_none() {
            return Err(ServiceError::NotFound(format!(
                "Client {client_rut} does not exist"
            )));
        }

        let budget = request.budget.unwrap_or(Decimal::ZERO);
        if budget < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Budget must be non-negative".to_string(),
            ));
        }

        Ok((client_rut, budget, request.status.unwrap_or(ProjectStatus::Active)))
    }

    async fn owner_name(&self, client_rut: &str) -> Result<Option<String>, ServiceError> {
        let db = &*self.db_pool;
        Ok(ClientEntity::find()
            .filter(client::Column::Rut.eq(client_rut))
            .one(db)
            .await?
            .map(|c| c.legal_name))
    }
}
