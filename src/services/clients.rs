use crate::{
    db::DbPool,
    entities::client::{self, Entity as ClientEntity, Model as ClientModel},
    errors::ServiceError,
    rut,
};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Chilean mobile numbers: 9 digits starting with 9, optional +56 prefix.
static CHILEAN_MOBILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\+?56)?9[0-9]{8}$").expect("valid phone pattern"));

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpsertClientRequest {
    #[validate(length(min = 1, message = "RUT is required"))]
    pub rut: String,

    #[validate(length(min = 1, message = "Legal name is required"))]
    pub legal_name: String,

    #[validate(email(message = "A valid email is required"))]
    pub email: String,

    pub business_activity: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub commune: Option<String>,
    pub account_number: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateClientRequest {
    #[validate(length(min = 1, message = "Legal name is required"))]
    pub legal_name: String,

    #[validate(email(message = "A valid email is required"))]
    pub email: String,

    pub business_activity: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub commune: Option<String>,
    pub account_number: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClientResponse {
    pub rut: String,
    pub legal_name: String,
    pub business_activity: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub commune: Option<String>,
    pub account_number: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ClientModel> for ClientResponse {
    fn from(model: ClientModel) -> Self {
        Self {
            rut: model.rut,
            legal_name: model.legal_name,
            business_activity: model.business_activity,
            phone: model.phone,
            email: model.email,
            address: model.address,
            commune: model.commune,
            account_number: model.account_number,
            is_active: model.is_active,
            created_at: model.created_at,
        }
    }
}

/// Normalize a raw phone into `+56 9 XXXX XXXX`.
fn format_phone(raw: &str) -> String {
    let mut digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if let Some(stripped) = digits.strip_prefix("56") {
        digits = stripped.to_string();
    }
    if digits.len() == 9 && digits.starts_with('9') {
        format!("+56 {} {} {}", &digits[..1], &digits[1..5], &digits[5..])
    } else {
        raw.trim().to_string()
    }
}

/// Validate + format an optional phone field.
fn prepare_phone(phone: Option<&str>) -> Result<Option<String>, ServiceError> {
    let raw = match phone.map(str::trim).filter(|p| !p.is_empty()) {
        Some(raw) => raw,
        None => return Ok(None),
    };

    let compact: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '-'))
        .collect();
    if !CHILEAN_MOBILE.is_match(&compact) {
        return Err(ServiceError::ValidationError(
            "Phone must be a Chilean mobile: +56 9 XXXX XXXX".to_string(),
        ));
    }

    Ok(Some(format_phone(raw)))
}

/// Normalize and checksum-validate a RUT, or reject the write.
fn prepare_rut(raw: &str) -> Result<String, ServiceError> {
    rut::normalize(raw)
        .filter(|normalized| rut::validate(normalized))
        .ok_or_else(|| ServiceError::ValidationError(format!("Invalid RUT: {raw}")))
}

/// Service managing billed parties (clients), keyed by normalized RUT.
#[derive(Clone)]
pub struct ClientService {
    db_pool: Arc<DbPool>,
}

impl ClientService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Lists active clients ordered by legal name.
    #[instrument(skip(self))]
    pub async fn list_active(&self) -> Result<Vec<ClientResponse>, ServiceError> {
        let db = &*self.db_pool;

        let clients = ClientEntity::find()
            .filter(client::Column::IsActive.eq(true))
            .order_by_asc(client::Column::LegalName)
            .all(db)
            .await?;

        Ok(clients.into_iter().map(ClientResponse::from).collect())
    }

    /// Creates a client, or updates and reactivates the existing record for
    /// the same normalized RUT.
    #[instrument(skip(self, request), fields(rut = %request.rut))]
    pub async fn upsert(&self, request: UpsertClientRequest) -> Result<ClientResponse, ServiceError> {
        request.validate()?;

        let normalized = prepare_rut(&request.rut)?;
        let phone = prepare_phone(request.phone.as_deref())?;
        let email = request.email.trim().to_lowercase();

        let db = &*self.db_pool;
        let txn = db.begin().await?;

        let existing = ClientEntity::find()
            .filter(client::Column::Rut.eq(normalized.clone()))
            .one(&txn)
            .await?;

        let model = match existing {
            Some(model) => {
                let mut active: client::ActiveModel = model.into();
                active.legal_name = Set(request.legal_name);
                active.business_activity = Set(request.business_activity);
                active.phone = Set(phone);
                active.email = Set(Some(email));
                active.address = Set(request.address);
                active.commune = Set(request.commune);
                active.account_number = Set(request.account_number);
                active.is_active = Set(true);
                active.update(&txn).await.map_err(ServiceError::write_error)?
            }
            None => {
                let active = client::ActiveModel {
                    rut: Set(normalized.clone()),
                    legal_name: Set(request.legal_name),
                    business_activity: Set(request.business_activity),
                    phone: Set(phone),
                    email: Set(Some(email)),
                    address: Set(request.address),
                    commune: Set(request.commune),
                    account_number: Set(request.account_number),
                    is_active: Set(true),
                    created_at: Set(Utc::now()),
                    ..Default::default()
                };
                active.insert(&txn).await.map_err(ServiceError::write_error)?
            }
        };

        txn.commit().await?;

        info!(rut = %normalized, "client upserted");
        Ok(ClientResponse::from(model))
    }

    /// Updates an existing client by RUT; reactivates it as a side effect.
    #[instrument(skip(self, request), fields(rut = %raw_rut))]
    pub async fn update(
        &self,
        raw_rut: &str,
        request: UpdateClientRequest,
    ) -> Result<ClientResponse, ServiceError> {
        request.validate()?;

        let normalized = prepare_rut(raw_rut)?;
        let phone = prepare_phone(request.phone.as_deref())?;
        let email = request.email.trim().to_lowercase();

        let db = &*self.db_pool;

        let existing = ClientEntity::find()
            .filter(client::Column::Rut.eq(normalized.clone()))
            .one(db)
            .await?
            .ok_or_else(|| {
                warn!(rut = %normalized, "client not found for update");
                ServiceError::NotFound(format!("Client {normalized} not found"))
            })?;

        let mut active: client::ActiveModel = existing.into();
        active.legal_name = Set(request.legal_name);
        active.business_activity = Set(request.business_activity);
        active.phone = Set(phone);
        active.email = Set(Some(email));
        active.address = Set(request.address);
        active.commune = Set(request.commune);
        active.account_number = Set(request.account_number);
        active.is_active = Set(true);

        let model = active.update(db).await.map_err(ServiceError::write_error)?;

        Ok(ClientResponse::from(model))
    }

    /// Soft-deletes a client by clearing its active flag.
    #[instrument(skip(self), fields(rut = %raw_rut))]
    pub async fn deactivate(&self, raw_rut: &str) -> Result<(), ServiceError> {
        let normalized = rut::normalize(raw_rut)
            .ok_or_else(|| ServiceError::ValidationError("RUT is required".to_string()))?;

        let db = &*self.db_pool;

        let existing = ClientEntity::find()
            .filter(client::Column::Rut.eq(normalized.clone()))
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Client {normalized} not found")))?;

        let mut active: client::ActiveModel = existing.into();
        active.is_active = Set(false);
        active.update(db).await?;

        info!(rut = %normalized, "client deactivated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_bare_mobile_numbers() {
        assert_eq!(format_phone("912345678"), "+56 9 1234 5678");
        assert_eq!(format_phone("+56912345678"), "+56 9 1234 5678");
        assert_eq!(format_phone("56 9 1234 5678"), "+56 9 1234 5678");
    }

    #[test]
    fn accepts_and_formats_valid_phones() {
        assert_eq!(
            prepare_phone(Some("912345678")).unwrap().as_deref(),
            Some("+56 9 1234 5678")
        );
        assert_eq!(prepare_phone(Some("  ")).unwrap(), None);
        assert_eq!(prepare_phone(None).unwrap(), None);
    }

    #[test]
    fn rejects_non_chilean_mobiles() {
        assert!(prepare_phone(Some("123456")).is_err());
        assert!(prepare_phone(Some("812345678")).is_err());
        assert!(prepare_phone(Some("+1 555 0100")).is_err());
    }

    #[test]
    fn prepare_rut_normalizes_and_validates() {
        assert_eq!(prepare_rut("76.660.180-4").unwrap(), "76660180-4");
        assert!(prepare_rut("76660180-5").is_err());
        assert!(prepare_rut("").is_err());
    }
}
