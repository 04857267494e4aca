use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A billed party (company or person), keyed by normalized RUT.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Normalized tax identifier, `body-checkDigit`.
    #[sea_orm(unique)]
    pub rut: String,

    pub legal_name: String,

    /// Line of business (giro).
    pub business_activity: Option<String>,

    /// Chilean mobile, stored formatted `+56 9 XXXX XXXX`.
    pub phone: Option<String>,

    /// Stored lowercased.
    pub email: Option<String>,

    pub address: Option<String>,
    pub commune: Option<String>,

    /// Current-account number used by ledger searches.
    pub account_number: Option<String>,

    /// Soft-delete flag; deactivated clients are hidden, never removed.
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
