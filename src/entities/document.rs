use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Chilean tax document classes (SII codes).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    strum::Display, strum::EnumString, utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
pub enum DocumentType {
    /// Factura
    #[sea_orm(string_value = "FAC")]
    #[serde(rename = "FAC")]
    #[strum(serialize = "FAC")]
    Invoice,
    /// Boleta
    #[sea_orm(string_value = "BOL")]
    #[serde(rename = "BOL")]
    #[strum(serialize = "BOL")]
    Receipt,
    /// Nota de débito
    #[sea_orm(string_value = "ND")]
    #[serde(rename = "ND")]
    #[strum(serialize = "ND")]
    DebitNote,
    /// Nota de crédito
    #[sea_orm(string_value = "NC")]
    #[serde(rename = "NC")]
    #[strum(serialize = "NC")]
    CreditNote,
    /// Guía de despacho
    #[sea_orm(string_value = "GD")]
    #[serde(rename = "GD")]
    #[strum(serialize = "GD")]
    DispatchGuide,
}

impl DocumentType {
    /// Types that count toward billing and payment totals.
    pub fn is_revenue(self) -> bool {
        matches!(self, DocumentType::Invoice | DocumentType::Receipt)
    }
}

/// Payment state of an issued document. Any status is reachable from any
/// other; updates are idempotent overwrites.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    strum::Display, strum::EnumString, utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum DocumentStatus {
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "Paid")]
    Paid,
    #[sea_orm(string_value = "Voided")]
    Voided,
    #[sea_orm(string_value = "Applied")]
    Applied,
}

/// Ledger entry for an issued tax document. Appended once at issuance;
/// only `status` changes afterwards.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Business document number, caller-supplied.
    pub document_number: i64,

    pub document_type: DocumentType,
    pub issue_date: NaiveDate,

    /// Issuing party, by normalized RUT.
    pub client_rut: String,

    /// Loose reference; may outlive the project it names.
    pub project_code: Option<String>,

    pub description: Option<String>,

    /// total = net + tax by construction at issuance; not re-validated.
    pub net_amount: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,

    pub status: DocumentStatus,

    /// Forma de pago, e.g. "Contado".
    pub payment_terms: Option<String>,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientRut",
        to = "super::client::Column::Rut"
    )]
    Client,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
