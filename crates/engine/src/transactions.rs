//! Payment transaction primitives.
//!
//! A `Transaction` records one payment notification received from the
//! provider. It starts `pending` and only changes when an operator confirms
//! it, which also produces an [`Entry`](crate::Entry).

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, EntryKind, MemberCode, MoneyCents, util::parse_uuid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Confirmed,
}

impl TransactionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
        }
    }
}

impl TryFrom<&str> for TransactionStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            other => Err(EngineError::Validation(format!(
                "invalid transaction status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    /// Payment id assigned by the provider.
    pub external_id: String,
    pub amount: MoneyCents,
    pub occurred_at: DateTime<Utc>,
    pub payer_name: String,
    pub payer_email: Option<String>,
    /// Status as reported by the provider (`approved`, `pending`, ...).
    pub provider_status: Option<String>,
    pub payment_method: Option<String>,
    pub description: Option<String>,
    pub status: TransactionStatus,
    pub kind: Option<EntryKind>,
    pub linked: bool,
    pub member_id: Option<Uuid>,
    pub member_code: Option<MemberCode>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub external_id: String,
    pub amount_minor: i64,
    pub occurred_at: DateTimeUtc,
    pub payer_name: String,
    pub payer_email: Option<String>,
    pub provider_status: Option<String>,
    pub payment_method: Option<String>,
    pub description: Option<String>,
    pub status: String,
    pub kind: Option<String>,
    pub linked: bool,
    pub member_id: Option<String>,
    pub member_code: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::entry::Entity")]
    Entries,
}

impl Related<super::entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            external_id: ActiveValue::Set(tx.external_id.clone()),
            amount_minor: ActiveValue::Set(tx.amount.cents()),
            occurred_at: ActiveValue::Set(tx.occurred_at),
            payer_name: ActiveValue::Set(tx.payer_name.clone()),
            payer_email: ActiveValue::Set(tx.payer_email.clone()),
            provider_status: ActiveValue::Set(tx.provider_status.clone()),
            payment_method: ActiveValue::Set(tx.payment_method.clone()),
            description: ActiveValue::Set(tx.description.clone()),
            status: ActiveValue::Set(tx.status.as_str().to_string()),
            kind: ActiveValue::Set(tx.kind.as_ref().map(|k| k.as_str().to_string())),
            linked: ActiveValue::Set(tx.linked),
            member_id: ActiveValue::Set(tx.member_id.map(|id| id.to_string())),
            member_code: ActiveValue::Set(tx.member_code.map(|code| code.to_string())),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "transaction")?,
            external_id: model.external_id,
            amount: MoneyCents::new(model.amount_minor),
            occurred_at: model.occurred_at,
            payer_name: model.payer_name,
            payer_email: model.payer_email,
            provider_status: model.provider_status,
            payment_method: model.payment_method,
            description: model.description,
            status: TransactionStatus::try_from(model.status.as_str())?,
            kind: model.kind.as_deref().map(EntryKind::parse).transpose()?,
            linked: model.linked,
            member_id: model
                .member_id
                .as_deref()
                .map(|id| parse_uuid(id, "member"))
                .transpose()?,
            member_code: model
                .member_code
                .as_deref()
                .map(str::parse::<MemberCode>)
                .transpose()?,
        })
    }
}
