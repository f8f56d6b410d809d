//! The module contains the `Entry` type: a confirmed inflow.
//!
//! Entries are never entered by hand. Each one comes from confirming a
//! payment [`Transaction`](crate::Transaction) and keeps a back-reference
//! to it.
use std::fmt;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine, util::parse_uuid};

/// Category assigned by the operator when confirming a payment.
///
/// `tithe` and `offering` are recognized; any other non-empty label is
/// kept verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EntryKind {
    Tithe,
    Offering,
    Other(String),
}

impl EntryKind {
    pub fn parse(value: &str) -> ResultEngine<Self> {
        let trimmed = value.trim();
        match trimmed {
            "" => Err(EngineError::Validation(
                "entry kind must not be empty".to_string(),
            )),
            "tithe" => Ok(Self::Tithe),
            "offering" => Ok(Self::Offering),
            other => Ok(Self::Other(other.to_string())),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Tithe => "tithe",
            Self::Offering => "offering",
            Self::Other(label) => label,
        }
    }

    /// Label with the first letter of every word upper-cased and the rest
    /// lower-cased (`"special offering"` -> `"Special Offering"`).
    #[must_use]
    pub fn title(&self) -> String {
        let mut out = String::with_capacity(self.as_str().len());
        let mut at_word_start = true;
        for ch in self.as_str().chars() {
            if ch.is_alphabetic() {
                if at_word_start {
                    out.extend(ch.to_uppercase());
                } else {
                    out.extend(ch.to_lowercase());
                }
                at_word_start = false;
            } else {
                out.push(ch);
                at_word_start = true;
            }
        }
        out
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for EntryKind {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EntryKind> for String {
    fn from(kind: EntryKind) -> Self {
        kind.as_str().to_string()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub amount: MoneyCents,
    pub kind: EntryKind,
    pub description: String,
    pub member_id: Option<Uuid>,
    pub transaction_id: Uuid,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub occurred_at: DateTimeUtc,
    pub amount_minor: i64,
    pub kind: String,
    pub description: String,
    pub member_id: Option<String>,
    pub transaction_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::transactions::Entity",
        from = "Column::TransactionId",
        to = "super::transactions::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Entry> for ActiveModel {
    fn from(entry: &Entry) -> Self {
        Self {
            id: ActiveValue::Set(entry.id.to_string()),
            occurred_at: ActiveValue::Set(entry.occurred_at),
            amount_minor: ActiveValue::Set(entry.amount.cents()),
            kind: ActiveValue::Set(entry.kind.as_str().to_string()),
            description: ActiveValue::Set(entry.description.clone()),
            member_id: ActiveValue::Set(entry.member_id.map(|id| id.to_string())),
            transaction_id: ActiveValue::Set(entry.transaction_id.to_string()),
        }
    }
}

impl TryFrom<Model> for Entry {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "entry")?,
            occurred_at: model.occurred_at,
            amount: MoneyCents::new(model.amount_minor),
            kind: EntryKind::parse(&model.kind)?,
            description: model.description,
            member_id: model
                .member_id
                .as_deref()
                .map(|id| parse_uuid(id, "member"))
                .transpose()?,
            transaction_id: parse_uuid(&model.transaction_id, "transaction")?,
        })
    }
}
