//! Manually entered outflows.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub amount: MoneyCents,
    pub expense_type_id: Option<Uuid>,
    pub description: String,
}

impl Expense {
    pub fn new(
        occurred_at: DateTime<Utc>,
        amount: MoneyCents,
        expense_type_id: Option<Uuid>,
        description: &str,
    ) -> ResultEngine<Self> {
        validate_amount(amount)?;
        Ok(Self {
            id: Uuid::new_v4(),
            occurred_at,
            amount,
            expense_type_id,
            description: description.trim().to_string(),
        })
    }
}

pub(crate) fn validate_amount(amount: MoneyCents) -> ResultEngine<()> {
    if !amount.is_positive() {
        return Err(EngineError::Validation(
            "expense amount must be > 0".to_string(),
        ));
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub occurred_at: DateTimeUtc,
    pub amount_minor: i64,
    pub expense_type_id: Option<String>,
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::expense_types::Entity",
        from = "Column::ExpenseTypeId",
        to = "super::expense_types::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    ExpenseTypes,
}

impl Related<super::expense_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExpenseTypes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            occurred_at: ActiveValue::Set(expense.occurred_at),
            amount_minor: ActiveValue::Set(expense.amount.cents()),
            expense_type_id: ActiveValue::Set(expense.expense_type_id.map(|id| id.to_string())),
            description: ActiveValue::Set(expense.description.clone()),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "expense")?,
            occurred_at: model.occurred_at,
            amount: MoneyCents::new(model.amount_minor),
            expense_type_id: model
                .expense_type_id
                .as_deref()
                .map(|id| parse_uuid(id, "expense type"))
                .transpose()?,
            description: model.description,
        })
    }
}
