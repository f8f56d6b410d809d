//! Expense categories ("Rent", "Utilities", ...).
//!
//! Names are unique per registry, compared after [`normalize_name`].
//!
//! [`normalize_name`]: crate::util::normalize_name

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError,
    util::{normalize_name, parse_uuid},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseType {
    pub id: Uuid,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expense_types")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub name_norm: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::expenses::Entity")]
    Expenses,
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&ExpenseType> for ActiveModel {
    fn from(expense_type: &ExpenseType) -> Self {
        Self {
            id: ActiveValue::Set(expense_type.id.to_string()),
            name: ActiveValue::Set(expense_type.name.clone()),
            name_norm: ActiveValue::Set(normalize_name(&expense_type.name)),
        }
    }
}

impl TryFrom<Model> for ExpenseType {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "expense type")?,
            name: model.name,
        })
    }
}
