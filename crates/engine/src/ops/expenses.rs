use sea_orm::{ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Expense, ExpenseType, ExpenseUpdate, MonthWindow, NewExpense, ResultEngine,
    expense_types, expenses,
    expenses::validate_amount,
    util::{normalize_name, normalize_required},
};

use super::{Engine, with_tx};

impl Engine {
    /// Adds an expense type. Names are unique ignoring case.
    pub async fn create_expense_type(&self, name: &str) -> ResultEngine<ExpenseType> {
        let name = normalize_required(name, "expense type name")?;
        with_tx!(self, |db_tx| {
            let existing = expense_types::Entity::find()
                .filter(expense_types::Column::NameNorm.eq(normalize_name(&name)))
                .one(&db_tx)
                .await?;
            if let Some(existing) = existing {
                return Err(EngineError::Validation(format!(
                    "expense type '{}' already exists",
                    existing.name
                )));
            }

            let expense_type = ExpenseType {
                id: Uuid::new_v4(),
                name,
            };
            expense_types::ActiveModel::from(&expense_type)
                .insert(&db_tx)
                .await?;
            Ok(expense_type)
        })
    }

    /// Every expense type, by name.
    pub async fn list_expense_types(&self) -> ResultEngine<Vec<ExpenseType>> {
        expense_types::Entity::find()
            .order_by_asc(expense_types::Column::NameNorm)
            .all(&self.database)
            .await?
            .into_iter()
            .map(ExpenseType::try_from)
            .collect()
    }

    pub async fn create_expense(&self, cmd: NewExpense) -> ResultEngine<Expense> {
        let expense = Expense::new(
            cmd.occurred_at,
            cmd.amount,
            cmd.expense_type_id,
            &cmd.description,
        )?;
        with_tx!(self, |db_tx| {
            if let Some(type_id) = expense.expense_type_id {
                ensure_expense_type(&db_tx, type_id).await?;
            }
            expenses::ActiveModel::from(&expense).insert(&db_tx).await?;
            tracing::info!(id = %expense.id, amount = %expense.amount, "expense recorded");
            Ok(expense)
        })
    }

    pub async fn expense(&self, id: Uuid) -> ResultEngine<Expense> {
        expenses::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("expense {id}")))?
            .try_into()
    }

    pub async fn update_expense(&self, id: Uuid, update: ExpenseUpdate) -> ResultEngine<Expense> {
        let mut expense = self.expense(id).await?;
        if let Some(occurred_at) = update.occurred_at {
            expense.occurred_at = occurred_at;
        }
        if let Some(amount) = update.amount {
            validate_amount(amount)?;
            expense.amount = amount;
        }
        if let Some(type_id) = update.expense_type_id {
            expense.expense_type_id = type_id;
        }
        if let Some(description) = update.description {
            expense.description = description.trim().to_string();
        }

        with_tx!(self, |db_tx| {
            if let Some(type_id) = expense.expense_type_id {
                ensure_expense_type(&db_tx, type_id).await?;
            }
            expenses::ActiveModel::from(&expense).update(&db_tx).await?;
            Ok(expense)
        })
    }

    pub async fn delete_expense(&self, id: Uuid) -> ResultEngine<()> {
        let result = expenses::Entity::delete_by_id(id.to_string())
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::NotFound(format!("expense {id}")));
        }
        tracing::info!(%id, "expense deleted");
        Ok(())
    }

    /// Expenses, most recent first, optionally restricted to one month.
    pub async fn list_expenses(&self, window: Option<&MonthWindow>) -> ResultEngine<Vec<Expense>> {
        let mut query = expenses::Entity::find();
        if let Some(window) = window {
            query = query
                .filter(expenses::Column::OccurredAt.gte(window.start))
                .filter(expenses::Column::OccurredAt.lt(window.end));
        }
        query
            .order_by_desc(expenses::Column::OccurredAt)
            .order_by_asc(expenses::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Expense::try_from)
            .collect()
    }
}

async fn ensure_expense_type<C: ConnectionTrait>(db: &C, id: Uuid) -> ResultEngine<()> {
    expense_types::Entity::find_by_id(id.to_string())
        .one(db)
        .await?
        .map(|_| ())
        .ok_or_else(|| EngineError::NotFound(format!("expense type {id}")))
}
