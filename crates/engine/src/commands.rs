//! Command structs for engine write operations.
//!
//! These types group parameters for member and expense writes, keeping call
//! sites readable and avoiding long argument lists.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::MoneyCents;

/// Register a new member. The code and registration date are assigned by
/// the engine.
#[derive(Clone, Debug, Default)]
pub struct NewMember {
    pub full_name: String,
    pub birth_date: Option<NaiveDate>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl NewMember {
    #[must_use]
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn birth_date(mut self, date: NaiveDate) -> Self {
        self.birth_date = Some(date);
        self
    }

    #[must_use]
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

/// Partial member update. `None` leaves a field untouched; a blank text
/// value clears an optional field. The member code cannot be changed.
#[derive(Clone, Debug, Default)]
pub struct MemberUpdate {
    pub full_name: Option<String>,
    pub birth_date: Option<Option<NaiveDate>>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// Record an expense.
#[derive(Clone, Debug)]
pub struct NewExpense {
    pub occurred_at: DateTime<Utc>,
    pub amount: MoneyCents,
    pub expense_type_id: Option<Uuid>,
    pub description: String,
}

impl NewExpense {
    #[must_use]
    pub fn new(
        occurred_at: DateTime<Utc>,
        amount: MoneyCents,
        description: impl Into<String>,
    ) -> Self {
        Self {
            occurred_at,
            amount,
            expense_type_id: None,
            description: description.into(),
        }
    }

    #[must_use]
    pub fn expense_type_id(mut self, id: Uuid) -> Self {
        self.expense_type_id = Some(id);
        self
    }
}

/// Partial expense update. `expense_type_id: Some(None)` detaches the type.
#[derive(Clone, Debug, Default)]
pub struct ExpenseUpdate {
    pub occurred_at: Option<DateTime<Utc>>,
    pub amount: Option<MoneyCents>,
    pub expense_type_id: Option<Option<Uuid>>,
    pub description: Option<String>,
}
