//! Monthly financial aggregation.
//!
//! Pure functions over entries and expenses that were already selected for
//! a period (see [`MonthWindow`](crate::MonthWindow)). Sums are exact cents;
//! empty inputs give zero totals.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{Entry, EntryKind, Expense, ExpenseType, Member, MoneyCents, MonthWindow, ResultEngine};

/// Placeholder for entries without a member in the entries report.
pub const NO_MEMBER: &str = "N/A";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub total_entries: MoneyCents,
    pub tithes: MoneyCents,
    pub offerings: MoneyCents,
    pub total_expenses: MoneyCents,
    /// `total_entries - total_expenses`.
    pub balance: MoneyCents,
}

/// One row of an itemized expense listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExpenseLine {
    pub date: NaiveDate,
    /// Name of the expense type, empty when the expense has none.
    pub expense_type: String,
    pub description: String,
    pub amount: MoneyCents,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FinalReport {
    pub prior_balance: MoneyCents,
    pub total_entries: MoneyCents,
    /// `prior_balance + total_entries`.
    pub entries_with_carry_forward: MoneyCents,
    pub total_expenses: MoneyCents,
    /// `entries_with_carry_forward - total_expenses`.
    pub balance_to_carry_forward: MoneyCents,
    pub expenses: Vec<ExpenseLine>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    #[serde(flatten)]
    pub totals: Totals,
    pub pending_transactions: u64,
    pub total_members: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EntryLine {
    pub date: NaiveDate,
    pub member_code: String,
    pub kind: EntryKind,
    pub amount: MoneyCents,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EntriesReport {
    pub lines: Vec<EntryLine>,
    pub total: MoneyCents,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExpensesReport {
    pub lines: Vec<ExpenseLine>,
    pub total: MoneyCents,
}

pub fn monthly_totals(entries: &[Entry], expenses: &[Expense]) -> Totals {
    let mut totals = Totals::default();
    for entry in entries {
        totals.total_entries += entry.amount;
        match entry.kind {
            EntryKind::Tithe => totals.tithes += entry.amount,
            EntryKind::Offering => totals.offerings += entry.amount,
            EntryKind::Other(_) => {}
        }
    }
    totals.total_expenses = expenses.iter().map(|e| e.amount).sum();
    totals.balance = totals.total_entries - totals.total_expenses;
    totals
}

/// Combines the month totals with the balance carried from the previous
/// period.
pub fn final_monthly_report(
    prior_balance: MoneyCents,
    entries: &[Entry],
    expenses: &[Expense],
    expense_types: &[ExpenseType],
) -> FinalReport {
    let totals = monthly_totals(entries, expenses);
    let entries_with_carry_forward = prior_balance + totals.total_entries;
    FinalReport {
        prior_balance,
        total_entries: totals.total_entries,
        entries_with_carry_forward,
        total_expenses: totals.total_expenses,
        balance_to_carry_forward: entries_with_carry_forward - totals.total_expenses,
        expenses: expense_lines(expenses, expense_types),
    }
}

/// Totals from the first instant of the month containing `now` up to and
/// including `now`. Records outside that range are ignored.
pub fn dashboard_snapshot(
    now: DateTime<Utc>,
    entries: &[Entry],
    expenses: &[Expense],
    pending_transactions: u64,
    total_members: u64,
) -> ResultEngine<Snapshot> {
    let month_start = MonthWindow::containing(now)?.start;
    let in_range = |ts: DateTime<Utc>| month_start <= ts && ts <= now;

    let entries: Vec<Entry> = entries
        .iter()
        .filter(|e| in_range(e.occurred_at))
        .cloned()
        .collect();
    let expenses: Vec<Expense> = expenses
        .iter()
        .filter(|e| in_range(e.occurred_at))
        .cloned()
        .collect();

    Ok(Snapshot {
        totals: monthly_totals(&entries, &expenses),
        pending_transactions,
        total_members,
    })
}

pub fn entries_report(entries: &[Entry], members: &[Member]) -> EntriesReport {
    let codes: HashMap<Uuid, String> = members.iter().map(|m| (m.id, m.code.to_string())).collect();
    let lines = entries
        .iter()
        .map(|entry| EntryLine {
            date: entry.occurred_at.date_naive(),
            member_code: entry
                .member_id
                .and_then(|id| codes.get(&id).cloned())
                .unwrap_or_else(|| NO_MEMBER.to_string()),
            kind: entry.kind.clone(),
            amount: entry.amount,
        })
        .collect();
    EntriesReport {
        lines,
        total: entries.iter().map(|e| e.amount).sum(),
    }
}

pub fn expenses_report(expenses: &[Expense], expense_types: &[ExpenseType]) -> ExpensesReport {
    ExpensesReport {
        lines: expense_lines(expenses, expense_types),
        total: expenses.iter().map(|e| e.amount).sum(),
    }
}

fn expense_lines(expenses: &[Expense], expense_types: &[ExpenseType]) -> Vec<ExpenseLine> {
    let names: HashMap<Uuid, &str> = expense_types
        .iter()
        .map(|t| (t.id, t.name.as_str()))
        .collect();
    expenses
        .iter()
        .map(|expense| ExpenseLine {
            date: expense.occurred_at.date_naive(),
            expense_type: expense
                .expense_type_id
                .and_then(|id| names.get(&id).copied())
                .unwrap_or_default()
                .to_string(),
            description: expense.description.clone(),
            amount: expense.amount,
        })
        .collect()
}
