use chrono::{DateTime, Utc};
use sea_orm::{QueryFilter, prelude::*};
use serde::Serialize;

use crate::{
    Entry, Expense, MoneyCents, MonthWindow, ResultEngine,
    aggregator::{self, EntriesReport, ExpensesReport, FinalReport, Snapshot},
    entry, expenses,
};

use super::Engine;

/// A report together with the month it covers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MonthlyReport<T> {
    pub period: MonthWindow,
    #[serde(flatten)]
    pub report: T,
}

impl<T> MonthlyReport<T> {
    fn new(period: &MonthWindow, report: T) -> Self {
        Self {
            period: *period,
            report,
        }
    }
}

impl Engine {
    /// Entries of the month with the code of the member each came from.
    pub async fn entries_report(
        &self,
        window: &MonthWindow,
    ) -> ResultEngine<MonthlyReport<EntriesReport>> {
        let entries = self.list_entries(window).await?;
        let members = self.list_members().await?;
        Ok(MonthlyReport::new(
            window,
            aggregator::entries_report(&entries, &members),
        ))
    }

    pub async fn expenses_report(
        &self,
        window: &MonthWindow,
    ) -> ResultEngine<MonthlyReport<ExpensesReport>> {
        let expenses = self.list_expenses(Some(window)).await?;
        let expense_types = self.list_expense_types().await?;
        Ok(MonthlyReport::new(
            window,
            aggregator::expenses_report(&expenses, &expense_types),
        ))
    }

    /// Month closing: totals plus the balance carried in from the previous
    /// month. `prior_balance` is supplied by the operator.
    pub async fn final_report(
        &self,
        window: &MonthWindow,
        prior_balance: MoneyCents,
    ) -> ResultEngine<MonthlyReport<FinalReport>> {
        let entries = self.list_entries(window).await?;
        let expenses = self.list_expenses(Some(window)).await?;
        let expense_types = self.list_expense_types().await?;
        let report =
            aggregator::final_monthly_report(prior_balance, &entries, &expenses, &expense_types);
        tracing::debug!(
            period = %window.label(),
            balance = %report.balance_to_carry_forward,
            "final report computed"
        );
        Ok(MonthlyReport::new(window, report))
    }

    /// Month-to-date totals and counters.
    pub async fn dashboard(&self, now: DateTime<Utc>) -> ResultEngine<Snapshot> {
        let month_start = MonthWindow::containing(now)?.start;

        let entries = entry::Entity::find()
            .filter(entry::Column::OccurredAt.gte(month_start))
            .filter(entry::Column::OccurredAt.lte(now))
            .all(&self.database)
            .await?
            .into_iter()
            .map(Entry::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        let expenses = expenses::Entity::find()
            .filter(expenses::Column::OccurredAt.gte(month_start))
            .filter(expenses::Column::OccurredAt.lte(now))
            .all(&self.database)
            .await?
            .into_iter()
            .map(Expense::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;

        let pending = self.pending_count().await?;
        let members = self.member_count().await?;
        aggregator::dashboard_snapshot(now, &entries, &expenses, pending, members)
    }
}
