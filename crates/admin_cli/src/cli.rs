use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use engine::{MoneyCents, MonthWindow, TransactionStatus};
use uuid::Uuid;

use crate::error::Result;

#[derive(Parser, Debug)]
#[command(name = "tesouraria_admin")]
#[command(about = "Treasury back-office: members, payments, expenses and monthly reports")]
pub struct Cli {
    /// Settings file (TOML). Defaults to `./settings.toml` when present.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Database connection string; overrides the configured database.
    #[arg(long, env = "DATABASE_URL", global = true)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Member registry.
    Member(Member),
    /// Process a Mercado Pago webhook delivery.
    Webhook(WebhookArgs),
    /// Fetch and store one payment directly.
    Payment(Payment),
    /// Received payments awaiting or past confirmation.
    Transaction(Transaction),
    #[command(name = "expense-type")]
    ExpenseType(ExpenseType),
    Expense(Expense),
    /// Monthly reports and the dashboard, printed as JSON.
    Report(Report),
    /// Operator authentication.
    Auth(Auth),
}

#[derive(Args, Debug)]
pub struct Member {
    #[command(subcommand)]
    pub command: MemberCommand,
}

#[derive(Subcommand, Debug)]
pub enum MemberCommand {
    Add(MemberAddArgs),
    List,
    Show { id: Uuid },
    Update(MemberUpdateArgs),
    Delete { id: Uuid },
    /// Write the registry as `members_YYYYMMDD.csv`.
    ExportCsv {
        /// Output directory.
        #[arg(long, default_value = ".")]
        output: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct MemberAddArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub birth_date: Option<NaiveDate>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
}

#[derive(Args, Debug)]
pub struct MemberUpdateArgs {
    pub id: Uuid,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long, conflicts_with = "clear_birth_date")]
    pub birth_date: Option<NaiveDate>,
    #[arg(long)]
    pub clear_birth_date: bool,
    /// An empty value clears the phone.
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
}

#[derive(Args, Debug)]
pub struct WebhookArgs {
    /// JSON body of the delivery; `-` reads standard input.
    #[arg(long)]
    pub payload: PathBuf,
}

#[derive(Args, Debug)]
pub struct Payment {
    #[command(subcommand)]
    pub command: PaymentCommand,
}

#[derive(Subcommand, Debug)]
pub enum PaymentCommand {
    Ingest {
        #[arg(long)]
        payment_id: String,
    },
}

#[derive(Args, Debug)]
pub struct Transaction {
    #[command(subcommand)]
    pub command: TransactionCommand,
}

#[derive(Subcommand, Debug)]
pub enum TransactionCommand {
    List {
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
    },
    Show { id: Uuid },
    /// Confirm with an entry kind (`tithe`, `offering`, or any other label).
    Confirm {
        id: Uuid,
        #[arg(long)]
        kind: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StatusArg {
    Pending,
    Confirmed,
}

impl From<StatusArg> for TransactionStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Pending => TransactionStatus::Pending,
            StatusArg::Confirmed => TransactionStatus::Confirmed,
        }
    }
}

#[derive(Args, Debug)]
pub struct ExpenseType {
    #[command(subcommand)]
    pub command: ExpenseTypeCommand,
}

#[derive(Subcommand, Debug)]
pub enum ExpenseTypeCommand {
    Add { name: String },
    List,
}

#[derive(Args, Debug)]
pub struct Expense {
    #[command(subcommand)]
    pub command: ExpenseCommand,
}

#[derive(Subcommand, Debug)]
pub enum ExpenseCommand {
    Add(ExpenseAddArgs),
    List {
        #[command(flatten)]
        month: OptionalMonth,
    },
    Update(ExpenseUpdateArgs),
    Delete { id: Uuid },
}

#[derive(Args, Debug)]
pub struct ExpenseAddArgs {
    /// Amount, e.g. `120.50`.
    #[arg(long)]
    pub amount: MoneyCents,
    #[arg(long)]
    pub description: String,
    /// Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long)]
    pub type_id: Option<Uuid>,
}

#[derive(Args, Debug)]
pub struct ExpenseUpdateArgs {
    pub id: Uuid,
    #[arg(long)]
    pub amount: Option<MoneyCents>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long, conflicts_with = "clear_type")]
    pub type_id: Option<Uuid>,
    #[arg(long)]
    pub clear_type: bool,
}

#[derive(Args, Debug)]
pub struct Report {
    #[command(subcommand)]
    pub command: ReportCommand,
}

#[derive(Subcommand, Debug)]
pub enum ReportCommand {
    Entries {
        #[command(flatten)]
        month: MonthArgs,
    },
    Expenses {
        #[command(flatten)]
        month: MonthArgs,
    },
    /// Month closing with the balance carried from the previous month.
    Final {
        #[command(flatten)]
        month: MonthArgs,
        #[arg(long, default_value = "0")]
        prior_balance: MoneyCents,
    },
    /// Month-to-date totals.
    Dashboard,
}

/// `--year`/`--month`, defaulting to the current month.
#[derive(Args, Debug)]
pub struct MonthArgs {
    #[arg(long)]
    pub year: Option<i32>,
    #[arg(long)]
    pub month: Option<u32>,
}

impl MonthArgs {
    pub fn window(&self) -> Result<MonthWindow> {
        let current = MonthWindow::containing(Utc::now())?;
        Ok(MonthWindow::new(
            self.year.unwrap_or(current.year),
            self.month.unwrap_or(current.month),
        )?)
    }
}

/// Month filter; without `--year`/`--month` nothing is filtered.
#[derive(Args, Debug)]
pub struct OptionalMonth {
    #[arg(long, requires = "month")]
    pub year: Option<i32>,
    #[arg(long, requires = "year")]
    pub month: Option<u32>,
}

impl OptionalMonth {
    pub fn window(&self) -> Result<Option<MonthWindow>> {
        match (self.year, self.month) {
            (Some(year), Some(month)) => Ok(Some(MonthWindow::new(year, month)?)),
            _ => Ok(None),
        }
    }
}

#[derive(Args, Debug)]
pub struct Auth {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    /// Prompt for the password and print the session token.
    Login {
        #[arg(long)]
        username: String,
    },
    /// Check an `Authorization` header value.
    Verify {
        #[arg(long)]
        authorization: String,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn expense_amount_is_parsed_as_money() {
        let cli = Cli::try_parse_from([
            "tesouraria_admin",
            "expense",
            "add",
            "--amount",
            "120,50",
            "--description",
            "Light bill",
        ])
        .unwrap();
        let Command::Expense(Expense {
            command: ExpenseCommand::Add(args),
        }) = cli.command
        else {
            panic!("expected expense add");
        };
        assert_eq!(args.amount, MoneyCents::new(12050));
        assert_eq!(args.date, None);
    }

    #[test]
    fn oversized_prior_balance_is_rejected() {
        let result = Cli::try_parse_from([
            "tesouraria_admin",
            "report",
            "final",
            "--prior-balance",
            "92233720368547758",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn month_without_year_uses_current_year() {
        let args = MonthArgs {
            year: None,
            month: Some(2),
        };
        let window = args.window().unwrap();
        assert_eq!(window.month, 2);
        assert!(
            MonthArgs {
                year: Some(2024),
                month: Some(13)
            }
            .window()
            .is_err()
        );
    }
}
