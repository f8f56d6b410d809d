//! Back-office engine for membership and treasury records.
//!
//! Payments reported by the provider are stored as pending transactions and
//! attributed to members by name ([`matcher`]). Confirming a transaction
//! books an [`Entry`]; expenses are typed by the operator. Monthly figures
//! come from the pure functions in [`aggregator`], fed by [`Engine`].

pub use auth::{Credentials, LoginResponse, SessionUser};
pub use commands::{ExpenseUpdate, MemberUpdate, NewExpense, NewMember};
pub use entry::{Entry, EntryKind};
pub use error::{EngineError, ErrorKind};
pub use expense_types::ExpenseType;
pub use expenses::Expense;
pub use export::{members_csv, members_csv_file_name};
pub use members::{Member, MemberCode};
pub use money::MoneyCents;
pub use ops::{Engine, EngineBuilder, MonthlyReport, TransactionListFilter};
pub use period::{MonthWindow, start_of_day};
pub use provider::{PaymentNotification, PaymentProvider};
pub use transactions::{Transaction, TransactionStatus};
pub use webhook::{WebhookEvent, WebhookOutcome};

pub mod aggregator;
mod auth;
mod commands;
mod counters;
mod entry;
mod error;
mod expense_types;
mod expenses;
mod export;
pub mod matcher;
mod members;
mod money;
mod ops;
mod period;
mod provider;
mod transactions;
mod util;
mod webhook;

type ResultEngine<T> = Result<T, EngineError>;
