//! Command handlers. Each one drives the engine and prints JSON on stdout.

use std::io::{Read, Write};

use chrono::Utc;
use engine::{
    Engine, ExpenseUpdate, MemberUpdate, NewExpense, NewMember, PaymentProvider,
    TransactionListFilter, WebhookEvent, members_csv, members_csv_file_name, start_of_day,
};
use mercadopago::MercadoPagoClient;
use serde::Serialize;

use crate::{
    cli::{
        AuthCommand, Command, ExpenseCommand, ExpenseTypeCommand, MemberCommand, PaymentCommand,
        ReportCommand, TransactionCommand,
    },
    error::{AppError, Result},
    prompt,
    settings::Settings,
};

pub async fn run(engine: &Engine, settings: &Settings, command: Command) -> Result<()> {
    match command {
        Command::Member(member) => run_member(engine, member.command).await,
        Command::Webhook(args) => {
            let payload = if args.payload.as_os_str() == "-" {
                let mut buf = Vec::new();
                std::io::stdin().read_to_end(&mut buf)?;
                buf
            } else {
                std::fs::read(&args.payload)?
            };
            let event = WebhookEvent::from_slice(&payload)?;
            let provider = provider(settings)?;
            print_json(&engine.handle_webhook(&event, &provider).await?)
        }
        Command::Payment(payment) => match payment.command {
            PaymentCommand::Ingest { payment_id } => {
                let provider = provider(settings)?;
                let notification = provider.fetch_payment(&payment_id).await?;
                print_json(&engine.ingest_payment(notification).await?)
            }
        },
        Command::Transaction(tx) => run_transaction(engine, tx.command).await,
        Command::ExpenseType(expense_type) => match expense_type.command {
            ExpenseTypeCommand::Add { name } => {
                print_json(&engine.create_expense_type(&name).await?)
            }
            ExpenseTypeCommand::List => print_json(&engine.list_expense_types().await?),
        },
        Command::Expense(expense) => run_expense(engine, expense.command).await,
        Command::Report(report) => run_report(engine, report.command).await,
        Command::Auth(auth) => run_auth(settings, auth.command),
    }
}

async fn run_member(engine: &Engine, command: MemberCommand) -> Result<()> {
    match command {
        MemberCommand::Add(args) => {
            let cmd = NewMember {
                full_name: args.name,
                birth_date: args.birth_date,
                phone: args.phone,
                email: args.email,
                address: args.address,
            };
            print_json(&engine.create_member(cmd).await?)
        }
        MemberCommand::List => print_json(&engine.list_members().await?),
        MemberCommand::Show { id } => print_json(&engine.member(id).await?),
        MemberCommand::Update(args) => {
            let birth_date = if args.clear_birth_date {
                Some(None)
            } else {
                args.birth_date.map(Some)
            };
            let update = MemberUpdate {
                full_name: args.name,
                birth_date,
                phone: args.phone,
                email: args.email,
                address: args.address,
            };
            print_json(&engine.update_member(args.id, update).await?)
        }
        MemberCommand::Delete { id } => {
            engine.delete_member(id).await?;
            print_json(&serde_json::json!({ "deleted": id }))
        }
        MemberCommand::ExportCsv { output } => {
            let members = engine.list_members().await?;
            let bytes = members_csv(&members)?;
            let path = output.join(members_csv_file_name(Utc::now().date_naive()));
            std::fs::write(&path, bytes)?;
            tracing::info!(path = %path.display(), members = members.len(), "registry exported");
            println!("{}", path.display());
            Ok(())
        }
    }
}

async fn run_transaction(engine: &Engine, command: TransactionCommand) -> Result<()> {
    match command {
        TransactionCommand::List { status } => {
            let filter = TransactionListFilter {
                status: status.map(Into::into),
            };
            print_json(&engine.list_transactions(&filter).await?)
        }
        TransactionCommand::Show { id } => print_json(&engine.transaction(id).await?),
        TransactionCommand::Confirm { id, kind } => {
            print_json(&engine.confirm_transaction(id, &kind).await?)
        }
    }
}

async fn run_expense(engine: &Engine, command: ExpenseCommand) -> Result<()> {
    match command {
        ExpenseCommand::Add(args) => {
            let date = args.date.unwrap_or_else(|| Utc::now().date_naive());
            let mut cmd = NewExpense::new(start_of_day(date), args.amount, args.description);
            if let Some(type_id) = args.type_id {
                cmd = cmd.expense_type_id(type_id);
            }
            print_json(&engine.create_expense(cmd).await?)
        }
        ExpenseCommand::List { month } => {
            let window = month.window()?;
            print_json(&engine.list_expenses(window.as_ref()).await?)
        }
        ExpenseCommand::Update(args) => {
            let expense_type_id = if args.clear_type {
                Some(None)
            } else {
                args.type_id.map(Some)
            };
            let update = ExpenseUpdate {
                occurred_at: args.date.map(start_of_day),
                amount: args.amount,
                expense_type_id,
                description: args.description,
            };
            print_json(&engine.update_expense(args.id, update).await?)
        }
        ExpenseCommand::Delete { id } => {
            engine.delete_expense(id).await?;
            print_json(&serde_json::json!({ "deleted": id }))
        }
    }
}

async fn run_report(engine: &Engine, command: ReportCommand) -> Result<()> {
    match command {
        ReportCommand::Entries { month } => {
            print_json(&engine.entries_report(&month.window()?).await?)
        }
        ReportCommand::Expenses { month } => {
            print_json(&engine.expenses_report(&month.window()?).await?)
        }
        ReportCommand::Final {
            month,
            prior_balance,
        } => print_json(&engine.final_report(&month.window()?, prior_balance).await?),
        ReportCommand::Dashboard => print_json(&engine.dashboard(Utc::now()).await?),
    }
}

fn run_auth(settings: &Settings, command: AuthCommand) -> Result<()> {
    let credentials = settings
        .credentials()?
        .ok_or_else(|| AppError::Usage("no [auth] section configured".to_string()))?;
    match command {
        AuthCommand::Login { username } => {
            let password = prompt::password("Password: ")?;
            print_json(&credentials.login(&username, &password)?)
        }
        AuthCommand::Verify { authorization } => {
            credentials.verify_bearer(Some(&authorization))?;
            print_json(&serde_json::json!({ "authorized": true }))
        }
    }
}

fn provider(settings: &Settings) -> Result<MercadoPagoClient> {
    let mp = settings
        .mercadopago
        .as_ref()
        .ok_or_else(|| AppError::Usage("no [mercadopago] section configured".to_string()))?;
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;
    Ok(MercadoPagoClient::new(
        client,
        mp.base_url.clone(),
        mp.access_token.clone(),
    ))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}
