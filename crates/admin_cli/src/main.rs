use std::process::ExitCode;

use clap::Parser;
use migration::{Migrator, MigratorTrait};

use crate::{cli::Cli, error::Result, settings::Settings};

mod cli;
mod commands;
mod error;
mod prompt;
mod settings;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter())
        .with_writer(std::io::stderr)
        .init();

    let url = cli
        .database_url
        .clone()
        .unwrap_or_else(|| settings.database.url());
    let db = connect_db(&url).await?;
    let engine = engine::Engine::builder().database(db).build().await?;

    commands::run(&engine, &settings, cli.command).await
}

async fn connect_db(url: &str) -> Result<sea_orm::DatabaseConnection> {
    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    tracing::debug!("database ready");
    Ok(database)
}
