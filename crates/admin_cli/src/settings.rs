//! Settings for the admin tool, read from `settings.toml` and overridden by
//! `TESOURARIA__*` environment variables (`TESOURARIA__APP__LEVEL=debug`).
//!
//! ```toml
//! [app]
//! level = "info"
//!
//! [database]
//! sqlite = "tesouraria.db"
//!
//! [mercadopago]
//! access_token = "APP_USR-..."
//!
//! [auth]
//! api_key = "..."
//! username = "tesoureiro"
//! password = "..."
//! ```
use config::{Config, Environment, File};
use engine::Credentials;
use serde::Deserialize;

use crate::error::{AppError, Result};

const DEFAULT_CONFIG_PATH: &str = "settings";
const ENV_PREFIX: &str = "TESOURARIA";
const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Default for Database {
    fn default() -> Self {
        Self::Sqlite("tesouraria.db".to_string())
    }
}

impl Database {
    pub fn url(&self) -> String {
        match self {
            Database::Memory => String::from("sqlite::memory:"),
            Database::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MercadoPago {
    pub access_token: String,
    #[serde(default = "default_mercadopago_url")]
    pub base_url: String,
}

fn default_mercadopago_url() -> String {
    mercadopago::DEFAULT_BASE_URL.to_string()
}

#[derive(Debug, Deserialize)]
pub struct Auth {
    pub api_key: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    #[serde(default)]
    pub database: Database,
    pub mercadopago: Option<MercadoPago>,
    pub auth: Option<Auth>,
}

impl Settings {
    /// Loads `path` (or `./settings.toml` when present) and the environment,
    /// then validates the result.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let file = match path {
            Some(path) => File::with_name(path),
            None => File::with_name(DEFAULT_CONFIG_PATH).required(false),
        };
        let settings: Settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if !LEVELS.contains(&self.app.level.as_str()) {
            return Err(AppError::Settings(format!(
                "app.level must be one of {}, got {:?}",
                LEVELS.join(", "),
                self.app.level
            )));
        }
        if let Database::Sqlite(path) = &self.database
            && path.trim().is_empty()
        {
            return Err(AppError::Settings(
                "database.sqlite must not be empty".to_string(),
            ));
        }
        if let Some(mp) = &self.mercadopago {
            if mp.access_token.trim().is_empty() {
                return Err(AppError::Settings(
                    "mercadopago.access_token must not be empty".to_string(),
                ));
            }
            if !(mp.base_url.starts_with("https://") || mp.base_url.starts_with("http://")) {
                return Err(AppError::Settings(format!(
                    "mercadopago.base_url must be an http(s) URL, got {:?}",
                    mp.base_url
                )));
            }
        }
        self.credentials()?;
        Ok(())
    }

    /// The configured login, if any.
    pub fn credentials(&self) -> Result<Option<Credentials>> {
        self.auth
            .as_ref()
            .map(|auth| Credentials::new(&auth.api_key, &auth.username, &auth.password))
            .transpose()
            .map_err(|err| AppError::Settings(format!("auth: {err}")))
    }

    /// The tracing filter for this tool and the crates it drives.
    pub fn log_filter(&self) -> String {
        format!(
            "tesouraria_admin={level},engine={level},mercadopago={level}",
            level = self.app.level
        )
    }
}
