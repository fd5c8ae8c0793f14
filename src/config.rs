use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Process configuration. Built once in `main` and carried in `AppState`.
#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub storage_backend: StorageBackend,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub uploads_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub api_rps: u32,
    /// Single source of truth for accounts that register as admins.
    pub admin_emails: Vec<String>,
    pub allow_duplicate_applications: bool,
    pub chat_reply_delay_ms: u64,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_address: "0.0.0.0:5000".to_string(),
            storage_backend: StorageBackend::Postgres,
            database_url: None,
            database_max_connections: 10,
            uploads_dir: PathBuf::from("./uploads"),
            max_upload_bytes: 10 * 1024 * 1024,
            api_rps: 100,
            admin_emails: Vec::new(),
            allow_duplicate_applications: true,
            chat_reply_delay_ms: 1000,
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        let defaults = Self::default();

        let storage_backend: StorageBackend =
            get_env_parse_or("STORAGE_BACKEND", defaults.storage_backend)?;
        let database_url = env::var("DATABASE_URL").ok().filter(|v| !v.is_empty());
        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            return Err(Error::Config(
                "Missing environment variable: DATABASE_URL".to_string(),
            ));
        }

        Ok(Self {
            server_address: env::var("SERVER_ADDRESS").unwrap_or(defaults.server_address),
            storage_backend,
            database_url,
            database_max_connections: get_env_parse_or(
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            )?,
            uploads_dir: env::var("UPLOADS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.uploads_dir),
            max_upload_bytes: get_env_parse_or("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            api_rps: get_env_parse_or("API_RPS", defaults.api_rps)?,
            admin_emails: env::var("ADMIN_EMAILS")
                .map(|raw| parse_email_list(&raw))
                .unwrap_or_default(),
            allow_duplicate_applications: get_env_parse_or(
                "ALLOW_DUPLICATE_APPLICATIONS",
                defaults.allow_duplicate_applications,
            )?,
            chat_reply_delay_ms: get_env_parse_or(
                "CHAT_REPLY_DELAY_MS",
                defaults.chat_reply_delay_ms,
            )?,
            log_format: get_env_parse_or("LOG_FORMAT", defaults.log_format)?,
        })
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        self.admin_emails
            .iter()
            .any(|admin| admin.eq_ignore_ascii_case(email.trim()))
    }
}

fn parse_email_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|e| e.trim().to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        _ => Ok(default),
    }
}
