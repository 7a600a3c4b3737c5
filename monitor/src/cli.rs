//! CLI module for health-monitor
//!
//! Every option is a flag backed by an environment variable; flags win.

use clap::Parser;
use health_monitor_common::config::{
    parse_duration, DatabaseConfig, MonitorConfig, DEFAULT_CHECK_CONCURRENCY,
    DEFAULT_CHECK_INTERVAL, DEFAULT_CHECK_TIMEOUT,
};
use std::ffi::OsString;
use std::time::Duration;

/// Environment variables backing the command-line options
pub const ENV_VARS: &[&str] = &[
    "POSTGRES_HOST",
    "POSTGRES_USER",
    "POSTGRES_PASSWORD",
    "POSTGRES_DB",
    "DATABASE_URL",
    "HOST",
    "PORT",
    "CHECK_INTERVAL",
    "CHECK_TIMEOUT",
    "CHECK_CONCURRENCY",
];

/// Feed health monitor - periodically probes registered feed URLs
#[derive(Parser, Debug, Clone)]
#[command(name = "health-monitor")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    RUST_LOG                Log filter (default: info)
    LOG_DIR                 Also write daily-rolling log files to this directory
"#)]
pub struct Cli {
    /// PostgreSQL host
    #[arg(long, default_value = "postgres", env = "POSTGRES_HOST")]
    pub postgres_host: String,

    /// PostgreSQL user
    #[arg(long, default_value = "postgres", env = "POSTGRES_USER")]
    pub postgres_user: String,

    /// PostgreSQL password
    #[arg(
        long,
        default_value = "postgres",
        env = "POSTGRES_PASSWORD",
        hide_env_values = true
    )]
    pub postgres_password: String,

    /// PostgreSQL database name
    #[arg(long, default_value = "feeds", env = "POSTGRES_DB")]
    pub postgres_db: String,

    /// Full connection URL; overrides the POSTGRES_* options
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Bind address
    #[arg(long, default_value = "0.0.0.0", env = "HOST")]
    pub host: String,

    /// Listen port
    #[arg(short, long, default_value = "8080", env = "PORT")]
    pub port: u16,

    /// Time between check cycles (e.g. "30s", "1m30s")
    #[arg(long, default_value = DEFAULT_CHECK_INTERVAL, env = "CHECK_INTERVAL", value_parser = duration_arg)]
    pub check_interval: Duration,

    /// Per-probe timeout
    #[arg(long, default_value = DEFAULT_CHECK_TIMEOUT, env = "CHECK_TIMEOUT", value_parser = duration_arg)]
    pub check_timeout: Duration,

    /// Maximum number of probes in flight at once
    #[arg(
        long,
        default_value_t = DEFAULT_CHECK_CONCURRENCY,
        env = "CHECK_CONCURRENCY",
        value_parser = concurrency_arg
    )]
    pub check_concurrency: usize,
}

impl Cli {
    /// Parse the process arguments, treating blank environment values as unset.
    pub fn load() -> Self {
        clear_blank_env();
        Self::parse()
    }

    /// Like [`Cli::load`], but with explicit arguments and no exit on error.
    pub fn try_load_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        clear_blank_env();
        Self::try_parse_from(args)
    }

    /// Convert parsed arguments into the runtime configuration.
    pub fn into_config(self) -> MonitorConfig {
        MonitorConfig {
            host: self.host,
            port: self.port,
            check_interval: self.check_interval,
            check_timeout: self.check_timeout,
            check_concurrency: self.check_concurrency,
            database: DatabaseConfig {
                url: self.database_url.filter(|url| !url.trim().is_empty()),
                host: self.postgres_host,
                user: self.postgres_user,
                password: self.postgres_password,
                name: self.postgres_db,
            },
        }
    }
}

/// `KEY=` in the environment falls back to the option's default.
fn clear_blank_env() {
    for key in ENV_VARS {
        if matches!(std::env::var(key), Ok(value) if value.trim().is_empty()) {
            std::env::remove_var(key);
        }
    }
}

fn duration_arg(value: &str) -> Result<Duration, String> {
    parse_duration(value).map_err(|e| e.to_string())
}

fn concurrency_arg(value: &str) -> Result<usize, String> {
    match value.trim().parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}
