//! Runtime configuration for the CLI.
//!
//! # Invariants
//! - Precedence is flag, then environment variable, then default.
//! - Blank values count as unset at every level.

use crate::cli::Cli;
use booklog_core::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "BOOKLOG_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "BOOKLOG_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "BOOKLOG_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "booklog.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "booklog-logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl AppConfig {
    /// Resolves configuration from process environment.
    pub fn from_cli(cli: &Cli) -> Self {
        Self::resolve(cli, |key| std::env::var(key).ok())
    }

    /// Resolves configuration with an explicit environment lookup.
    pub fn resolve(cli: &Cli, env: impl Fn(&str) -> Option<String>) -> Self {
        let db_path = non_blank_path(cli.db.as_ref())
            .or_else(|| non_blank(env(DB_PATH_ENV)).map(PathBuf::from))
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));

        let log_level = non_blank(cli.log_level.clone())
            .or_else(|| non_blank(env(LOG_LEVEL_ENV)))
            .unwrap_or_else(|| default_log_level().to_string());

        let log_dir = non_blank_path(cli.log_dir.as_ref())
            .or_else(|| non_blank(env(LOG_DIR_ENV)).map(PathBuf::from))
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME));

        Self {
            db_path,
            log_level,
            log_dir,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

fn non_blank_path(value: Option<&PathBuf>) -> Option<PathBuf> {
    value
        .filter(|path| !path.as_os_str().is_empty())
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use crate::cli::Cli;
    use clap::Parser;
    use std::path::PathBuf;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["booklog"];
        argv.extend_from_slice(args);
        argv.push("list");
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn flags_win_over_environment() {
        let config = AppConfig::resolve(
            &cli(&["--db", "/data/flag.sqlite3", "--log-level", "warn"]),
            |key| match key {
                DB_PATH_ENV => Some("/data/env.sqlite3".to_string()),
                LOG_LEVEL_ENV => Some("trace".to_string()),
                _ => None,
            },
        );
        assert_eq!(config.db_path, PathBuf::from("/data/flag.sqlite3"));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn environment_fills_missing_flags() {
        let config = AppConfig::resolve(&cli(&[]), |key| match key {
            DB_PATH_ENV => Some(" /data/env.sqlite3 ".to_string()),
            LOG_DIR_ENV => Some("/var/log/booklog".to_string()),
            _ => None,
        });
        assert_eq!(config.db_path, PathBuf::from("/data/env.sqlite3"));
        assert_eq!(config.log_dir, PathBuf::from("/var/log/booklog"));
    }

    #[test]
    fn blank_environment_falls_back_to_defaults() {
        let config = AppConfig::resolve(&cli(&[]), |_| Some("   ".to_string()));
        assert_eq!(
            config.db_path,
            std::env::temp_dir().join("booklog.sqlite3")
        );
        assert_eq!(config.log_level, booklog_core::default_log_level());
        assert!(config.log_dir.is_absolute());
    }
}
