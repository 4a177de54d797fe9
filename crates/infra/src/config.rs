//! Configuration loading and representation.
//!
//! Everything has a default; the environment can override any of it and the
//! command line overrides the environment.

use std::path::PathBuf;

use thiserror::Error;

use milkstock_observability::LogFormat;

use crate::report::{ReportOptions, DEFAULT_EXPORT_RECENT};

pub const ENV_DATA_FILE: &str = "MILKSTOCK_DATA_FILE";
pub const ENV_EXPORT_FILE: &str = "MILKSTOCK_EXPORT_FILE";
pub const ENV_BACKUP_FILE: &str = "MILKSTOCK_BACKUP_FILE";
pub const ENV_REPORT_TOP: &str = "MILKSTOCK_REPORT_TOP";
pub const ENV_REPORT_RECENT: &str = "MILKSTOCK_REPORT_RECENT";
pub const ENV_EXPORT_RECENT: &str = "MILKSTOCK_EXPORT_RECENT";
pub const ENV_LOG_FORMAT: &str = "MILKSTOCK_LOG_FORMAT";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid value '{value}' for {key}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Movement log.
    pub data_file: PathBuf,
    /// Summary CSV written by `export`.
    pub export_file: PathBuf,
    /// JSON backup written by `backup`.
    pub backup_file: PathBuf,
    pub report: ReportOptions,
    pub export_recent: usize,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("leite_estoque.csv"),
            export_file: PathBuf::from("resumo_leite_estoque.csv"),
            backup_file: PathBuf::from("leite_estoque_backup.json"),
            report: ReportOptions::default(),
            export_recent: DEFAULT_EXPORT_RECENT,
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Defaults overridden by `MILKSTOCK_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(ENV_DATA_FILE) {
            config.data_file = PathBuf::from(v);
        }
        if let Some(v) = get(ENV_EXPORT_FILE) {
            config.export_file = PathBuf::from(v);
        }
        if let Some(v) = get(ENV_BACKUP_FILE) {
            config.backup_file = PathBuf::from(v);
        }
        if let Some(v) = get(ENV_REPORT_TOP) {
            config.report.top_n = parse_count(ENV_REPORT_TOP, &v)?;
        }
        if let Some(v) = get(ENV_REPORT_RECENT) {
            config.report.recent = parse_count(ENV_REPORT_RECENT, &v)?;
        }
        if let Some(v) = get(ENV_EXPORT_RECENT) {
            config.export_recent = parse_count(ENV_EXPORT_RECENT, &v)?;
        }
        if let Some(v) = get(ENV_LOG_FORMAT) {
            config.log_format = v.parse().map_err(|e: milkstock_observability::UnknownLogFormat| ConfigError {
                key: ENV_LOG_FORMAT,
                value: v.clone(),
                reason: e.to_string(),
            })?;
        }

        Ok(config)
    }
}

fn parse_count(key: &'static str, raw: &str) -> Result<usize, ConfigError> {
    raw.trim().parse::<usize>().map_err(|e| ConfigError {
        key,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_the_classic_file_names() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.data_file, PathBuf::from("leite_estoque.csv"));
        assert_eq!(config.export_file, PathBuf::from("resumo_leite_estoque.csv"));
        assert_eq!(config.report, ReportOptions { top_n: 5, recent: 5 });
        assert_eq!(config.export_recent, 10);
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = Config::from_lookup(lookup(&[
            (ENV_DATA_FILE, "/var/lib/milk/log.csv"),
            (ENV_REPORT_TOP, "3"),
            (ENV_EXPORT_RECENT, "20"),
            (ENV_LOG_FORMAT, "json"),
            (ENV_BACKUP_FILE, "  "),
        ]))
        .unwrap();
        assert_eq!(config.data_file, PathBuf::from("/var/lib/milk/log.csv"));
        assert_eq!(config.report.top_n, 3);
        assert_eq!(config.export_recent, 20);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.backup_file, PathBuf::from("leite_estoque_backup.json"));
    }

    #[test]
    fn bad_numbers_and_formats_are_reported_with_their_key() {
        let err = Config::from_lookup(lookup(&[(ENV_REPORT_RECENT, "five")])).unwrap_err();
        assert_eq!(err.key, ENV_REPORT_RECENT);
        assert_eq!(err.value, "five");

        let err = Config::from_lookup(lookup(&[(ENV_LOG_FORMAT, "xml")])).unwrap_err();
        assert_eq!(err.key, ENV_LOG_FORMAT);
    }
}
