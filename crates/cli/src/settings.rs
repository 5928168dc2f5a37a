//! CLI configuration
//!
//! Settings come from an optional TOML file (`--config`, else `./myco.toml`
//! when present) layered under `MYCO_*` environment variables.

use anyhow::Result;
use config::{Config, Environment, File as ConfigFile};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_CONFIG_FILE: &str = "myco.toml";
const DEFAULT_LOG_LEVEL: &str = "warn";
const DEFAULT_LOG_FORMAT: &str = "pretty";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub log_level: String,
    pub log_format: String,
}

impl AppConfig {
    pub fn load(config_path_override: Option<&Path>) -> Result<Self> {
        let resolved_path = match config_path_override {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!(
                        "Configuration file {} not found (specified via --config)",
                        path.display()
                    );
                }
                Some(path.to_path_buf())
            }
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                path.exists().then_some(path)
            }
        };

        let mut builder = Config::builder();
        if let Some(path) = &resolved_path {
            builder = builder.add_source(ConfigFile::from(path.as_path()));
        }
        builder = builder.add_source(Environment::with_prefix("MYCO"));
        let config = builder.build()?;

        let data_dir = get_string_value(&config, &["data_dir", "DATA_DIR"])
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);
        let log_level = get_string_value(&config, &["log_level", "LOG_LEVEL"])
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        let log_format = get_string_value(&config, &["log_format", "LOG_FORMAT"])
            .unwrap_or_else(|| DEFAULT_LOG_FORMAT.to_string());

        Ok(Self {
            data_dir,
            log_level,
            log_format,
        })
    }

    pub fn ledger_db_path(&self) -> PathBuf {
        self.data_dir.join("ledger")
    }
}

/// `<platform data dir>/myco`, or `./data/myco` when none is known.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("myco"))
        .unwrap_or_else(|| PathBuf::from("./data/myco"))
}

fn get_string_value(config: &Config, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        config
            .get_string(key)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
pub fn init_logging(config: &AppConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    // Logs go to stderr so command output on stdout stays valid JSON.
    if config.log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_values_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "data_dir = \"/tmp/myco-test\"").unwrap();
        writeln!(file, "log_level = \"debug\"").unwrap();
        writeln!(file, "log_format = \"json\"").unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/myco-test"));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, "json");
        assert_eq!(config.ledger_db_path(), PathBuf::from("/tmp/myco-test/ledger"));
    }

    #[test]
    fn missing_override_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(AppConfig::load(Some(&missing)).is_err());
    }
}
