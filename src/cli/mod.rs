//! CLI interface and argument parsing

use crate::config::DEFAULT_CONFIG_PATH;
use clap::Parser;

/// bq-backup - export yesterday's BigQuery tables to Cloud Storage
#[derive(Parser, Debug)]
#[command(name = "bq-backup")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, env = "BQ_BACKUP_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(short, long, env = "BQ_BACKUP_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_config() {
        std::env::remove_var("BQ_BACKUP_CONFIG");
        let cli = Cli::parse_from(["bq-backup"]);
        assert_eq!(cli.config, "/etc/bq-backup/config.toml");
    }

    #[test]
    fn test_cli_short_config_flag() {
        let cli = Cli::parse_from(["bq-backup", "-c", "custom.toml"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_long_config_flag() {
        let cli = Cli::parse_from(["bq-backup", "--config", "/tmp/bq.toml"]);
        assert_eq!(cli.config, "/tmp/bq.toml");
    }

    #[test]
    fn test_cli_log_level() {
        let cli = Cli::parse_from(["bq-backup", "--log-level", "debug"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_rejects_unknown_flag() {
        assert!(Cli::try_parse_from(["bq-backup", "--dataset", "a"]).is_err());
    }
}
