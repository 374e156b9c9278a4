//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::BackupConfig;
use super::secret::secret_string;
use crate::domain::errors::BackupError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "/etc/bq-backup/config.toml";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into [`BackupConfig`]
/// 4. Applies environment variable overrides (BQ_BACKUP_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`BackupError::ConfigNotFound`] if the file does not exist and
/// [`BackupError::ConfigParse`] for every other problem.
///
/// # Examples
///
/// ```no_run
/// use bq_backup::config::load_config;
///
/// let config = load_config("/etc/bq-backup/config.toml").expect("Failed to load config");
/// println!("{} datasets configured", config.datasets.len());
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<BackupConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(BackupError::ConfigNotFound(path.to_path_buf()));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        BackupError::ConfigParse(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: BackupConfig = toml::from_str(&contents)?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        BackupError::ConfigParse(format!("Configuration validation failed: {e}"))
    })?;

    tracing::debug!(
        path = %path.display(),
        project = %config.project,
        datasets = config.datasets.len(),
        notifications = config.slack.is_some(),
        "Configuration loaded"
    );

    Ok(config)
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("env var pattern is a valid regex")
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comments, whole-line or trailing, are copied through untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = env_var_pattern();
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let (code, comment) = line.split_at(trailing_comment_start(line));
        let mut processed_line = code.to_string();
        for cap in re.captures_iter(code) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&cap[0], &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push_str(comment);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(BackupError::ConfigParse(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Byte offset of a trailing `#` comment, or the line length if there is none
///
/// A `#` inside a basic (`"..."`) or literal (`'...'`) string does not start
/// a comment.
fn trailing_comment_start(line: &str) -> usize {
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (index, c) in line.char_indices() {
        match quote {
            Some('"') if escaped => escaped = false,
            Some('"') if c == '\\' => escaped = true,
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '#' => return index,
            None => {}
        }
    }

    line.len()
}

/// Applies environment variable overrides using the BQ_BACKUP_* prefix
///
/// Unparseable numeric values are ignored with a warning.
fn apply_env_overrides(config: &mut BackupConfig) {
    if let Ok(val) = std::env::var("BQ_BACKUP_PROJECT") {
        config.project = val;
    }
    if let Ok(val) = std::env::var("BQ_BACKUP_LOG_LEVEL") {
        config.log_level = val;
    }
    if let Ok(val) = std::env::var("BQ_BACKUP_JOB_WAIT") {
        match val.parse() {
            Ok(secs) => config.job_wait = Some(secs),
            Err(_) => tracing::warn!(value = %val, "Ignoring invalid BQ_BACKUP_JOB_WAIT"),
        }
    }
    if let Ok(val) = std::env::var("BQ_BACKUP_POLL_INTERVAL") {
        match val.parse() {
            Ok(secs) => config.poll_interval = Some(secs),
            Err(_) => tracing::warn!(value = %val, "Ignoring invalid BQ_BACKUP_POLL_INTERVAL"),
        }
    }

    // Slack overrides only apply when the section exists; the webhook alone
    // is not enough to enable notifications.
    if let Some(ref mut slack) = config.slack {
        if let Ok(val) = std::env::var("BQ_BACKUP_SLACK_CHANNEL") {
            slack.channel = val;
        }
        if let Ok(val) = std::env::var("BQ_BACKUP_SLACK_WEBHOOK") {
            slack.webhook = secret_string(val);
        }
    }

    if let Ok(val) = std::env::var("BQ_BACKUP_BIGQUERY_ENDPOINT") {
        config.bigquery.endpoint = val;
    }
    if let Ok(val) = std::env::var("BQ_BACKUP_BIGQUERY_ACCESS_TOKEN") {
        config.bigquery.access_token = Some(secret_string(val));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(contents.as_bytes()).unwrap();
        temp_file.flush().unwrap();
        temp_file
    }

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("BQB_UNIT_WEBHOOK", "https://hooks.example.com/abc");
        let input = "webhook = \"${BQB_UNIT_WEBHOOK}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "webhook = \"https://hooks.example.com/abc\"\n");
        std::env::remove_var("BQB_UNIT_WEBHOOK");
    }

    #[test]
    fn test_substitute_env_vars_missing_lists_all() {
        std::env::remove_var("BQB_UNIT_MISSING_A");
        std::env::remove_var("BQB_UNIT_MISSING_B");
        let input = "a = \"${BQB_UNIT_MISSING_A}\"\nb = \"${BQB_UNIT_MISSING_B}\"";
        let err = substitute_env_vars(input).unwrap_err().to_string();
        assert!(err.contains("BQB_UNIT_MISSING_A"));
        assert!(err.contains("BQB_UNIT_MISSING_B"));
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("BQB_UNIT_COMMENTED");
        let input = "# webhook = \"${BQB_UNIT_COMMENTED}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_substitute_env_vars_skips_trailing_comment() {
        std::env::remove_var("BQB_UNIT_TRAILING");
        let input = "webhook = \"https://hooks.example.com/x\" # was ${BQB_UNIT_TRAILING}";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, format!("{input}\n"));
    }

    #[test]
    fn test_substitute_env_vars_before_trailing_comment() {
        std::env::set_var("BQB_UNIT_CHANNEL", "#backups");
        let input = "channel = \"${BQB_UNIT_CHANNEL}\" # ${BQB_UNIT_NOT_SET}";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "channel = \"#backups\" # ${BQB_UNIT_NOT_SET}\n");
        std::env::remove_var("BQB_UNIT_CHANNEL");
    }

    #[test]
    fn test_trailing_comment_start_ignores_hash_in_strings() {
        assert_eq!(trailing_comment_start(r##"a = "#x" # c"##), 9);
        assert_eq!(trailing_comment_start("a = '#x' # c"), 9);
        assert_eq!(trailing_comment_start(r##"a = "\"#" # c"##), 10);
        assert_eq!(trailing_comment_start(r#"a = "no comment""#), 16);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("/nonexistent/bq-backup/config.toml");
        assert!(matches!(result, Err(BackupError::ConfigNotFound(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let file = write_config(
            r#"
project = "unit-project"
job_wait = 600

[[datasets]]
name = "analytics"
prefix = "events_"
bucket = "analytics-backup"
"#,
        );

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.datasets.len(), 1);
        assert_eq!(config.job_wait, Some(600));
        assert!(config.slack.is_none());
    }

    #[test]
    fn test_load_config_missing_datasets() {
        let file = write_config("project = \"unit-project\"\n");
        let result = load_config(file.path());
        assert!(matches!(result, Err(BackupError::ConfigParse(_))));
    }
}
