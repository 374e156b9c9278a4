//! Result type alias for bq-backup

use super::errors::BackupError;

/// Result type alias for bq-backup operations
///
/// # Examples
///
/// ```
/// use bq_backup::domain::result::Result;
/// use bq_backup::domain::errors::BackupError;
///
/// fn failing_function() -> Result<()> {
///     Err(BackupError::ConfigParse("missing project".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, BackupError>;
