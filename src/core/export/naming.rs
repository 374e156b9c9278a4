//! Table, destination and job identifiers derived for one export

use chrono::{DateTime, TimeZone};

/// Date suffix format of the daily tables
pub const TABLE_DATE_FORMAT: &str = "%Y%m%d";

/// Name of yesterday's table relative to `now`: `prefix` followed by the
/// previous calendar day in `now`'s time zone as `YYYYMMDD`
///
/// Works on the calendar date rather than subtracting 24 hours, so days
/// shortened or lengthened by DST still map to the previous date.
pub fn table_name<Tz: TimeZone>(prefix: &str, now: &DateTime<Tz>) -> String {
    let today = now.date_naive();
    let yesterday = today.pred_opt().unwrap_or(today);
    format!("{prefix}{}", yesterday.format(TABLE_DATE_FORMAT))
}

/// Wildcard destination so large tables can be sharded into several files
pub fn destination_uri(bucket: &str, table: &str) -> String {
    format!("gs://{bucket}/{table}*")
}

/// Job id unique per dataset, table and submission second
///
/// Job ids may only contain letters, digits, underscores and dashes.
pub fn job_id(dataset: &str, table: &str, submitted_epoch_secs: i64) -> String {
    let raw = format!("bq_backup_{dataset}_{table}_{submitted_epoch_secs}");
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
