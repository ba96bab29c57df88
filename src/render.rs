use crate::models::quota::{FilesystemInfo, NormalizedQuotaRecord};
use crate::util::units::fmt_decimal;
use serde_json::json;

pub const COLUMNS: [&str; 8] = [
    "FlashBlade",
    "Filesystem",
    "DefaultQuota(GiB)",
    "User",
    "Uid",
    "UserQuota(GiB)",
    "Usage(GiB)",
    "PctUsed",
];

const WIDTHS: [usize; 8] = [15, 30, 18, 12, 10, 18, 10, 10];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

/// The eight display fields of a record, in column order.
pub fn fields(rec: &NormalizedQuotaRecord) -> [String; 8] {
    [
        rec.array_name.clone(),
        rec.file_system_name.clone(),
        fmt_decimal(rec.default_quota_gib),
        rec.user_name.clone(),
        rec.user_id.to_string(),
        fmt_decimal(rec.effective_quota_gib),
        fmt_decimal(rec.usage_gib),
        rec.percent_used.to_string(),
    ]
}

fn pad_row<S: AsRef<str>>(cells: &[S]) -> String {
    cells
        .iter()
        .zip(WIDTHS)
        .map(|(c, w)| format!("{:<w$}", c.as_ref(), w = w))
        .collect()
}

pub fn header() -> String {
    pad_row(&COLUMNS)
}

/// Fixed-width row; long values push later columns right rather than truncate.
pub fn table_row(rec: &NormalizedQuotaRecord) -> String {
    pad_row(&fields(rec))
}

/// Comma-joined row. Embedded commas are not quoted.
pub fn csv_row(rec: &NormalizedQuotaRecord) -> String {
    fields(rec).join(",")
}

/// JSON snapshot of a report run.
pub fn json_snapshot(array: &str, records: &[NormalizedQuotaRecord]) -> serde_json::Value {
    json!({
        "array":     array,
        "timestamp": chrono::Local::now().to_rfc3339(),
        "records":   records,
    })
}

pub fn json_filesystems(array: &str, filesystems: &[FilesystemInfo]) -> serde_json::Value {
    json!({
        "array":       array,
        "filesystems": filesystems,
    })
}
