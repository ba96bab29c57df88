use crate::util::units::fmt_decimal;
use serde::{Serialize, Serializer};
use std::fmt;

/// One filesystem as listed by the array.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilesystemInfo {
    pub name: String,
    /// Provisioned size in bytes, when the array reports one.
    pub provisioned_bytes: Option<u64>,
    /// Filesystem-wide default user quota in bytes.
    pub default_user_quota_bytes: Option<u64>,
}

impl FilesystemInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), provisioned_bytes: None, default_user_quota_bytes: None }
    }
}

/// Per-user usage on one filesystem, exactly as the array reports it (bytes).
#[derive(Debug, Clone, PartialEq)]
pub struct RawQuotaRecord {
    pub file_system_name:              String,
    pub file_system_default_quota_bytes: Option<u64>,
    pub user_name:                     String,
    pub user_id:                       u64,
    pub quota_bytes:                   Option<u64>,
    pub usage_bytes:                   Option<u64>,
}

/// Percentage of the effective quota in use.
///
/// `Unbounded` is the outcome when neither a user quota nor a filesystem
/// default is configured; it displays as the literal `0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PercentUsed {
    Ratio(f64),
    Unbounded,
}

impl fmt::Display for PercentUsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PercentUsed::Ratio(v)  => f.write_str(&fmt_decimal(*v)),
            PercentUsed::Unbounded => f.write_str("0"),
        }
    }
}

impl Serialize for PercentUsed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A quota record with GiB units and a computed percentage, ready to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedQuotaRecord {
    pub array_name:          String,
    pub file_system_name:    String,
    pub default_quota_gib:   f64,
    pub user_name:           String,
    pub user_id:             u64,
    pub effective_quota_gib: f64,
    pub usage_gib:           f64,
    pub percent_used:        PercentUsed,
}
