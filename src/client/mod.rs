pub mod rest;
pub mod wire;

use crate::config::ArrayCredentials;
use crate::error::{ApiError, ReportError};
use crate::models::quota::{FilesystemInfo, RawQuotaRecord};
use std::time::Duration;

pub use rest::RestSession;

/// Read-only view of an array's filesystems and per-user usage.
pub trait ArrayClient {
    fn list_filesystems(&self) -> Result<Vec<FilesystemInfo>, ApiError>;

    /// An empty result is normal for a filesystem nobody has written to.
    fn list_user_usage(&self, filesystem_names: &[String]) -> Result<Vec<RawQuotaRecord>, ApiError>;
}

/// Open a session, speaking whichever API generation `creds` asks for.
pub fn connect(creds: &ArrayCredentials, timeout: Duration) -> Result<RestSession, ReportError> {
    RestSession::connect(creds, timeout).map_err(|source| ReportError::Session {
        array: creds.name.clone(),
        source,
    })
}
