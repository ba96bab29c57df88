use crate::config::ConfigError;
use thiserror::Error;

/// Failures talking to the array's REST API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),
    #[error("array returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("login response carried no x-auth-token header")]
    MissingAuthToken,
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("array supports none of the {wanted} API versions (offered: {offered})")]
    NoCompatibleVersion { wanted: String, offered: String },
}

/// Everything that stops a report run.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Can not find array --> {0}")]
    UnknownArray(String),
    #[error("Can not establish session with array --> {array}")]
    Session {
        array: String,
        #[source]
        source: ApiError,
    },
    #[error("Can not get list of filesystems --> {array}")]
    ListFilesystems {
        array: String,
        #[source]
        source: ApiError,
    },
    #[error("Can not list user usage for filesystem {filesystem} --> {array}")]
    ListUsage {
        array: String,
        filesystem: String,
        #[source]
        source: ApiError,
    },
    #[error("writing report: {0}")]
    Output(#[from] std::io::Error),
}
