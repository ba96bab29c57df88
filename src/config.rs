use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Can not read sessions file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("toml: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported sessions file format: {0}")]
    UnsupportedFormat(PathBuf),
    #[error("no platform config directory; pass --sessions")]
    NoConfigDir,
    #[error("validation: {0}")]
    Validation(String),
}

/// Which generation of the array REST API to speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    #[default]
    V1,
    V2,
}

impl ApiVersion {
    /// Major version prefix as it appears in `/api/api_version`.
    pub fn major(&self) -> &'static str {
        match self {
            ApiVersion::V1 => "1",
            ApiVersion::V2 => "2",
        }
    }
}

/// Connection parameters for one array.
///
/// Example sessions.yaml:
/// ```yaml
/// ARRAYS:
///   - name: fb1
///     ip-address: 10.0.0.10
///     api-token: T-0000-example
///     api-version: v2      # optional, default v1
///     verify-tls: false    # optional
/// ```
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ArrayCredentials {
    pub name:       String,
    pub ip_address: String,
    pub api_token:  String,
    #[serde(default)]
    pub api_version: ApiVersion,
    #[serde(default)]
    pub verify_tls: bool,
}

// Hand-written so the token never reaches a log line.
impl std::fmt::Debug for ArrayCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArrayCredentials")
            .field("name", &self.name)
            .field("ip_address", &self.ip_address)
            .field("api_token", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("verify_tls", &self.verify_tls)
            .finish()
    }
}

/// The keyed list of arrays, loaded once at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialStore {
    #[serde(rename = "ARRAYS", alias = "arrays", default)]
    arrays: Vec<ArrayCredentials>,
}

impl CredentialStore {
    pub fn new(arrays: Vec<ArrayCredentials>) -> Result<Self, ConfigError> {
        let store = Self { arrays };
        store.validate()?;
        Ok(store)
    }

    /// Read and validate a sessions file. The format follows the extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let store: CredentialStore = match path.extension().and_then(|s| s.to_str()).unwrap_or("") {
            "yaml" | "yml" => serde_yaml::from_str(&text)?,
            "toml"         => toml::from_str(&text)?,
            "json"         => serde_json::from_str(&text)?,
            _              => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };
        store.validate()?;
        tracing::info!(path = %path.display(), arrays = store.arrays.len(), "loaded sessions file");
        Ok(store)
    }

    /// `<config dir>/fbquota/sessions.yaml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|p| p.join("fbquota").join("sessions.yaml"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Look up an array by exact name. Unknown names are not an error here.
    pub fn resolve(&self, name: &str) -> Option<&ArrayCredentials> {
        self.arrays.iter().find(|a| a.name == name)
    }

    pub fn arrays(&self) -> &[ArrayCredentials] {
        &self.arrays
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for (i, a) in self.arrays.iter().enumerate() {
            if a.name.trim().is_empty() {
                return Err(ConfigError::Validation(format!("entry {} has an empty name", i)));
            }
            if a.ip_address.trim().is_empty() {
                return Err(ConfigError::Validation(format!("array {} has an empty ip-address", a.name)));
            }
            if a.api_token.trim().is_empty() {
                return Err(ConfigError::Validation(format!("array {} has an empty api-token", a.name)));
            }
            if !seen.insert(a.name.as_str()) {
                return Err(ConfigError::Validation(format!("array {} is listed twice", a.name)));
            }
        }
        Ok(())
    }
}
