use crate::client::wire::{FileSystemItem, Page, UsageItem, VersionList};
use crate::client::ArrayClient;
use crate::config::{ApiVersion, ArrayCredentials};
use crate::error::ApiError;
use crate::models::quota::{FilesystemInfo, RawQuotaRecord};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::time::Duration;

const AUTH_HEADER: &str = "x-auth-token";

/// An authenticated session against one array.
pub struct RestSession {
    http:       Client,
    base:       String,
    generation: ApiVersion,
    version:    String,
    auth_token: String,
}

impl RestSession {
    /// Negotiate the API version and log in with the array's API token.
    pub fn connect(creds: &ArrayCredentials, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(!creds.verify_tls)
            .build()?;
        Self::login(http, format!("https://{}", creds.ip_address), creds)
    }

    /// Version negotiation and login against `base` (scheme and host).
    fn login(http: Client, base: String, creds: &ArrayCredentials) -> Result<Self, ApiError> {
        let offered: VersionList = get_json(http.get(format!("{}/api/api_version", base)))?;
        let version = pick_version(&offered.versions, creds.api_version)?;

        let resp = check_status(
            http.post(format!("{}/api/login", base))
                .header("api-token", &creds.api_token)
                .send()?,
        )?;
        let auth_token = resp
            .headers()
            .get(AUTH_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or(ApiError::MissingAuthToken)?;

        tracing::info!(array = %creds.name, version = %version, "session established");
        Ok(Self { http, base, generation: creds.api_version, version, auth_token })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Fetch every page of a list endpoint.
    fn list_all<T: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, String)]) -> Result<Vec<T>, ApiError> {
        let url = format!("{}/api/{}/{}", self.base, self.version, endpoint);
        let mut out = Vec::new();
        let mut token: Option<String> = None;
        let mut sent = HashSet::new();

        loop {
            let mut req = self.http.get(&url).header(AUTH_HEADER, &self.auth_token).query(query);
            if let Some(t) = &token {
                req = req.query(&[(token_param(self.generation), t.as_str())]);
            }
            let page: Page<T> = get_json(req)?;
            let next = page.next_token().map(str::to_string);
            tracing::debug!(endpoint, items = page.items.len(), more = next.is_some(), "fetched page");
            out.extend(page.items);

            match next {
                // Any token already sent means the array is cycling.
                Some(t) if sent.insert(t.clone()) => token = Some(t),
                _ => break,
            }
        }
        Ok(out)
    }
}

impl ArrayClient for RestSession {
    fn list_filesystems(&self) -> Result<Vec<FilesystemInfo>, ApiError> {
        let items: Vec<FileSystemItem> = self.list_all("file-systems", &[])?;
        Ok(items.into_iter().map(FilesystemInfo::from).collect())
    }

    fn list_user_usage(&self, filesystem_names: &[String]) -> Result<Vec<RawQuotaRecord>, ApiError> {
        let names = filesystem_names.join(",");
        let items: Vec<UsageItem> = self.list_all("usage/users", &[("file_system_names", names)])?;
        let fallback = filesystem_names.first().map(String::as_str).unwrap_or("");
        Ok(items.into_iter().map(|i| i.into_raw(fallback)).collect())
    }
}

fn token_param(generation: ApiVersion) -> &'static str {
    match generation {
        ApiVersion::V1 => "token",
        ApiVersion::V2 => "continuation_token",
    }
}

/// Highest offered version in the wanted generation, e.g. "1.12" over "1.9".
pub fn pick_version(offered: &[String], wanted: ApiVersion) -> Result<String, ApiError> {
    offered
        .iter()
        .filter_map(|v| {
            let (major, minor) = v.split_once('.')?;
            if major != wanted.major() { return None; }
            minor.parse::<u32>().ok().map(|m| (m, v))
        })
        .max_by_key(|(m, _)| *m)
        .map(|(_, v)| v.clone())
        .ok_or_else(|| ApiError::NoCompatibleVersion {
            wanted:  format!("{}.x", wanted.major()),
            offered: offered.join(", "),
        })
}

fn check_status(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().unwrap_or_default();
    Err(ApiError::Status { status: status.as_u16(), body })
}

fn get_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, ApiError> {
    let resp = check_status(req.send()?)?;
    let body = resp.bytes()?;
    Ok(serde_json::from_slice(&body)?)
}
