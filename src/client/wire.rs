//! JSON shapes returned by the array's REST API.

use crate::models::quota::{FilesystemInfo, RawQuotaRecord};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct VersionList {
    #[serde(default)]
    pub versions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct PaginationInfo {
    #[serde(default)]
    pub continuation_token: Option<String>,
}

/// One page of a list endpoint. Generation 1 nests the continuation token in
/// `pagination_info`, generation 2 puts it at the top level.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub pagination_info: Option<PaginationInfo>,
    #[serde(default)]
    pub continuation_token: Option<String>,
}

impl<T> Page<T> {
    pub fn next_token(&self) -> Option<&str> {
        self.continuation_token
            .as_deref()
            .or_else(|| self.pagination_info.as_ref().and_then(|p| p.continuation_token.as_deref()))
            .filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct FileSystemItem {
    pub name: String,
    #[serde(default)]
    pub provisioned: Option<u64>,
    #[serde(default)]
    pub default_user_quota: Option<u64>,
}

impl From<FileSystemItem> for FilesystemInfo {
    fn from(item: FileSystemItem) -> Self {
        FilesystemInfo {
            name:                     item.name,
            provisioned_bytes:        item.provisioned,
            default_user_quota_bytes: item.default_user_quota,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NameRef {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserRef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub id: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct UsageItem {
    #[serde(default)]
    pub file_system: Option<NameRef>,
    #[serde(default)]
    pub file_system_default_quota: Option<u64>,
    #[serde(default)]
    pub user: Option<UserRef>,
    #[serde(default)]
    pub quota: Option<u64>,
    #[serde(default)]
    pub usage: Option<u64>,
}

impl UsageItem {
    /// `queried_fs` stands in when the item omits its filesystem reference.
    pub fn into_raw(self, queried_fs: &str) -> RawQuotaRecord {
        let file_system_name = self
            .file_system
            .and_then(|f| f.name)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| queried_fs.to_string());
        let user = self.user.unwrap_or_default();
        RawQuotaRecord {
            file_system_name,
            file_system_default_quota_bytes: self.file_system_default_quota,
            user_name:   user.name.unwrap_or_default(),
            user_id:     user.id.unwrap_or(0),
            quota_bytes: self.quota,
            usage_bytes: self.usage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_v1_usage_page() {
        let body = r#"{
            "pagination_info": {"continuation_token": "abc", "total_item_count": 3},
            "items": [
                {"file_system": {"name": "home", "id": "x"}, "file_system_default_quota": 1073741824,
                 "user": {"name": "alice", "id": 1001}, "quota": null, "usage": 536870912},
                {"file_system": {"name": "home"}, "user": {"id": 1002}, "quota": 2147483648, "usage": 0}
            ]
        }"#;
        let page: Page<UsageItem> = serde_json::from_str(body).unwrap();
        assert_eq!(page.next_token(), Some("abc"));
        let recs: Vec<_> = page.items.into_iter().map(|i| i.into_raw("home")).collect();

        assert_eq!(recs[0].user_name, "alice");
        assert_eq!(recs[0].user_id, 1001);
        assert_eq!(recs[0].quota_bytes, None);
        assert_eq!(recs[0].file_system_default_quota_bytes, Some(1_073_741_824));

        assert_eq!(recs[1].user_name, "");
        assert_eq!(recs[1].file_system_default_quota_bytes, None);
        assert_eq!(recs[1].usage_bytes, Some(0));
    }

    #[test]
    fn test_decode_v2_token_at_top_level() {
        let body = r#"{"continuation_token": "next", "total_item_count": 10, "items": []}"#;
        let page: Page<FileSystemItem> = serde_json::from_str(body).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.next_token(), Some("next"));
    }

    #[test]
    fn test_empty_token_means_last_page() {
        let body = r#"{"pagination_info": {"continuation_token": ""}, "items": [{"name": "fs1"}]}"#;
        let page: Page<FileSystemItem> = serde_json::from_str(body).unwrap();
        assert_eq!(page.next_token(), None);
    }

    #[test]
    fn test_missing_filesystem_ref_uses_queried_name() {
        let item: UsageItem = serde_json::from_str(r#"{"user": {"name": "bob", "id": 7}}"#).unwrap();
        let raw = item.into_raw("scratch");
        assert_eq!(raw.file_system_name, "scratch");
        assert_eq!(raw.usage_bytes, None);
    }

    #[test]
    fn test_filesystem_item_into_info() {
        let item: FileSystemItem =
            serde_json::from_str(r#"{"name": "fs1", "provisioned": 10995116277760, "default_user_quota": 0}"#).unwrap();
        let info = FilesystemInfo::from(item);
        assert_eq!(info.name, "fs1");
        assert_eq!(info.provisioned_bytes, Some(10_995_116_277_760));
        assert_eq!(info.default_user_quota_bytes, Some(0));
    }
}
