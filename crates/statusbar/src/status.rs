use serde::{Deserialize, Serialize};

use crate::shorten::shorten;

pub const DEFAULT_MAX_DIRS: usize = 3;
pub const DEFAULT_STATUS_KEY: &str = "zPath";

/// Key/value pair the host writes into its status bar.
/// 寫入狀態列的鍵值組。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    pub key: String,
    pub value: String,
}

/// Formats the active view's file path for the status bar.
/// 將目前檢視的檔案路徑格式化為狀態列文字。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBarPath {
    #[serde(default = "default_max_dirs")]
    pub max_dirs: usize,
    #[serde(default = "default_status_key")]
    pub status_key: String,
}

fn default_max_dirs() -> usize {
    DEFAULT_MAX_DIRS
}

fn default_status_key() -> String {
    DEFAULT_STATUS_KEY.to_string()
}

impl Default for StatusBarPath {
    fn default() -> Self {
        Self {
            max_dirs: DEFAULT_MAX_DIRS,
            status_key: default_status_key(),
        }
    }
}

impl StatusBarPath {
    pub fn new(max_dirs: usize) -> Self {
        Self {
            max_dirs,
            ..Self::default()
        }
    }

    /// Builds the status entry for a view; unsaved views (no file name) get none.
    /// 依檢視的檔名產生狀態列項目；尚未存檔的檢視不產生任何項目。
    pub fn status_for(&self, file_name: Option<&str>) -> Option<StatusEntry> {
        let path = file_name.filter(|name| !name.is_empty())?;
        Some(StatusEntry {
            key: self.status_key.clone(),
            value: shorten(path, self.max_dirs),
        })
    }

    pub fn sanitize(&mut self) {
        if self.status_key.trim().is_empty() {
            self.status_key = default_status_key();
        }
    }
}
