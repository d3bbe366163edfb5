use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::config::{Config, CONFIG_VERSION};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot access config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("config {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode config: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error(
        "config {path} has version {found}; this build understands up to {}",
        CONFIG_VERSION
    )]
    UnsupportedVersion { path: PathBuf, found: u32 },
}

/// 工作區設定檔；只有內容真的改變時才寫回磁碟。 / Workspace config file, written back only when its content changes.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    data: Config,
}

impl ConfigStore {
    /// 在工作區預設位置載入設定。 / Loads the config from its default spot in `workspace`.
    pub fn open_workspace(workspace: &Path) -> Result<Self, ConfigError> {
        Self::load(Config::path_in(workspace))
    }

    /// A missing file yields the defaults without touching the disk. Files
    /// written by a newer format version are refused rather than rewritten.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "config missing, using defaults");
                return Ok(Self {
                    path,
                    data: Config::default(),
                });
            }
            Err(source) => return Err(ConfigError::Io { path, source }),
        };

        let mut data: Config = match serde_json::from_str(&contents) {
            Ok(data) => data,
            Err(source) => return Err(ConfigError::Parse { path, source }),
        };
        if data.version > CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                path,
                found: data.version,
            });
        }
        data.sanitize();
        Ok(Self { path, data })
    }

    pub fn config(&self) -> &Config {
        &self.data
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies `op`, sanitizes the result and persists it. Returns `false`
    /// without writing when nothing changed.
    /// 套用修改並寫回；內容未變時不寫檔並回傳 `false`。
    pub fn update<F>(&mut self, op: F) -> Result<bool, ConfigError>
    where
        F: FnOnce(&mut Config),
    {
        let mut next = self.data.clone();
        op(&mut next);
        next.sanitize();
        if next == self.data && self.path.exists() {
            return Ok(false);
        }
        persist(&self.path, &next)?;
        self.data = next;
        Ok(true)
    }
}

/// Replaces the file through a sibling `.tmp` file.
fn persist(path: &Path, config: &Config) -> Result<(), ConfigError> {
    let mut payload = serde_json::to_string_pretty(config).map_err(ConfigError::Serialize)?;
    payload.push('\n');

    let io_error = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, payload).map_err(io_error)?;
    fs::rename(&tmp_path, path).map_err(io_error)?;
    debug!(path = %path.display(), "saved config");
    Ok(())
}
