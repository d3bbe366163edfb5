use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading, writing or applying project files.
/// 讀寫或套用專案檔時可能發生的錯誤。
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("project file '{0}' was not found")]
    NotFound(PathBuf),
    #[error("malformed project file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },
    #[error("projects directory '{0}' was not found")]
    NoProjectsConfigured(PathBuf),
    #[error("there are no folders to save")]
    EmptySelection,
    #[error("invalid project name '{0}'")]
    InvalidName(String),
    #[error("no project opened")]
    NoActiveProject,
    #[error("project '{0}' has no associated project file")]
    NotPersisted(String),
    #[error("project IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize project '{name}': {source}")]
    Serialize {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Ways a JSON value can fail the project document schema.
/// 專案文件格式驗證失敗的原因。
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("top-level value is not an object")]
    NotAnObject,
    #[error("missing 'folders' key")]
    MissingFolders,
    #[error("'folders' is not an array")]
    FoldersNotArray,
    #[error("folder entry {0} is not an object")]
    EntryNotObject(usize),
    #[error("folder entry {0} has no string 'path'")]
    EntryWithoutPath(usize),
}

impl ProjectError {
    pub(crate) fn from_io(path: PathBuf, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            ProjectError::NotFound(path)
        } else {
            ProjectError::Io { path, source }
        }
    }

    /// Renders the error the way the host shows it in its status bar.
    /// 以狀態列訊息格式呈現錯誤。
    pub fn status_message(&self) -> String {
        format!("Project: {self}")
    }
}
