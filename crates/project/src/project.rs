use std::path::{Path, PathBuf};

use crate::document::ProjectDocument;

const FALLBACK_NAME: &str = "Project Name";

/// A named set of folders plus opaque settings.
/// 具名的資料夾集合與其附帶設定。
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    name: String,
    path: Option<PathBuf>,
    document: ProjectDocument,
}

impl Project {
    /// Creates an unsaved project over the given folders.
    /// 以資料夾清單建立尚未儲存的專案。
    pub fn new<I, S>(name: impl Into<String>, folders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            path: None,
            document: ProjectDocument::from_folders(folders),
        }
    }

    /// Wraps a document that was read from `path`.
    pub fn persisted(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        document: ProjectDocument,
    ) -> Self {
        Self {
            name: name.into(),
            path: Some(path.into()),
            document,
        }
    }

    /// Wraps an in-memory document. Without an explicit name, the project is
    /// named after its first folder.
    /// 包裝記憶體中的文件；未指定名稱時以第一個資料夾命名。
    pub fn from_document(name: Option<&str>, document: ProjectDocument) -> Self {
        let name = match name.map(str::trim).filter(|name| !name.is_empty()) {
            Some(name) => name.to_string(),
            None => document
                .first_folder()
                .and_then(|folder| leaf_name(Path::new(folder)))
                .unwrap_or_else(|| FALLBACK_NAME.to_string()),
        };
        Self {
            name,
            path: None,
            document,
        }
    }

    /// Ad-hoc single-folder project named after the directory.
    /// 以單一資料夾建立臨時專案，名稱取自資料夾名。
    pub fn from_folder(folder: &Path) -> Self {
        let name = leaf_name(folder).unwrap_or_else(|| folder.display().to_string());
        Self::new(name, [folder.to_string_lossy().into_owned()])
    }

    /// Display name for a project file: its base name without extension.
    pub fn name_from_path(path: &Path) -> Option<String> {
        path.file_stem().map(|stem| stem.to_string_lossy().into_owned())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_persisted(&self) -> bool {
        self.path
            .as_ref()
            .is_some_and(|path| !path.as_os_str().is_empty())
    }

    pub(crate) fn set_path(&mut self, path: PathBuf) {
        self.path = Some(path);
    }

    pub fn document(&self) -> &ProjectDocument {
        &self.document
    }

    pub fn set_document(&mut self, document: ProjectDocument) {
        self.document = document;
    }

    pub fn folders(&self) -> Vec<&str> {
        self.document.folders()
    }

    pub fn first_folder(&self) -> Option<&str> {
        self.document.first_folder()
    }
}

fn leaf_name(path: &Path) -> Option<String> {
    path.file_name().map(|name| name.to_string_lossy().into_owned())
}
