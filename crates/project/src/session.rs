use serde_json::{Map, Value};

use crate::document::{folder_path, ProjectDocument, KEY_FOLDERS};
use crate::error::DocumentError;
use crate::project::Project;

/// The folders and settings the editor currently has open.
///
/// Unlike [`ProjectDocument`] this is the host's live state and is not
/// validated: it may be empty, and folder entries without a `path` are
/// ignored rather than rejected.
/// 編輯器目前開啟的資料夾與設定（主程式的即時狀態，不做格式驗證）。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionDocument {
    data: Map<String, Value>,
}

impl SessionDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts an object or `null` (no project data).
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        match value {
            Value::Object(data) => Ok(Self { data }),
            Value::Null => Ok(Self::default()),
            _ => Err(DocumentError::NotAnObject),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn folders(&self) -> Vec<&str> {
        self.data
            .get(KEY_FOLDERS)
            .and_then(Value::as_array)
            .map(|entries| entries.iter().filter_map(folder_path).collect())
            .unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.data.insert(key.into(), value)
    }

    /// Drops all project data, as when the window's folders are closed.
    /// 清除所有專案資料（關閉視窗中的資料夾）。
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Snapshot of the session as a valid project document.
    /// 將目前狀態轉為合法的專案文件。
    pub fn to_project_document(&self) -> ProjectDocument {
        let folders: Vec<Value> = self
            .data
            .get(KEY_FOLDERS)
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|entry| entry.is_object() && folder_path(entry).is_some())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        let mut data = Map::new();
        data.insert(KEY_FOLDERS.to_string(), Value::Array(folders));
        for (key, value) in &self.data {
            if key != KEY_FOLDERS {
                data.insert(key.clone(), value.clone());
            }
        }
        ProjectDocument::from_checked_map(data)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.data.clone())
    }
}

/// Loads a project into the live session.
///
/// The session's folder list is replaced outright by the project's folder
/// entries. Every other key already in the session is kept as is; the
/// project only fills in keys the session lacks.
/// 將專案載入目前工作階段：資料夾清單整個取代，既有的其它鍵值保持不變，只補上缺少的鍵。
pub fn open_project(project: &Project, session: &mut SessionDocument) {
    let document = project.document();
    for (key, value) in document.extra_entries() {
        session
            .data
            .entry(key.clone())
            .or_insert_with(|| value.clone());
    }
    session.data.insert(
        KEY_FOLDERS.to_string(),
        Value::Array(document.folder_entries().to_vec()),
    );
}
