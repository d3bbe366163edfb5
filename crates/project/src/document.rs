use std::collections::HashSet;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::DocumentError;

pub const KEY_FOLDERS: &str = "folders";
pub const KEY_PATH: &str = "path";
pub const KEY_SETTINGS: &str = "settings";
pub const KEY_FOLDER_EXCLUDE: &str = "folder_exclude_patterns";

/// JSON body of a project file.
///
/// Invariant: `folders` is always present and is an array of objects that
/// each carry a string `path`. Every other key, at the top level or inside a
/// folder entry, is opaque and round-trips untouched.
/// 專案檔的 JSON 內容；`folders` 必定存在，其餘鍵值原樣保留。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProjectDocument {
    data: Map<String, Value>,
}

impl Default for ProjectDocument {
    fn default() -> Self {
        let mut data = Map::new();
        data.insert(KEY_FOLDERS.to_string(), Value::Array(Vec::new()));
        Self { data }
    }
}

impl ProjectDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a document holding only the given folders.
    /// 以資料夾清單建立只含 `folders` 的文件。
    pub fn from_folders<I, S>(folders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut document = Self::default();
        document.set_folders(folders);
        document
    }

    /// Validates a parsed JSON value against the project schema.
    /// 驗證 JSON 值是否符合專案檔格式。
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        let Value::Object(data) = value else {
            return Err(DocumentError::NotAnObject);
        };
        validate_folders(data.get(KEY_FOLDERS))?;
        Ok(Self { data })
    }

    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    pub fn folder_entries(&self) -> &[Value] {
        self.data
            .get(KEY_FOLDERS)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Folder paths in file order.
    /// 依檔案順序列出資料夾路徑。
    pub fn folders(&self) -> Vec<&str> {
        self.folder_entries()
            .iter()
            .filter_map(folder_path)
            .collect()
    }

    pub fn first_folder(&self) -> Option<&str> {
        self.folder_entries().iter().find_map(folder_path)
    }

    pub fn has_folders(&self) -> bool {
        !self.folder_entries().is_empty()
    }

    /// Replaces the folder list with plain `{ "path": ... }` entries.
    /// 以單純的 `{ "path": ... }` 項目取代資料夾清單。
    pub fn set_folders<I, S>(&mut self, folders: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = folders
            .into_iter()
            .map(|folder| {
                let mut entry = Map::new();
                entry.insert(KEY_PATH.to_string(), Value::String(folder.into()));
                Value::Object(entry)
            })
            .collect();
        self.data
            .insert(KEY_FOLDERS.to_string(), Value::Array(entries));
    }

    /// Wraps a map whose `folders` already satisfy the invariant.
    pub(crate) fn from_checked_map(data: Map<String, Value>) -> Self {
        debug_assert!(validate_folders(data.get(KEY_FOLDERS)).is_ok());
        Self { data }
    }

    /// Drops repeated folder paths, keeping the first occurrence. Returns how
    /// many entries were removed.
    /// 移除重複的資料夾路徑（保留第一次出現者），並回傳移除數量。
    pub fn dedup_folders(&mut self) -> usize {
        let Some(Value::Array(entries)) = self.data.get_mut(KEY_FOLDERS) else {
            return 0;
        };
        let before = entries.len();
        let mut seen = HashSet::new();
        entries.retain(|entry| match folder_path(entry) {
            Some(path) => seen.insert(path.to_string()),
            None => true,
        });
        before - entries.len()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Sets a top-level key. Writing `folders` is validated like a parsed file.
    /// 設定頂層鍵值；寫入 `folders` 時會依格式驗證。
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: Value,
    ) -> Result<Option<Value>, DocumentError> {
        let key = key.into();
        if key == KEY_FOLDERS {
            validate_folders(Some(&value))?;
        }
        Ok(self.data.insert(key, value))
    }

    /// Top-level keys other than `folders`.
    pub fn extra_entries(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.data.iter().filter(|(key, _)| key.as_str() != KEY_FOLDERS)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.data)
    }
}

pub(crate) fn folder_path(entry: &Value) -> Option<&str> {
    entry.get(KEY_PATH).and_then(Value::as_str)
}

fn validate_folders(value: Option<&Value>) -> Result<(), DocumentError> {
    let entries = value
        .ok_or(DocumentError::MissingFolders)?
        .as_array()
        .ok_or(DocumentError::FoldersNotArray)?;
    for (index, entry) in entries.iter().enumerate() {
        if !entry.is_object() {
            return Err(DocumentError::EntryNotObject(index));
        }
        if folder_path(entry).is_none() {
            return Err(DocumentError::EntryWithoutPath(index));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_keeps_opaque_keys() {
        let text = r#"{
            "folders": [{ "path": "/src/app", "folder_exclude_patterns": ["target"] }],
            "settings": { "tab_size": 4 }
        }"#;
        let document = ProjectDocument::parse(text).unwrap();
        assert_eq!(document.folders(), vec!["/src/app"]);
        assert_eq!(document.get(KEY_SETTINGS), Some(&json!({ "tab_size": 4 })));
        assert_eq!(
            document.folder_entries()[0][KEY_FOLDER_EXCLUDE],
            json!(["target"])
        );
        let reparsed = ProjectDocument::parse(&serde_json::to_string(&document).unwrap()).unwrap();
        assert_eq!(reparsed, document);
    }

    #[test]
    fn schema_violations_are_rejected() {
        let cases = [
            r#"[1, 2]"#,
            r#"{ "settings": {} }"#,
            r#"{ "folders": "nope" }"#,
            r#"{ "folders": [{ "name": "x" }] }"#,
            r#"{ "folders": [{ "path": 7 }] }"#,
            r#"{ "folders": ["bare"] }"#,
            r#"{ "folders": "#,
        ];
        for text in cases {
            assert!(ProjectDocument::parse(text).is_err(), "accepted {text}");
        }
    }

    #[test]
    fn schema_errors_name_the_violation() {
        assert!(matches!(
            ProjectDocument::from_value(json!({ "settings": {} })),
            Err(DocumentError::MissingFolders)
        ));
        assert!(matches!(
            ProjectDocument::from_value(json!({ "folders": [{ "path": "/a" }, "bare"] })),
            Err(DocumentError::EntryNotObject(1))
        ));
        assert!(matches!(
            ProjectDocument::from_value(json!({ "folders": [{ "path": 7 }] })),
            Err(DocumentError::EntryWithoutPath(0))
        ));
        assert!(matches!(
            ProjectDocument::parse("{ \"folders\": "),
            Err(DocumentError::Json(_))
        ));
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let mut document = ProjectDocument::from_folders(["/a", "/b", "/a", "/c", "/b"]);
        assert_eq!(document.dedup_folders(), 2);
        assert_eq!(document.folders(), vec!["/a", "/b", "/c"]);
    }

    #[test]
    fn insert_validates_folders_only() {
        let mut document = ProjectDocument::new();
        assert!(document.insert(KEY_FOLDERS, json!([{ "nope": 1 }])).is_err());
        assert!(!document.has_folders());
        document
            .insert(KEY_SETTINGS, json!({ "word_wrap": true }))
            .unwrap();
        let extras: Vec<_> = document.extra_entries().map(|(key, _)| key.as_str()).collect();
        assert_eq!(extras, vec![KEY_SETTINGS]);
    }
}
