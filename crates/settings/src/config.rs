use std::path::{Path, PathBuf};

use foldertools_statusbar::StatusBarPath;
use serde::{Deserialize, Serialize};

pub(crate) const CONFIG_VERSION: u32 = 1;
const DEFAULT_EXTENSION: &str = "sublime-project";

/// 工作區內存放設定與專案的資料夾名稱。 / Per-workspace directory holding config and projects.
pub const CONFIG_DIR: &str = ".foldertools";
pub const CONFIG_FILE: &str = "config.json";
const PROJECTS_DIR: &str = "projects";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub projects: ProjectsConfig,
    #[serde(default)]
    pub status_bar: StatusBarPath,
    #[serde(default)]
    pub folder_opener: FolderOpenerConfig,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            projects: ProjectsConfig::default(),
            status_bar: StatusBarPath::default(),
            folder_opener: FolderOpenerConfig::default(),
        }
    }
}

impl Config {
    pub fn sanitize(&mut self) {
        if self.version == 0 {
            self.version = CONFIG_VERSION;
        }
        self.projects.sanitize();
        self.status_bar.sanitize();
    }

    /// 設定檔在工作區中的預設位置。 / Default config location inside a workspace.
    pub fn path_in(workspace: &Path) -> PathBuf {
        workspace.join(CONFIG_DIR).join(CONFIG_FILE)
    }
}

/// Where saved projects live and how their files are named.
/// （專案檔的存放位置與副檔名。）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectsConfig {
    #[serde(default)]
    pub directory: Option<PathBuf>,
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default)]
    pub dedup_folders: bool,
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

impl Default for ProjectsConfig {
    fn default() -> Self {
        Self {
            directory: None,
            extension: default_extension(),
            dedup_folders: false,
        }
    }
}

impl ProjectsConfig {
    fn sanitize(&mut self) {
        let trimmed = self.extension.trim().trim_start_matches('.');
        self.extension = if trimmed.is_empty() {
            default_extension()
        } else {
            trimmed.to_string()
        };
        if self
            .directory
            .as_ref()
            .is_some_and(|dir| dir.as_os_str().is_empty())
        {
            self.directory = None;
        }
    }

    /// Resolves the projects directory. Relative entries are taken from the
    /// workspace; no entry means `<workspace>/.foldertools/projects`.
    pub fn resolve_directory(&self, workspace: &Path) -> PathBuf {
        match &self.directory {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => workspace.join(dir),
            None => workspace.join(CONFIG_DIR).join(PROJECTS_DIR),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderOpenerConfig {
    /// 單選檔案時是否顯示「開啟所在資料夾」。 / Offer "Open Containing Folder" for plain files.
    #[serde(default = "default_true")]
    pub display_for_files: bool,
}

fn default_true() -> bool {
    true
}

impl Default for FolderOpenerConfig {
    fn default() -> Self {
        Self {
            display_for_files: true,
        }
    }
}
