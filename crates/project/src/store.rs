use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::document::ProjectDocument;
use crate::error::ProjectError;
use crate::project::Project;

/// Extension used by project files unless configured otherwise.
pub const DEFAULT_EXTENSION: &str = "sublime-project";

/// Where the store keeps its files and how it writes them. The directory is
/// fixed for the lifetime of the store.
/// 儲存區的設定：專案檔所在資料夾與寫入方式，建立後不再變更。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectStoreConfig {
    pub root: PathBuf,
    pub extension: String,
    pub dedup_folders: bool,
}

impl ProjectStoreConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: DEFAULT_EXTENSION.to_string(),
            dedup_folders: false,
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    pub fn with_dedup_folders(mut self, dedup: bool) -> Self {
        self.dedup_folders = dedup;
        self
    }
}

/// A project file that was skipped while listing.
/// 列舉時被略過的專案檔及原因。
#[derive(Debug)]
pub struct ProjectIssue {
    pub path: PathBuf,
    pub error: ProjectError,
}

impl fmt::Display for ProjectIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

/// Result of a directory scan: whatever parsed, plus what did not.
/// 掃描結果：成功載入的專案與略過的問題。
#[derive(Debug, Default)]
pub struct ProjectListing {
    pub projects: Vec<Project>,
    pub issues: Vec<ProjectIssue>,
}

impl ProjectListing {
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|project| project.name() == name)
    }
}

/// Persists project files under a single directory.
/// 管理單一資料夾下的專案檔。
#[derive(Debug, Clone)]
pub struct ProjectStore {
    config: ProjectStoreConfig,
}

impl ProjectStore {
    pub fn new(config: ProjectStoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectStoreConfig {
        &self.config
    }

    pub fn root(&self) -> &Path {
        &self.config.root
    }

    pub fn extension(&self) -> &str {
        &self.config.extension
    }

    /// Location a project with this name is saved to.
    /// 取得指定名稱專案的儲存路徑。
    pub fn path_for(&self, name: &str) -> Result<PathBuf, ProjectError> {
        let trimmed = name.trim();
        let invalid = trimmed.is_empty()
            || trimmed == "."
            || trimmed == ".."
            || trimmed.contains(['/', '\\']);
        if invalid {
            return Err(ProjectError::InvalidName(name.to_string()));
        }
        Ok(self
            .config
            .root
            .join(format!("{trimmed}.{}", self.config.extension)))
    }

    /// Scans the directory (non-recursively) for project files. Files that
    /// cannot be read or parsed are skipped and reported as issues; the scan
    /// itself never fails. Projects come back sorted by name.
    /// 掃描資料夾中的專案檔；無法讀取或解析的檔案會被略過並記錄，結果依名稱排序。
    pub fn list(&self) -> ProjectListing {
        let mut listing = ProjectListing::default();
        let root = &self.config.root;

        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(err) => {
                let error = if err.kind() == io::ErrorKind::NotFound {
                    ProjectError::NoProjectsConfigured(root.clone())
                } else {
                    ProjectError::Io {
                        path: root.clone(),
                        source: err,
                    }
                };
                warn!(dir = %root.display(), "project directory unavailable: {error}");
                listing.issues.push(ProjectIssue {
                    path: root.clone(),
                    error,
                });
                return listing;
            }
        };

        for entry in entries {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(err) => {
                    warn!(dir = %root.display(), "skipping unreadable directory entry: {err}");
                    listing.issues.push(ProjectIssue {
                        path: root.clone(),
                        error: ProjectError::Io {
                            path: root.clone(),
                            source: err,
                        },
                    });
                    continue;
                }
            };
            if !path.is_file() || !self.has_project_extension(&path) {
                continue;
            }
            match self.load(&path) {
                Ok(project) => listing.projects.push(project),
                Err(error) => {
                    warn!(file = %path.display(), "skipping project file: {error}");
                    listing.issues.push(ProjectIssue { path, error });
                }
            }
        }

        listing
            .projects
            .sort_by(|left, right| left.name().cmp(right.name()));
        listing
    }

    /// Reads and validates a single project file.
    /// 讀取並驗證單一專案檔。
    pub fn load(&self, path: &Path) -> Result<Project, ProjectError> {
        let contents = fs::read_to_string(path)
            .map_err(|err| ProjectError::from_io(path.to_path_buf(), err))?;
        let document =
            ProjectDocument::parse(&contents).map_err(|source| ProjectError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;
        let name = Project::name_from_path(path).unwrap_or_default();
        Ok(Project::persisted(name, path, document))
    }

    /// Loads the project saved under `name`.
    pub fn find(&self, name: &str) -> Result<Project, ProjectError> {
        let path = self.path_for(name)?;
        self.load(&path)
    }

    /// Writes `document` as `<root>/<name>.<ext>`, replacing any existing file.
    /// 將文件寫入 `<root>/<name>.<ext>`，若已存在則直接覆寫。
    pub fn save(&self, name: &str, document: &ProjectDocument) -> Result<Project, ProjectError> {
        let path = self.path_for(name)?;
        let mut document = document.clone();
        if self.config.dedup_folders {
            let removed = document.dedup_folders();
            if removed > 0 {
                debug!(project = name.trim(), removed, "dropped duplicate folders");
            }
        }
        self.write_document(name.trim(), &path, &document)?;
        Ok(Project::persisted(name.trim(), path, document))
    }

    /// Saves a project in place; unsaved projects get a path derived from
    /// their name.
    /// 就地儲存專案；尚未儲存者依名稱產生路徑。
    pub fn save_project(&self, project: &mut Project) -> Result<PathBuf, ProjectError> {
        let path = match project.path() {
            Some(path) if project.is_persisted() => path.to_path_buf(),
            _ => self.path_for(project.name())?,
        };
        if self.config.dedup_folders {
            let mut document = project.document().clone();
            document.dedup_folders();
            project.set_document(document);
        }
        self.write_document(project.name(), &path, project.document())?;
        project.set_path(path.clone());
        Ok(path)
    }

    /// Deletes a project file. Missing files are reported as `NotFound`.
    /// 刪除專案檔；檔案不存在時回傳 `NotFound`。
    pub fn remove(&self, path: &Path) -> Result<PathBuf, ProjectError> {
        fs::remove_file(path).map_err(|err| ProjectError::from_io(path.to_path_buf(), err))?;
        debug!(file = %path.display(), "removed project file");
        Ok(path.to_path_buf())
    }

    fn has_project_extension(&self, path: &Path) -> bool {
        path.extension()
            .is_some_and(|ext| ext.to_string_lossy() == self.config.extension)
    }

    fn write_document(
        &self,
        name: &str,
        path: &Path,
        document: &ProjectDocument,
    ) -> Result<(), ProjectError> {
        let payload =
            serde_json::to_vec_pretty(document).map_err(|source| ProjectError::Serialize {
                name: name.to_string(),
                source,
            })?;
        write_replacing(path, &payload)?;
        debug!(file = %path.display(), "saved project file");
        Ok(())
    }
}

/// Writes through a sibling temp file and renames it over the target.
fn write_replacing(path: &Path, data: &[u8]) -> Result<(), ProjectError> {
    let io_error = |source| ProjectError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);
    fs::write(&tmp_path, data).map_err(io_error)?;
    fs::rename(&tmp_path, path).map_err(io_error)
}
