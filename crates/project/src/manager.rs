use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ProjectError;
use crate::project::Project;
use crate::selection::{EntryFilter, SelectionFlow, SelectionIntent, SelectionOutcome};
use crate::session::{open_project, SessionDocument};
use crate::store::ProjectStore;

const CLOSED_FALLBACK_NAME: &str = "folders";

/// What the host should do after a manager call.
/// 呼叫管理器後主程式應執行的動作。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Show a message in the status bar.
    Status(String),
    /// Open a file in the editor.
    OpenFile(PathBuf),
    /// Ask the user for a project name, pre-filled with `suggested`, then
    /// call [`ProjectManager::create`].
    RequestName { suggested: String },
}

fn status(message: impl AsRef<str>) -> Effect {
    Effect::Status(format!("Project: {}", message.as_ref()))
}

/// Window-level project commands over a store and the live session.
/// 以儲存區與目前工作階段為基礎的視窗層級專案指令。
#[derive(Debug)]
pub struct ProjectManager {
    store: ProjectStore,
    active: Option<Project>,
}

impl ProjectManager {
    pub fn new(store: ProjectStore) -> Self {
        Self {
            store,
            active: None,
        }
    }

    pub fn store(&self) -> &ProjectStore {
        &self.store
    }

    pub fn active(&self) -> Option<&Project> {
        self.active.as_ref()
    }

    /// Starts a project selection over a fresh directory scan.
    /// 重新掃描資料夾並開始專案選取流程。
    pub fn begin_selection(&self, intent: SelectionIntent) -> SelectionFlow {
        SelectionFlow::select_project(self.store.list().projects, intent)
    }

    /// Picks one of the session's folders' directories as the new root.
    /// 從目前開啟的資料夾中挑選子資料夾作為新的根目錄。
    pub fn begin_scope_to(&self, session: &SessionDocument) -> SelectionFlow {
        SelectionFlow::select_entry_within(&session.folders(), EntryFilter::DirsOnly)
    }

    /// Carries out a finished selection.
    /// 執行已完成的選取結果。
    pub fn apply(
        &mut self,
        outcome: SelectionOutcome,
        session: &mut SessionDocument,
    ) -> Result<Effect, ProjectError> {
        match outcome {
            SelectionOutcome::Cancelled | SelectionOutcome::Nothing => Ok(Effect::None),
            SelectionOutcome::OpenProject(project) => {
                let name = project.name().to_string();
                self.open(project, session);
                Ok(status(format!("{name} opened.")))
            }
            SelectionOutcome::RemoveProject(project) => {
                let path = project
                    .path()
                    .filter(|_| project.is_persisted())
                    .ok_or_else(|| ProjectError::NotPersisted(project.name().to_string()))?;
                self.store.remove(path)?;
                if self
                    .active
                    .as_ref()
                    .is_some_and(|active| active.path() == Some(path))
                {
                    self.active = None;
                }
                Ok(status(format!("{} removed.", project.name())))
            }
            SelectionOutcome::OpenAsRoot(path) => {
                self.open_from_path(&path, session);
                Ok(Effect::None)
            }
            SelectionOutcome::OpenFile(path) => Ok(Effect::OpenFile(path)),
        }
    }

    /// Replaces the session's folders with the project's and marks it active.
    /// 以專案的資料夾取代目前的資料夾，並設為作用中專案。
    pub fn open(&mut self, project: Project, session: &mut SessionDocument) {
        debug!(project = project.name(), "opening project");
        open_project(&project, session);
        self.active = Some(project);
    }

    /// Opens a single directory as an unsaved project.
    pub fn open_from_path(&mut self, dir: &Path, session: &mut SessionDocument) {
        self.open(Project::from_folder(dir), session);
    }

    /// Re-roots the session at the parent of its first folder.
    /// 以第一個資料夾的上層目錄作為新的根目錄。
    pub fn open_parent_folder(&mut self, session: &mut SessionDocument) -> Effect {
        let first = match &self.active {
            Some(project) => project.first_folder().map(PathBuf::from),
            None => session.folders().first().map(PathBuf::from),
        };
        let Some(parent) = first.as_deref().and_then(Path::parent) else {
            return Effect::None;
        };
        let parent = parent.to_path_buf();
        self.open_from_path(&parent, session);
        Effect::None
    }

    /// Clears the session's folders.
    pub fn close(&mut self, session: &mut SessionDocument) -> Effect {
        let name = self
            .active
            .take()
            .map(|project| project.name().to_string())
            .unwrap_or_else(|| CLOSED_FALLBACK_NAME.to_string());
        session.clear();
        status(format!("{name} closed."))
    }

    /// Default name offered when creating a project from the session.
    /// 由目前工作階段建立專案時建議的名稱。
    pub fn suggested_name(&self, session: &SessionDocument) -> Result<String, ProjectError> {
        let folders = session.folders();
        let first = folders.first().ok_or(ProjectError::EmptySelection)?;
        let path = Path::new(first);
        Ok(path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| first.to_string()))
    }

    /// Saves the session as a new project called `name` and makes it active.
    /// 將目前工作階段另存為名為 `name` 的專案並設為作用中。
    pub fn create(
        &mut self,
        name: &str,
        session: &SessionDocument,
    ) -> Result<Effect, ProjectError> {
        let document = session.to_project_document();
        if !document.has_folders() {
            return Err(ProjectError::EmptySelection);
        }
        let project = self.store.save(name, &document)?;
        let message = format!("{} created.", project.name());
        self.active = Some(project);
        Ok(status(message))
    }

    /// Writes the session back to the active project's file. Without a saved
    /// project, asks the host for a name instead.
    /// 將目前狀態寫回作用中專案；若尚未儲存過則要求主程式詢問名稱。
    pub fn save(&mut self, session: &SessionDocument) -> Result<Effect, ProjectError> {
        if let Some(project) = self.active.as_mut().filter(|project| project.is_persisted()) {
            project.set_document(session.to_project_document());
            self.store.save_project(project)?;
            return Ok(status(format!("{} saved.", project.name())));
        }
        Ok(Effect::RequestName {
            suggested: self.suggested_name(session)?,
        })
    }

    /// File backing the active project, for opening it in the editor.
    /// 取得作用中專案的檔案路徑，以便在編輯器中開啟。
    pub fn edit_target(&self) -> Result<PathBuf, ProjectError> {
        let project = self.active.as_ref().ok_or(ProjectError::NoActiveProject)?;
        let path = project
            .path()
            .filter(|_| project.is_persisted())
            .ok_or_else(|| ProjectError::NotPersisted(project.name().to_string()))?;
        if !path.exists() {
            return Err(ProjectError::NotFound(path.to_path_buf()));
        }
        Ok(path.to_path_buf())
    }
}
