//! Project files, the store that persists them and the selection flow that
//! picks among them.
//! 專案檔、其儲存區，以及挑選專案的選取流程。

mod error;

pub mod document;
pub mod manager;
pub mod project;
pub mod selection;
pub mod session;
pub mod store;

pub use document::{ProjectDocument, KEY_FOLDERS, KEY_FOLDER_EXCLUDE, KEY_PATH, KEY_SETTINGS};
pub use error::{DocumentError, ProjectError};
pub use manager::{Effect, ProjectManager};
pub use project::Project;
pub use selection::{
    run_selection, EntryFilter, Picker, PickerItem, SelectionFlow, SelectionIntent,
    SelectionOutcome, Step,
};
pub use session::{open_project, SessionDocument};
pub use store::{ProjectIssue, ProjectListing, ProjectStore, ProjectStoreConfig, DEFAULT_EXTENSION};
