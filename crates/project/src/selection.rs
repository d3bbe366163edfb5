//! Two-step project selection as an explicit state machine.
//! 以明確狀態機實作的兩段式專案選取流程。
//!
//! A flow is created in [`SelectionFlow::AwaitingProjectChoice`] (or directly
//! in [`SelectionFlow::AwaitingEntryChoice`]), shows its [`PickerItem`]s to the
//! host's picker and is consumed by [`SelectionFlow::choose`] with the index
//! the picker reported. Each answer either yields the next state or a final
//! [`SelectionOutcome`]. Because `choose` takes the flow by value, a stale
//! flow can never answer on behalf of a newer one.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::project::Project;

pub const PLACEHOLDER_LABEL: &str = "None";
pub const EMPTY_PROJECT_HINT: &str = "Empty";
const NO_PROJECTS_HINT: &str = "No project files were found.";
const NO_ENTRIES_HINT: &str = "There's no opened folders.";

/// One row of the picker: a label and a second, dimmer line.
/// 選單中的一列：主標籤與說明文字。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerItem {
    pub label: String,
    pub detail: String,
}

impl PickerItem {
    pub fn new(label: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            detail: detail.into(),
        }
    }
}

/// Which filesystem entries the second step offers.
/// 第二步驟要列出的項目類型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryFilter {
    DirsOnly,
    FilesOnly,
    #[default]
    Both,
}

impl EntryFilter {
    fn accepts(self, path: &Path) -> bool {
        match self {
            EntryFilter::DirsOnly => path.is_dir(),
            EntryFilter::FilesOnly => path.is_file(),
            EntryFilter::Both => true,
        }
    }
}

/// What picking a project is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionIntent {
    /// Open the chosen project's folders.
    Open,
    /// Delete the chosen project's file.
    Remove,
    /// Continue into the project and pick a folder or file inside it.
    Browse(EntryFilter),
}

/// Final result of a flow.
/// 選取流程的最終結果。
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionOutcome {
    /// The picker was dismissed.
    Cancelled,
    /// The "None" placeholder was picked.
    Nothing,
    OpenProject(Project),
    RemoveProject(Project),
    /// A directory was picked; open it as the only root folder.
    OpenAsRoot(PathBuf),
    OpenFile(PathBuf),
}

/// Pending selection together with the context it needs to resolve.
/// 等待使用者回應的選取狀態，附帶完成所需的內容。
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionFlow {
    AwaitingProjectChoice {
        intent: SelectionIntent,
        candidates: Vec<Project>,
    },
    AwaitingEntryChoice {
        candidates: Vec<PathBuf>,
    },
}

/// Result of answering a flow.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Prompt(SelectionFlow),
    Done(SelectionOutcome),
}

impl SelectionFlow {
    /// First step: choose among the known projects.
    /// 第一步：從已知專案中挑選。
    pub fn select_project(projects: Vec<Project>, intent: SelectionIntent) -> Self {
        SelectionFlow::AwaitingProjectChoice {
            intent,
            candidates: projects,
        }
    }

    /// Second step: choose an entry within `folders`.
    ///
    /// A single folder offers its direct children; several folders offer the
    /// folders themselves. Entries are filtered and sorted by path.
    /// 第二步：單一資料夾時列出其子項目，多個資料夾時列出資料夾本身。
    pub fn select_entry_within<P: AsRef<Path>>(folders: &[P], filter: EntryFilter) -> Self {
        let mut candidates: Vec<PathBuf> = match folders {
            [] => Vec::new(),
            [root] => children_of(root.as_ref()),
            _ => folders
                .iter()
                .map(|folder| folder.as_ref().to_path_buf())
                .collect(),
        };
        candidates.retain(|path| filter.accepts(path));
        candidates.sort();
        SelectionFlow::AwaitingEntryChoice { candidates }
    }

    /// Rows to show for the current state. Empty candidate lists produce a
    /// single placeholder row.
    /// 目前狀態要顯示的選項；沒有候選項目時只顯示一列佔位項目。
    pub fn items(&self) -> Vec<PickerItem> {
        let (items, hint): (Vec<PickerItem>, &str) = match self {
            SelectionFlow::AwaitingProjectChoice { candidates, .. } => (
                candidates
                    .iter()
                    .map(|project| {
                        PickerItem::new(
                            project.name(),
                            project.first_folder().unwrap_or(EMPTY_PROJECT_HINT),
                        )
                    })
                    .collect(),
                NO_PROJECTS_HINT,
            ),
            SelectionFlow::AwaitingEntryChoice { candidates } => (
                candidates
                    .iter()
                    .map(|path| {
                        let leaf = path
                            .file_name()
                            .map(|name| name.to_string_lossy().into_owned())
                            .unwrap_or_else(|| path.display().to_string());
                        PickerItem::new(leaf, path.display().to_string())
                    })
                    .collect(),
                NO_ENTRIES_HINT,
            ),
        };
        if items.is_empty() {
            vec![PickerItem::new(PLACEHOLDER_LABEL, hint)]
        } else {
            items
        }
    }

    /// Answers the pending choice with the picker's raw index. Negative
    /// indexes mean the picker was dismissed.
    /// 以選單回傳的索引回應；負值代表使用者取消。
    pub fn choose(self, index: isize) -> Step {
        let Ok(index) = usize::try_from(index) else {
            return Step::Done(SelectionOutcome::Cancelled);
        };
        match self {
            SelectionFlow::AwaitingProjectChoice {
                intent,
                mut candidates,
            } => {
                if candidates.is_empty() {
                    return Step::Done(SelectionOutcome::Nothing);
                }
                if index >= candidates.len() {
                    warn!(index, count = candidates.len(), "project choice out of range");
                    return Step::Done(SelectionOutcome::Cancelled);
                }
                let project = candidates.swap_remove(index);
                match intent {
                    SelectionIntent::Open => Step::Done(SelectionOutcome::OpenProject(project)),
                    SelectionIntent::Remove => {
                        Step::Done(SelectionOutcome::RemoveProject(project))
                    }
                    SelectionIntent::Browse(filter) => Step::Prompt(
                        SelectionFlow::select_entry_within(&project.folders(), filter),
                    ),
                }
            }
            SelectionFlow::AwaitingEntryChoice { mut candidates } => {
                if candidates.is_empty() {
                    return Step::Done(SelectionOutcome::Nothing);
                }
                if index >= candidates.len() {
                    warn!(index, count = candidates.len(), "entry choice out of range");
                    return Step::Done(SelectionOutcome::Cancelled);
                }
                let path = candidates.swap_remove(index);
                if path.is_dir() {
                    Step::Done(SelectionOutcome::OpenAsRoot(path))
                } else {
                    Step::Done(SelectionOutcome::OpenFile(path))
                }
            }
        }
    }
}

/// Host-side list picker. Returns the chosen index, or a negative value when
/// the user dismissed the list.
/// 主程式提供的清單選單；回傳所選索引，取消時回傳負值。
pub trait Picker {
    fn pick(&mut self, items: &[PickerItem]) -> isize;
}

impl<F> Picker for F
where
    F: FnMut(&[PickerItem]) -> isize,
{
    fn pick(&mut self, items: &[PickerItem]) -> isize {
        self(items)
    }
}

/// Drives a flow to completion against a synchronous picker.
/// 以同步選單驅動流程直到完成。
pub fn run_selection<P: Picker + ?Sized>(
    mut flow: SelectionFlow,
    picker: &mut P,
) -> SelectionOutcome {
    loop {
        let items = flow.items();
        let index = picker.pick(&items);
        match flow.choose(index) {
            Step::Prompt(next) => flow = next,
            Step::Done(outcome) => return outcome,
        }
    }
}

fn children_of(root: &Path) -> Vec<PathBuf> {
    match fs::read_dir(root) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .collect(),
        Err(err) => {
            warn!(dir = %root.display(), "cannot list folder: {err}");
            Vec::new()
        }
    }
}
