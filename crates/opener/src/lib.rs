//! Opening folders in the platform file manager.
//! （在系統檔案管理員中開啟資料夾。）
//!
//! The opener is fire-and-forget: the file manager is spawned detached and
//! nothing it prints or returns is consumed. Building the command line is kept
//! separate from spawning it so that both the per-platform dispatch and the
//! menu wording can be checked without launching anything.
//! 開啟動作不等待結果；組合指令與實際啟動分開，方便在不啟動程式的情況下驗證。

pub mod command;
pub mod label;

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::thread;

use thiserror::Error;
use tracing::{debug, warn};

pub use command::{OpenCommand, Platform};
pub use label::{menu_label, menu_label_for_counts};

/// Placeholder expanded to the host's packages directory.
pub const PACKAGES_PLACEHOLDER: &str = "$packages";

/// Errors raised while launching the file manager.
/// （啟動檔案管理員時可能發生的錯誤。）
#[derive(Debug, Error)]
pub enum OpenerError {
    #[error("path '{0}' does not exist")]
    MissingPath(PathBuf),
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Shows a path in a file browser.
/// （在檔案瀏覽器中顯示路徑。）
pub trait FolderOpener {
    fn open(&self, path: &Path) -> Result<(), OpenerError>;
}

/// Launches the platform's own file manager.
#[derive(Debug, Clone, Copy)]
pub struct SystemOpener {
    platform: Platform,
}

impl Default for SystemOpener {
    fn default() -> Self {
        Self {
            platform: Platform::current(),
        }
    }
}

impl SystemOpener {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    /// Command line that [`FolderOpener::open`] would run for `path`.
    /// （回傳開啟 `path` 時會執行的指令。）
    pub fn command_for(&self, path: &Path) -> Result<OpenCommand, OpenerError> {
        if !path.exists() {
            return Err(OpenerError::MissingPath(path.to_path_buf()));
        }
        Ok(OpenCommand::for_path(self.platform, path, path.is_dir()))
    }
}

impl FolderOpener for SystemOpener {
    fn open(&self, path: &Path) -> Result<(), OpenerError> {
        let command = self.command_for(path)?;
        debug!(%command, "launching file manager");
        let mut child = command
            .to_command()
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| {
                warn!(program = command.program(), "file manager failed to start: {source}");
                OpenerError::Spawn {
                    program: command.program().to_string(),
                    source,
                }
            })?;
        // Reap the child in the background so it never lingers as a zombie.
        thread::spawn(move || {
            let _ = child.wait();
        });
        Ok(())
    }
}

/// Replaces [`PACKAGES_PLACEHOLDER`] in a configured directory.
/// （將設定中的 `$packages` 替換為實際的套件資料夾。）
pub fn expand_placeholders(dir: &str, packages_path: &Path) -> PathBuf {
    let packages = packages_path.to_string_lossy();
    PathBuf::from(dir.replace(PACKAGES_PLACEHOLDER, &packages))
}
