use std::fmt;
use std::path::Path;
use std::process::Command;

/// Desktop family whose file manager is targeted.
/// （目標檔案管理員所屬的平台。）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    /// Any freedesktop system reachable through `xdg-open`.
    Linux,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Linux
        }
    }
}

/// Program plus arguments that open a path in the file manager.
/// （開啟路徑所需的程式與參數。）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenCommand {
    program: String,
    args: Vec<String>,
}

impl OpenCommand {
    /// Directories are opened directly. Files are revealed where the file
    /// manager supports selecting an item, otherwise their parent is opened.
    /// （資料夾直接開啟；檔案則在支援時選取該檔，否則開啟其上層資料夾。）
    pub fn for_path(platform: Platform, path: &Path, is_dir: bool) -> Self {
        let display = path.to_string_lossy();
        match (platform, is_dir) {
            (Platform::Windows, true) => Self::new("explorer", [display.replace('/', "\\")]),
            (Platform::Windows, false) => Self::new(
                "explorer",
                [format!("/select,{}", display.replace('/', "\\"))],
            ),
            (Platform::MacOs, true) => Self::new("open", [display.into_owned()]),
            (Platform::MacOs, false) => Self::new("open", ["-R".to_string(), display.into_owned()]),
            (Platform::Linux, true) => Self::new("xdg-open", [display.into_owned()]),
            (Platform::Linux, false) => {
                let parent = path
                    .parent()
                    .filter(|parent| !parent.as_os_str().is_empty())
                    .unwrap_or(Path::new("."));
                Self::new("xdg-open", [parent.to_string_lossy().into_owned()])
            }
        }
    }

    fn new<I>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().collect(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }
}

impl fmt::Display for OpenCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
