pub mod config;
pub mod store;

pub use config::{Config, FolderOpenerConfig, ProjectsConfig, CONFIG_DIR, CONFIG_FILE};
pub use foldertools_statusbar::StatusBarPath;
pub use store::{ConfigError, ConfigStore};
