//! Status-bar helpers: compact path rendering for constrained widths.
//! 狀態列輔助工具：在有限寬度下精簡顯示檔案路徑。

pub mod shorten;
pub mod status;

pub use shorten::{shorten, shorten_with, ELLIPSIS};
pub use status::{StatusBarPath, StatusEntry, DEFAULT_MAX_DIRS, DEFAULT_STATUS_KEY};
