use std::path::Path;

/// Context-menu caption for opening the given sidebar selection, or `None`
/// when the entry should stay hidden.
/// （依側邊欄選取內容決定選單文字；不應顯示時回傳 `None`。）
pub fn menu_label<P: AsRef<Path>>(paths: &[P], display_for_files: bool) -> Option<&'static str> {
    let dirs = paths.iter().filter(|path| path.as_ref().is_dir()).count();
    menu_label_for_counts(dirs, paths.len() - dirs, display_for_files)
}

pub fn menu_label_for_counts(
    dirs: usize,
    files: usize,
    display_for_files: bool,
) -> Option<&'static str> {
    if dirs > 1 || (dirs > 0 && files > 0) {
        Some("Open Folders")
    } else if dirs == 1 {
        Some("Open Folder")
    } else if files > 1 && display_for_files {
        Some("Open Containing Folders\u{2026}")
    } else if files > 0 && display_for_files {
        Some("Open Containing Folder\u{2026}")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn counts_pick_caption() {
        assert_eq!(menu_label_for_counts(2, 0, true), Some("Open Folders"));
        assert_eq!(menu_label_for_counts(1, 3, false), Some("Open Folders"));
        assert_eq!(menu_label_for_counts(1, 0, false), Some("Open Folder"));
        assert_eq!(
            menu_label_for_counts(0, 2, true),
            Some("Open Containing Folders\u{2026}")
        );
        assert_eq!(
            menu_label_for_counts(0, 1, true),
            Some("Open Containing Folder\u{2026}")
        );
        assert_eq!(menu_label_for_counts(0, 1, false), None);
        assert_eq!(menu_label_for_counts(0, 0, true), None);
    }

    #[test]
    fn paths_are_classified_on_disk() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("a.txt");
        std::fs::write(&file, "").unwrap();
        assert_eq!(menu_label(&[tmp.path()], true), Some("Open Folder"));
        assert_eq!(
            menu_label(&[file.as_path()], true),
            Some("Open Containing Folder\u{2026}")
        );
        assert_eq!(
            menu_label(&[tmp.path(), file.as_path()], true),
            Some("Open Folders")
        );
    }
}
