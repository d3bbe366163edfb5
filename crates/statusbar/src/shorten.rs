use std::path::MAIN_SEPARATOR;

/// Marker standing in for the hidden intermediate directories.
/// 代表被省略之中間資料夾的標記。
pub const ELLIPSIS: &str = "...";

/// Shortens `path` using the platform separator, keeping at most `max_dirs`
/// intermediate directories next to the filename.
/// 以平台分隔字元縮短路徑，僅保留最靠近檔名的 `max_dirs` 個中間資料夾。
pub fn shorten(path: &str, max_dirs: usize) -> String {
    shorten_with(path, max_dirs, MAIN_SEPARATOR)
}

/// Same as [`shorten`] with an explicit separator.
///
/// The path is decomposed into a root segment, intermediate segments and the
/// filename. When there are more than `max_dirs` intermediate segments the
/// outermost ones collapse into a single [`ELLIPSIS`]. A leading separator
/// prefix (POSIX root or UNC marker) is re-attached exactly once.
/// 指定分隔字元版本；超過 `max_dirs` 的外層資料夾會合併為一個省略標記。
pub fn shorten_with(path: &str, max_dirs: usize, separator: char) -> String {
    let segments: Vec<&str> = path
        .split(separator)
        .filter(|segment| !segment.is_empty())
        .collect();

    let [root, dirs @ .., filename] = segments.as_slice() else {
        return path.to_string();
    };
    if dirs.len() <= max_dirs {
        return path.to_string();
    }

    let kept = &dirs[dirs.len() - max_dirs..];
    let mut parts = Vec::with_capacity(kept.len() + 3);
    parts.push(*root);
    parts.push(ELLIPSIS);
    parts.extend_from_slice(kept);
    parts.push(*filename);

    let joint = separator.to_string();
    let mut shortened = leading_prefix(path, separator);
    shortened.push_str(&parts.join(joint.as_str()));
    shortened
}

/// Returns the separator run that precedes the root: two separators for UNC
/// paths, one for POSIX-style absolute paths, none for drive paths.
fn leading_prefix(path: &str, separator: char) -> String {
    let leading = path.chars().take_while(|ch| *ch == separator).count();
    std::iter::repeat(separator).take(leading.min(2)).collect()
}
