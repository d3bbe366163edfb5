use std::io::{self, BufRead, Write};

use foldertools_project::{Picker, PickerItem};
use tracing::warn;

/// 以文字列出選項並從輸入讀取索引的選單。 / Numbered-list picker that reads the chosen index from a line of input.
///
/// An empty line, end of input or anything that is not a number dismisses
/// the list.
pub struct LinePicker<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePicker<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn prompt(&mut self, items: &[PickerItem]) -> io::Result<Option<String>> {
        for (index, item) in items.iter().enumerate() {
            writeln!(self.output, "{index:>3}  {}  {}", item.label, item.detail)?;
        }
        write!(
            self.output,
            "Select 0-{} (blank to cancel): ",
            items.len().saturating_sub(1)
        )?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

impl<R: BufRead, W: Write> Picker for LinePicker<R, W> {
    fn pick(&mut self, items: &[PickerItem]) -> isize {
        match self.prompt(items) {
            Ok(Some(line)) => line.trim().parse().unwrap_or(-1),
            Ok(None) => -1,
            Err(err) => {
                warn!("picker input failed: {err}");
                -1
            }
        }
    }
}
