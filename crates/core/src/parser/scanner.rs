//! Narrowing a document to its effective range and removing comments

use super::syntax::{INLINE_COMMENT, LEADING_COMMENT, START, STOP};
use std::ops::Range;

/// A document split into lines, with everything outside the effective range
/// and every comment blanked in place so line indices stay stable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedDocument {
    /// Index of the first effective line
    pub first: usize,
    /// One past the index of the last effective line
    pub end: usize,
    pub lines: Vec<String>,
}

impl ScannedDocument {
    pub fn effective_range(&self) -> Range<usize> {
        self.first..self.end.max(self.first)
    }

    pub fn line(&self, index: usize) -> &str {
        self.lines.get(index).map(String::as_str).unwrap_or("")
    }
}

/// Scan `text`, keeping `%%%` literally on lines where `run_comments_at` is true
pub fn scan(text: &str, run_comments_at: impl Fn(usize) -> bool) -> ScannedDocument {
    let mut lines: Vec<String> = text.lines().map(str::to_string).collect();

    let first = lines
        .iter()
        .rposition(|line| line.trim_end().starts_with(START))
        .map_or(0, |index| index + 1);
    let end = lines
        .iter()
        .position(|line| line.trim_end().starts_with(STOP))
        .unwrap_or(lines.len());

    for (index, line) in lines.iter_mut().enumerate() {
        if index < first || index >= end || line.starts_with(LEADING_COMMENT) {
            line.clear();
        } else if !run_comments_at(index) {
            if let Some(position) = line.find(INLINE_COMMENT) {
                line.truncate(position);
            }
        }
    }

    ScannedDocument { first, end, lines }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_comments(text: &str) -> ScannedDocument {
        scan(text, |_| false)
    }

    #[test]
    fn test_whole_document_by_default() {
        let doc = strip_comments("a\nb\nc");
        assert_eq!(doc.effective_range(), 0..3);
        assert_eq!(doc.lines, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_last_start_and_first_stop_win() {
        let doc = strip_comments("x\nSTART:\ny\nSTART:  \nz\nw\nSTOP.\nv\nSTOP.\nu");
        assert_eq!(doc.effective_range(), 4..6);
        assert_eq!(doc.lines, vec!["", "", "", "", "z", "w", "", "", "", ""]);
    }

    #[test]
    fn test_stop_before_start_is_empty() {
        let doc = strip_comments("STOP.\nPython: print(1)\nSTART:");
        assert!(doc.effective_range().is_empty());
        assert!(doc.lines.iter().all(String::is_empty));
    }

    #[test]
    fn test_markers_must_start_the_line() {
        let doc = strip_comments(" START:\na\n\tSTOP.");
        assert_eq!(doc.effective_range(), 0..3);
    }

    #[test]
    fn test_comments() {
        let doc = strip_comments("% whole line\n\tprint(1) %%% note\n  % kept");
        assert_eq!(doc.lines, vec!["", "\tprint(1) ", "  % kept"]);
    }

    #[test]
    fn test_run_comments_keeps_inline_marker() {
        let doc = scan("a %%% b\nc %%% d", |index| index == 1);
        assert_eq!(doc.lines, vec!["a ", "c %%% d"]);
    }

    #[test]
    fn test_crlf_lines() {
        let doc = strip_comments("Python:\r\n\tprint(1)\r\n");
        assert_eq!(doc.lines, vec!["Python:", "\tprint(1)"]);
        assert_eq!(doc.line(10), "");
    }
}
