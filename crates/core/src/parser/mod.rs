//! Parsing .many documents into sections and snippets
//!
//! Parsing happens on a [`ScannedDocument`], so comments and text outside the
//! `START:`/`STOP.` bounds are already gone. Problems are passed to the
//! caller's `report` callback together with the 0-based line index they were
//! found on; the callback decides whether they are shown.

pub mod content;
pub mod scanner;
pub mod section;
pub mod syntax;

pub use content::{Content, argv_content, code_content, settings_content, stdin_content};
pub use scanner::{ScannedDocument, scan};
pub use section::{Section, Snippet, active_sections};
pub use syntax::{Header, Marker, SectionKind, parse_header};

use syntax::{is_content_line, is_end_marker, parse_also_header};
use tracing::debug;

/// A section whose closing line has not been seen yet
struct OpenSection {
    header: Header,
    header_line: usize,
    snippets: Vec<Snippet>,
    snippet_marker: Marker,
    snippet_first_line: usize,
    snippet_lines: Vec<String>,
}

impl OpenSection {
    fn new(header: Header, header_line: usize, line: &str) -> Self {
        let snippet_marker = header.snippet_marker;
        Self {
            header,
            header_line,
            snippets: Vec::new(),
            snippet_marker,
            snippet_first_line: header_line,
            snippet_lines: vec![line.to_string()],
        }
    }

    fn finish_snippet(&mut self) {
        let lines = std::mem::take(&mut self.snippet_lines);
        let last_line = self.snippet_first_line + lines.len() - 1;
        self.snippets.push(Snippet {
            marker: self.snippet_marker,
            first_line: self.snippet_first_line,
            last_line,
            lines,
        });
    }

    fn start_snippet(&mut self, marker: Marker, index: usize, line: &str) {
        self.finish_snippet();
        self.snippet_marker = marker;
        self.snippet_first_line = index;
        self.snippet_lines.push(line.to_string());
    }

    fn close(mut self) -> Section {
        self.finish_snippet();
        let last_line = self.snippets.last().map_or(self.header_line, |s| s.last_line);
        Section::new(
            self.header.kind,
            self.header.section_marker,
            self.header_line,
            last_line,
            self.header.raw_language_names,
            self.snippets,
        )
    }
}

/// Split the effective lines of `document` into sections
pub fn parse(document: &ScannedDocument, mut report: impl FnMut(usize, String)) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut open: Option<OpenSection> = None;

    for index in document.effective_range() {
        let line = document.line(index);

        if let Some(mut section) = open.take() {
            if is_end_marker(line) {
                sections.push(section.close());
                continue;
            }
            if let Some(header) = parse_header(line) {
                sections.push(section.close());
                open = Some(OpenSection::new(header, index, line));
                continue;
            }
            if let Some(marker) = parse_also_header(line) {
                section.start_snippet(marker, index, line);
            } else if is_content_line(line) {
                section.snippet_lines.push(line.to_string());
            } else {
                report(
                    index,
                    format!("Skipping invalid unindented line {} \"{}\".", index + 1, line),
                );
                section.snippet_lines.push(String::new());
            }
            open = Some(section);
            continue;
        }

        if let Some(header) = parse_header(line) {
            open = Some(OpenSection::new(header, index, line));
        } else if parse_also_header(line).is_some() {
            report(
                index,
                format!(
                    "Line {} \"{}\" is an Also header outside a section. Skipping line.",
                    index + 1,
                    line
                ),
            );
        } else if is_content_line(line) && !line.trim().is_empty() {
            report(
                index,
                format!("Line {} \"{}\" is not part of a section. Skipping line.", index + 1, line),
            );
        }
    }

    if let Some(section) = open {
        sections.push(section.close());
    }

    debug!("Parsed {} sections", sections.len());
    sections
}
