//! Sections and snippets produced by the parser

use super::syntax::{Marker, SectionKind};
use crate::config::normalize;

/// One run of content lines after a section header or an `Also:` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub marker: Marker,
    /// 0-based index of the header or `Also:` line
    pub first_line: usize,
    /// 0-based index of the last content line
    pub last_line: usize,
    /// Raw lines from the header line through `last_line`
    pub lines: Vec<String>,
}

impl Snippet {
    pub fn is_disabled(&self) -> bool {
        self.marker.is_disabled()
    }

    pub fn is_solo(&self) -> bool {
        self.marker.is_solo()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    pub marker: Marker,
    /// 0-based index of the header line
    pub header_line: usize,
    /// 0-based index of the last line belonging to the section
    pub last_line: usize,
    pub raw_language_names: Vec<String>,
    pub language_names: Vec<String>,
    pub snippets: Vec<Snippet>,
}

impl Section {
    pub fn new(
        kind: SectionKind,
        marker: Marker,
        header_line: usize,
        last_line: usize,
        raw_language_names: Vec<String>,
        snippets: Vec<Snippet>,
    ) -> Self {
        let language_names = raw_language_names.iter().map(|name| normalize(name)).collect();
        Self {
            kind,
            marker,
            header_line,
            last_line,
            raw_language_names,
            language_names,
            snippets,
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.marker.is_disabled()
    }

    pub fn is_solo(&self) -> bool {
        self.marker.is_solo()
    }

    pub fn has_solo_snippets(&self) -> bool {
        self.snippets.iter().any(Snippet::is_solo)
    }

    /// Snippets that take part in execution: disabled ones dropped, and only
    /// solo ones kept when any snippet is solo
    pub fn active_snippets(&self) -> impl Iterator<Item = &Snippet> {
        let solo_only = self.has_solo_snippets();
        self.snippets
            .iter()
            .filter(move |snippet| !snippet.is_disabled() && (!solo_only || snippet.is_solo()))
    }
}

/// Sections that take part in execution, in document order
pub fn active_sections(sections: &[Section]) -> Vec<&Section> {
    let has_solo_sections = sections.iter().any(Section::is_solo);
    let has_solo_snippets = sections.iter().any(Section::has_solo_snippets);
    sections
        .iter()
        .filter(|section| !section.is_disabled())
        .filter(|section| !has_solo_sections || section.is_solo())
        .filter(|section| !has_solo_snippets || section.has_solo_snippets())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snippet(marker: Marker, first_line: usize) -> Snippet {
        Snippet {
            marker,
            first_line,
            last_line: first_line,
            lines: vec![String::new()],
        }
    }

    fn section(marker: Marker, header_line: usize, snippets: Vec<Snippet>) -> Section {
        Section::new(
            SectionKind::Code,
            marker,
            header_line,
            header_line,
            vec![" Python ".to_string()],
            snippets,
        )
    }

    #[test]
    fn test_language_names_are_normalized() {
        let s = section(Marker::None, 0, vec![snippet(Marker::None, 0)]);
        assert_eq!(s.language_names, vec!["python"]);
        assert_eq!(s.raw_language_names, vec![" Python "]);
    }

    #[test]
    fn test_disabled_snippet_leaves_siblings() {
        let s = section(
            Marker::None,
            0,
            vec![snippet(Marker::Disabled, 0), snippet(Marker::None, 2), snippet(Marker::None, 4)],
        );
        let lines: Vec<usize> = s.active_snippets().map(|s| s.first_line).collect();
        assert_eq!(lines, vec![2, 4]);
    }

    #[test]
    fn test_solo_snippets_win_within_section() {
        let s = section(
            Marker::None,
            0,
            vec![snippet(Marker::None, 0), snippet(Marker::Solo, 2), snippet(Marker::Disabled, 4)],
        );
        let lines: Vec<usize> = s.active_snippets().map(|s| s.first_line).collect();
        assert_eq!(lines, vec![2]);
    }

    #[test]
    fn test_section_filters() {
        let sections = vec![
            section(Marker::Disabled, 0, vec![snippet(Marker::None, 0)]),
            section(Marker::None, 2, vec![snippet(Marker::None, 2)]),
            section(Marker::None, 4, vec![snippet(Marker::None, 4)]),
        ];
        let active: Vec<usize> = active_sections(&sections).iter().map(|s| s.header_line).collect();
        assert_eq!(active, vec![2, 4]);
    }

    #[test]
    fn test_solo_sections_and_solo_snippets_combine() {
        let sections = vec![
            section(Marker::Solo, 0, vec![snippet(Marker::None, 0)]),
            section(Marker::Solo, 2, vec![snippet(Marker::None, 2), snippet(Marker::Solo, 3)]),
            section(Marker::None, 4, vec![snippet(Marker::Solo, 4)]),
        ];
        let active: Vec<usize> = active_sections(&sections).iter().map(|s| s.header_line).collect();
        assert_eq!(active, vec![2]);
    }
}
