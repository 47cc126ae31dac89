//! Markers and header grammar of the .many format
//!
//! ```text
//! header        = section-mark? snippet-mark? ws* body ws* ":" rest ;
//! section-mark  = "!!" | "@@" ;
//! snippet-mark  = "!" | "@" ;
//! body          = "Settings"
//!               | "Argv"  ( ws+ "for" word-boundary names )?
//!               | "Stdin" ( ws+ "for" word-boundary names )?
//!               | names ;
//! names         = { any character except ":" } ;
//! also-header   = snippet-mark? ws* "Also" ws* ":" rest ;
//! ```
//!
//! Headers start at column 0 with a non-whitespace character. Headers are tried
//! in the order Settings, Argv, Stdin, Code, and an `Also:` line is never a
//! code header.

use regex::Regex;
use std::sync::LazyLock;

pub const SETTINGS: &str = "Settings";
pub const ARGV: &str = "Argv";
pub const STDIN: &str = "Stdin";
pub const FOR: &str = "for";
pub const ALSO: &str = "Also";
pub const END: &str = "End.";
pub const START: &str = "START:";
pub const STOP: &str = "STOP.";
pub const DISABLER: &str = "!";
pub const SOLOER: &str = "@";
pub const SECTION_DISABLER: &str = "!!";
pub const SECTION_SOLOER: &str = "@@";
pub const SEPARATOR: char = ',';
pub const FINISHER: char = ':';
pub const LEADING_COMMENT: &str = "%";
pub const INLINE_COMMENT: &str = "%%%";
pub const TAB_INDENT: char = '\t';
pub const SPACE_INDENT_WIDTH: usize = 4;

const HEADER_START: &str = r"^(!!|@@)?(!|@)?\s*";
const HEADER_END: &str = r"\s*:";

static SETTINGS_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("{HEADER_START}({SETTINGS}){HEADER_END}")).expect("valid settings header")
});

static ARGV_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"{HEADER_START}{ARGV}(?:\s+{FOR}\b([^:]*))?{HEADER_END}"))
        .expect("valid argv header")
});

static STDIN_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"{HEADER_START}{STDIN}(?:\s+{FOR}\b([^:]*))?{HEADER_END}"))
        .expect("valid stdin header")
});

static CODE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("{HEADER_START}([^:]*){HEADER_END}")).expect("valid code header")
});

static ALSO_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^(!|@)?\s*{ALSO}{HEADER_END}")).expect("valid also header")
});

/// The four kinds of section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Settings,
    Argv,
    Stdin,
    Code,
}

/// Disabled/solo marker of a section or snippet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Marker {
    #[default]
    None,
    Disabled,
    Solo,
}

impl Marker {
    fn from_section_mark(mark: Option<&str>) -> Self {
        match mark {
            Some(SECTION_DISABLER) => Marker::Disabled,
            Some(SECTION_SOLOER) => Marker::Solo,
            _ => Marker::None,
        }
    }

    fn from_snippet_mark(mark: Option<&str>) -> Self {
        match mark {
            Some(DISABLER) => Marker::Disabled,
            Some(SOLOER) => Marker::Solo,
            _ => Marker::None,
        }
    }

    pub fn is_disabled(&self) -> bool {
        *self == Marker::Disabled
    }

    pub fn is_solo(&self) -> bool {
        *self == Marker::Solo
    }
}

/// Everything a header line declares
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub kind: SectionKind,
    pub section_marker: Marker,
    pub snippet_marker: Marker,
    /// Comma separated names as written, empty for Settings and for Argv/Stdin without `for`
    pub raw_language_names: Vec<String>,
}

impl Header {
    /// Render the header back into a line of the .many format
    pub fn to_line(&self) -> String {
        let section_mark = match self.section_marker {
            Marker::Disabled => SECTION_DISABLER,
            Marker::Solo => SECTION_SOLOER,
            Marker::None => "",
        };
        let snippet_mark = match self.snippet_marker {
            Marker::Disabled => DISABLER,
            Marker::Solo => SOLOER,
            Marker::None => "",
        };
        // Names after `for` keep the whitespace that separated them from it
        let names = self.raw_language_names.join(",");
        let targeted = !self.raw_language_names.is_empty();
        let body = match self.kind {
            SectionKind::Settings => SETTINGS.to_string(),
            SectionKind::Argv if targeted => format!("{ARGV} {FOR}{names}"),
            SectionKind::Argv => ARGV.to_string(),
            SectionKind::Stdin if targeted => format!("{STDIN} {FOR}{names}"),
            SectionKind::Stdin => STDIN.to_string(),
            SectionKind::Code => names,
        };
        format!("{section_mark}{snippet_mark}{body}:")
    }
}

fn starts_at_column_zero(line: &str) -> bool {
    line.chars().next().is_some_and(|c| !c.is_whitespace())
}

fn split_names(names: Option<&str>) -> Vec<String> {
    match names {
        Some(names) => names.split(SEPARATOR).map(str::to_string).collect(),
        None => Vec::new(),
    }
}

/// Recognize a section header line
pub fn parse_header(line: &str) -> Option<Header> {
    if !starts_at_column_zero(line) {
        return None;
    }

    let attempts: [(&LazyLock<Regex>, SectionKind); 3] = [
        (&SETTINGS_HEADER, SectionKind::Settings),
        (&ARGV_HEADER, SectionKind::Argv),
        (&STDIN_HEADER, SectionKind::Stdin),
    ];
    for (pattern, kind) in attempts {
        if let Some(caps) = pattern.captures(line) {
            let names = match kind {
                SectionKind::Settings => None,
                _ => caps.get(3).map(|m| m.as_str()),
            };
            return Some(Header {
                kind,
                section_marker: Marker::from_section_mark(caps.get(1).map(|m| m.as_str())),
                snippet_marker: Marker::from_snippet_mark(caps.get(2).map(|m| m.as_str())),
                raw_language_names: split_names(names),
            });
        }
    }

    if is_also_header(line) {
        return None;
    }
    let caps = CODE_HEADER.captures(line)?;
    Some(Header {
        kind: SectionKind::Code,
        section_marker: Marker::from_section_mark(caps.get(1).map(|m| m.as_str())),
        snippet_marker: Marker::from_snippet_mark(caps.get(2).map(|m| m.as_str())),
        raw_language_names: split_names(caps.get(3).map(|m| m.as_str())),
    })
}

/// Recognize an `Also:` continuation line, returning its snippet marker
pub fn parse_also_header(line: &str) -> Option<Marker> {
    if !starts_at_column_zero(line) {
        return None;
    }
    let caps = ALSO_HEADER.captures(line)?;
    Some(Marker::from_snippet_mark(caps.get(1).map(|m| m.as_str())))
}

pub fn is_also_header(line: &str) -> bool {
    parse_also_header(line).is_some()
}

pub fn is_end_marker(line: &str) -> bool {
    line.trim_end().starts_with(END)
}

/// Content lines are blank or start with a tab or a space
pub fn is_content_line(line: &str) -> bool {
    line.trim_end().is_empty() || line.starts_with(TAB_INDENT) || line.starts_with(' ')
}

/// Remove one indent unit: a tab, or 1 to [`SPACE_INDENT_WIDTH`] spaces
pub fn unindent(line: &str) -> &str {
    if let Some(rest) = line.strip_prefix(TAB_INDENT) {
        return rest;
    }
    let spaces = line
        .bytes()
        .take(SPACE_INDENT_WIDTH)
        .take_while(|&b| b == b' ')
        .count();
    &line[spaces..]
}

/// Text after the first `:` of a header line, leading whitespace removed
pub fn header_remainder(line: &str) -> &str {
    match line.find(FINISHER) {
        Some(index) => line[index + FINISHER.len_utf8()..].trim_start(),
        None => "",
    }
}
