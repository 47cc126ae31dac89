//! Turning a snippet's raw lines into the text handed to a run

use super::section::Snippet;
use super::syntax::{TAB_INDENT, header_remainder, unindent};
use crate::config::{GlobalSettings, Language, Policy};

/// Resolved snippet text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    pub text: String,
    /// 1-based line number of the header or `Also:` line the text came from
    pub line_number: usize,
    /// Blank lines written before `text` so file line numbers match the document
    pub prefix_lines: usize,
    pub newline: String,
}

impl Content {
    pub fn prefixed_text(&self) -> String {
        let mut text = self.newline.repeat(self.prefix_lines);
        text.push_str(&self.text);
        text
    }
}

struct Layout<'a> {
    from_top: bool,
    strip: bool,
    tab: &'a str,
    newline: &'a str,
    run_blanks: bool,
}

/// Un-indented lines of a snippet, the header line contributing its text after `:`
fn unindented_lines(snippet: &Snippet) -> Vec<String> {
    snippet
        .lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            if index == 0 {
                let mut first = String::from(TAB_INDENT);
                first.push_str(header_remainder(line));
                unindent(&first).to_string()
            } else {
                unindent(line).to_string()
            }
        })
        .collect()
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Lay out the snippet; `finish` turns the kept lines into the final text
fn resolve(
    snippet: &Snippet,
    layout: Layout<'_>,
    finish: impl FnOnce(&[String], &str) -> String,
) -> Option<Content> {
    let mut lines = unindented_lines(snippet);
    let mut leading_removed = 0;
    if layout.strip {
        leading_removed = lines.iter().take_while(|line| is_blank(line)).count();
        let trailing_blank = lines.iter().rev().take_while(|line| is_blank(line)).count();
        let trailing_kept = lines.len() - trailing_blank;
        lines = if leading_removed >= trailing_kept {
            Vec::new()
        } else {
            lines[leading_removed..trailing_kept].to_vec()
        };
    }
    let lines: Vec<String> = lines.iter().map(|line| line.replace('\t', layout.tab)).collect();

    let joined = lines.join(layout.newline);
    if !layout.run_blanks && is_blank(&joined) {
        return None;
    }

    let prefix_lines = if layout.from_top {
        leading_removed + snippet.first_line
    } else {
        0
    };
    Some(Content {
        text: finish(&lines, &joined),
        line_number: snippet.first_line + 1,
        prefix_lines,
        newline: layout.newline.to_string(),
    })
}

/// Argv text under the global `strip_argv` policy
pub fn argv_content(snippet: &Snippet, globals: &GlobalSettings) -> Option<Content> {
    let layout = Layout {
        from_top: false,
        strip: globals.strip_argv != Policy::No,
        tab: &globals.tab,
        newline: &globals.newline,
        run_blanks: globals.run_blanks,
    };
    match globals.strip_argv {
        Policy::Smart => resolve(snippet, layout, |lines, _| {
            lines.iter().map(|line| line.trim()).collect::<Vec<_>>().join(" ")
        }),
        Policy::Yes => resolve(snippet, layout, |_, joined| joined.trim().to_string()),
        Policy::No => resolve(snippet, layout, |_, joined| joined.to_string()),
    }
}

/// Stdin text under the global `strip_stdin` policy
pub fn stdin_content(snippet: &Snippet, globals: &GlobalSettings) -> Option<Content> {
    let layout = Layout {
        from_top: false,
        strip: globals.strip_stdin != Policy::No,
        tab: &globals.tab,
        newline: &globals.newline,
        run_blanks: globals.run_blanks,
    };
    let newline = globals.newline.as_str();
    match globals.strip_stdin {
        Policy::Smart => resolve(snippet, layout, |_, joined| format!("{joined}{newline}")),
        Policy::Yes | Policy::No => resolve(snippet, layout, |_, joined| joined.to_string()),
    }
}

/// Code text under the language's `strip_code` policy
pub fn code_content(snippet: &Snippet, language: &Language, run_blanks: bool) -> Option<Content> {
    let layout = Layout {
        from_top: language.strip_code != Policy::Yes,
        strip: language.strip_code != Policy::No,
        tab: &language.tab,
        newline: &language.newline,
        run_blanks,
    };
    let newline = language.newline.as_str();
    match language.strip_code {
        Policy::Smart => resolve(snippet, layout, |_, joined| format!("{joined}{newline}")),
        Policy::Yes | Policy::No => resolve(snippet, layout, |_, joined| joined.to_string()),
    }
}

/// JSON text of a `Settings:` snippet
pub fn settings_content(snippet: &Snippet, run_blanks: bool) -> Option<Content> {
    let layout = Layout {
        from_top: false,
        strip: false,
        tab: "\t",
        newline: "\n",
        run_blanks,
    };
    resolve(snippet, layout, |_, joined| joined.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::parser::syntax::Marker;

    fn snippet(first_line: usize, lines: &[&str]) -> Snippet {
        Snippet {
            marker: Marker::None,
            first_line,
            last_line: first_line + lines.len() - 1,
            lines: lines.iter().map(|line| line.to_string()).collect(),
        }
    }

    fn globals() -> GlobalSettings {
        Settings::defaults().globals().clone()
    }

    fn language(strip_code: Policy) -> Language {
        let mut language = Settings::defaults().language("python").unwrap().clone();
        language.strip_code = strip_code;
        language
    }

    #[test]
    fn test_argv_policies() {
        let s = snippet(3, &["Argv:", "", "\t  a  b ", "    c", ""]);
        let mut g = globals();

        let smart = argv_content(&s, &g).unwrap();
        assert_eq!(smart.text, "a  b c");
        assert_eq!(smart.line_number, 4);
        assert_eq!(smart.prefix_lines, 0);

        g.strip_argv = Policy::Yes;
        assert_eq!(argv_content(&s, &g).unwrap().text, "a  b \nc");

        g.strip_argv = Policy::No;
        assert_eq!(argv_content(&s, &g).unwrap().text, "\n\n  a  b \nc\n");
    }

    #[test]
    fn test_stdin_policies() {
        let s = snippet(0, &["Stdin: AA", "    BB", ""]);
        let mut g = globals();

        assert_eq!(stdin_content(&s, &g).unwrap().text, "AA\nBB\n");

        g.strip_stdin = Policy::Yes;
        assert_eq!(stdin_content(&s, &g).unwrap().text, "AA\nBB");

        g.strip_stdin = Policy::No;
        assert_eq!(stdin_content(&s, &g).unwrap().text, "AA\nBB\n");
    }

    #[test]
    fn test_code_policies() {
        let s = snippet(2, &["Python:", "", "\tprint(1)", "\tif x:", "\t\tpass", ""]);

        let smart = code_content(&s, &language(Policy::Smart), false).unwrap();
        assert_eq!(smart.text, "print(1)\nif x:\n\tpass\n");
        assert_eq!(smart.prefix_lines, 4);
        assert_eq!(smart.prefixed_text(), "\n\n\n\nprint(1)\nif x:\n\tpass\n");

        let yes = code_content(&s, &language(Policy::Yes), false).unwrap();
        assert_eq!(yes.text, "print(1)\nif x:\n\tpass");
        assert_eq!(yes.prefix_lines, 0);

        let no = code_content(&s, &language(Policy::No), false).unwrap();
        assert_eq!(no.text, "\n\nprint(1)\nif x:\n\tpass\n");
        assert_eq!(no.prefix_lines, 2);
    }

    #[test]
    fn test_smart_code_keeps_document_line_numbers() {
        let s = snippet(5, &["Python: print(1)", "    print(2)"]);
        let content = code_content(&s, &language(Policy::Smart), false).unwrap();
        let text = content.prefixed_text();
        let file_lines: Vec<&str> = text.split('\n').collect();
        assert_eq!(file_lines[5], "print(1)");
        assert_eq!(file_lines[6], "print(2)");
    }

    #[test]
    fn test_tab_and_newline_replacement() {
        let s = snippet(0, &["Python:", "\tif x:", "\t\tpass"]);
        let mut python = language(Policy::Yes);
        python.tab = "    ".to_string();
        python.newline = "\r\n".to_string();
        let content = code_content(&s, &python, false).unwrap();
        assert_eq!(content.text, "if x:\r\n    pass");
    }

    #[test]
    fn test_blank_snippets() {
        let s = snippet(0, &["Python:", "   ", ""]);
        assert!(code_content(&s, &language(Policy::Smart), false).is_none());
        assert!(stdin_content(&s, &globals()).is_none());

        let kept = code_content(&s, &language(Policy::Smart), true).unwrap();
        assert_eq!(kept.text, "\n");
    }

    #[test]
    fn test_settings_text() {
        let s = snippet(0, &["Settings: {", "\t\"timeout\": 1", "}"]);
        assert_eq!(settings_content(&s, false).unwrap().text, "{\n\"timeout\": 1\n}");
    }
}
