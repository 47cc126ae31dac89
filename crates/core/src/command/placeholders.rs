//! `$placeholder` substitution in language command templates

use std::path::{MAIN_SEPARATOR_STR, Path};

pub const PREFIX: char = '$';

pub const ARGV: &str = "argv";
pub const CODE: &str = "code";
pub const RAWDIR: &str = "rawdir";
pub const DIR: &str = "dir";
pub const RAWFILE: &str = "rawfile";
pub const FILE: &str = "file";
pub const RAWBRANCH: &str = "rawbranch";
pub const BRANCH: &str = "branch";
pub const NAME: &str = "name";
pub const STEM: &str = "stem";
pub const EXT: &str = "ext";
pub const SEP: &str = "sep";

fn quote(text: &str) -> String {
    format!("\"{text}\"")
}

/// The pieces of a snippet file path that templates can refer to
///
/// For `/tmp/dir/file.py`: rawdir `/tmp/dir`, rawfile `/tmp/dir/file.py`,
/// rawbranch `/tmp/dir/file`, name `file.py`, stem `file`, ext `.py`. The
/// `dir`, `file` and `branch` forms are the raw ones wrapped in double quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathParts {
    parts: Vec<(&'static str, String)>,
}

impl PathParts {
    pub fn new(path: &Path) -> Self {
        let rawdir = path.parent().map(|p| p.display().to_string()).unwrap_or_default();
        let rawfile = path.display().to_string();
        let rawbranch = path.with_extension("").display().to_string();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        Self {
            parts: vec![
                (DIR, quote(&rawdir)),
                (RAWDIR, rawdir),
                (FILE, quote(&rawfile)),
                (RAWFILE, rawfile),
                (BRANCH, quote(&rawbranch)),
                (RAWBRANCH, rawbranch),
                (NAME, name),
                (STEM, stem),
                (EXT, ext),
                (SEP, MAIN_SEPARATOR_STR.to_string()),
            ],
        }
    }

    pub fn get(&self, placeholder: &str) -> Option<&str> {
        self.parts
            .iter()
            .find(|(name, _)| *name == placeholder)
            .map(|(_, value)| value.as_str())
    }

    /// Build the command line for one run
    ///
    /// A template without any `$` gets the quoted file path and the argv text
    /// appended. Otherwise each placeholder is replaced in a single left to
    /// right pass, preferring the longest name, so substituted text is never
    /// rescanned.
    pub fn fill_command(&self, template: &str, argv: &str, code: &str) -> String {
        if !template.contains(PREFIX) {
            let mut command = format!("{template} {}", quote(&self.rawfile()));
            if !argv.is_empty() {
                command.push(' ');
                command.push_str(argv);
            }
            return command;
        }

        let mut fills: Vec<(&str, &str)> = self
            .parts
            .iter()
            .map(|(name, value)| (*name, value.as_str()))
            .chain([(ARGV, argv), (CODE, code)])
            .collect();
        fills.sort_by_key(|(name, _)| std::cmp::Reverse(name.len()));

        let mut command = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(position) = rest.find(PREFIX) {
            command.push_str(&rest[..position]);
            let after = &rest[position + PREFIX.len_utf8()..];
            match fills.iter().find(|(name, _)| after.starts_with(name)) {
                Some((name, value)) => {
                    command.push_str(value);
                    rest = &after[name.len()..];
                }
                None => {
                    command.push(PREFIX);
                    rest = after;
                }
            }
        }
        command.push_str(rest);
        command
    }

    fn rawfile(&self) -> String {
        self.get(RAWFILE).unwrap_or_default().to_string()
    }
}
