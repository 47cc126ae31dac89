//! Executing parsed sections and reporting each run
//!
//! The runner walks sections in document order. Argv and Stdin sections fill
//! pending buffers, Code sections write each snippet to a temporary file and
//! run it once per argv and stdin combination.

pub mod formatter;
pub mod stats;

pub use stats::RunStatistics;

use crate::command::{ExitMarker, PathParts, ShellCommand};
use crate::config::{Language, Policy, Settings, normalize};
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::parser::{Content, Section, SectionKind, argv_content, code_content, stdin_content};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::debug;

/// One finished run, output already stripped
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub output: String,
    pub exit: ExitMarker,
    pub elapsed: Duration,
    pub command: String,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        self.exit.is_success()
    }
}

/// Apply a `strip_output` policy
pub fn strip_output(output: &str, policy: Policy) -> String {
    match policy {
        Policy::Yes => output.trim().to_string(),
        Policy::No => output.to_string(),
        Policy::Smart => output.trim_end_matches(['\r', '\n']).to_string(),
    }
}

/// Contents set by one Argv or Stdin section, stamped with when they were set
#[derive(Debug, Clone, Default)]
struct Pending {
    contents: Vec<Content>,
    stamp: u64,
}

/// Argv or stdin contents waiting for the next Code section
#[derive(Debug, Clone, Default)]
struct PendingInputs {
    named: HashMap<String, Pending>,
    all: Option<Pending>,
}

impl PendingInputs {
    fn set(&mut self, language_names: &[String], contents: Vec<Content>, stamp: u64) {
        if language_names.is_empty() {
            self.all = Some(Pending { contents, stamp });
            return;
        }
        for name in language_names {
            self.named.insert(
                name.clone(),
                Pending {
                    contents: contents.clone(),
                    stamp,
                },
            );
        }
    }

    /// Whichever of the language's own or the all-languages contents is newer
    fn for_language(&self, normalized: &str) -> &[Content] {
        let named = self.named.get(normalized);
        let newest = match (named, self.all.as_ref()) {
            (Some(named), Some(all)) if all.stamp > named.stamp => Some(all),
            (Some(named), _) => Some(named),
            (None, all) => all,
        };
        newest
            .map(|pending| pending.contents.as_slice())
            .unwrap_or_default()
    }
}

fn with_none(contents: &[Content]) -> Vec<Option<&Content>> {
    if contents.is_empty() {
        vec![None]
    } else {
        contents.iter().map(Some).collect()
    }
}

pub struct Runner<W: Write> {
    out: W,
    directory: PathBuf,
    stats: RunStatistics,
    argvs: PendingInputs,
    stdins: PendingInputs,
    stamp: u64,
    started: Instant,
}

impl<W: Write> Runner<W> {
    /// Runner writing reports to `out` and snippet files into `directory`
    pub fn new(out: W, directory: &Path) -> Self {
        Self {
            out,
            directory: directory.to_path_buf(),
            stats: RunStatistics::new(),
            argvs: PendingInputs::default(),
            stdins: PendingInputs::default(),
            stamp: 0,
            started: Instant::now(),
        }
    }

    pub fn stats(&self) -> &RunStatistics {
        &self.stats
    }

    /// Handle one active section under the settings in effect for it
    pub fn run_section(
        &mut self,
        section: &Section,
        settings: &Settings,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        match section.kind {
            SectionKind::Settings => {
                debug!("Settings section at line {} is active", section.header_line + 1);
                Ok(())
            }
            SectionKind::Argv => {
                let contents = section
                    .active_snippets()
                    .filter_map(|snippet| argv_content(snippet, settings.globals()))
                    .collect();
                self.stamp += 1;
                self.argvs.set(&section.language_names, contents, self.stamp);
                Ok(())
            }
            SectionKind::Stdin => {
                let contents = section
                    .active_snippets()
                    .filter_map(|snippet| stdin_content(snippet, settings.globals()))
                    .collect();
                self.stamp += 1;
                self.stdins.set(&section.language_names, contents, self.stamp);
                Ok(())
            }
            SectionKind::Code => self.run_code_section(section, settings, diagnostics),
        }
    }

    fn run_code_section(
        &mut self,
        section: &Section,
        settings: &Settings,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        for raw_name in &section.raw_language_names {
            let Ok(language) = settings.language(raw_name) else {
                diagnostics.report(format!(
                    "Language \"{}\" on line {} not found in settings. Skipping language.",
                    raw_name.trim(),
                    section.header_line + 1
                ));
                continue;
            };
            for snippet in section.active_snippets() {
                if let Some(code) = code_content(snippet, language, settings.globals().run_blanks) {
                    self.run_code(&normalize(raw_name), language, &code, settings)?;
                }
            }
        }
        Ok(())
    }

    /// Write `code` to a fresh file and run it for every pending argv and stdin
    pub fn run_code(
        &mut self,
        normalized: &str,
        language: &Language,
        code: &Content,
        settings: &Settings,
    ) -> Result<()> {
        let mut extension = language.extension.clone();
        if !extension.is_empty() && !extension.starts_with('.') {
            extension.insert(0, '.');
        }
        let mut file = tempfile::Builder::new()
            .prefix("runmany")
            .suffix(&extension)
            .tempfile_in(&self.directory)?;
        file.write_all(code.prefixed_text().as_bytes())?;
        file.flush()?;
        // Closed so the language's tools can open it on every platform
        let path = file.into_temp_path();
        debug!("Wrote {} snippet to {:?}", language.name, path);

        let parts = PathParts::new(&path);
        let argvs = self.argvs.for_language(normalized).to_vec();
        let stdins = self.stdins.for_language(normalized).to_vec();
        for argv in with_none(&argvs) {
            for stdin in with_none(&stdins) {
                self.run_once(&parts, language, code, argv, stdin, settings)?;
            }
        }
        Ok(())
    }

    fn run_once(
        &mut self,
        parts: &PathParts,
        language: &Language,
        code: &Content,
        argv: Option<&Content>,
        stdin: Option<&Content>,
        settings: &Settings,
    ) -> Result<()> {
        let globals = settings.globals();
        let command = parts.fill_command(
            &language.command,
            argv.map_or("", |argv| argv.text.as_str()),
            &code.text,
        );

        if globals.show_runs {
            if !globals.minimalist {
                writeln!(self.out, "{}", formatter::divider())?;
            }
            write!(self.out, "{}", formatter::headline_start(self.stats.total_runs + 1, language))?;
            self.out.flush()?;
        }

        let mut shell = ShellCommand::new(command.as_str())
            .with_timeout(language.timeout)
            .with_stderr(language.stderr);
        if let Some(stdin) = stdin {
            shell = shell.with_stdin(stdin.text.as_str());
        }
        let executed = shell.execute()?;
        let outcome = RunOutcome {
            output: strip_output(&executed.output, language.strip_output),
            exit: executed.exit,
            elapsed: executed.elapsed,
            command,
        };

        let run_number = self.stats.record_run(outcome.is_success());
        if globals.show_equal {
            self.stats.record_output(run_number, &outcome.output);
        }

        if globals.show_runs {
            writeln!(self.out, "{}", formatter::headline_end(language, &outcome))?;
            formatter::write_run_body(
                &mut self.out,
                language,
                code,
                argv,
                stdin,
                &outcome,
                globals.minimalist,
            )?;
            self.out.flush()?;
        }
        Ok(())
    }

    /// Write the footer under the final settings and hand back the counts
    pub fn finish(mut self, settings: &Settings) -> Result<RunStatistics> {
        let elapsed = self.started.elapsed();
        formatter::write_footer(&mut self.out, &self.stats, settings.globals(), elapsed)?;
        self.out.flush()?;
        Ok(self.stats)
    }
}
