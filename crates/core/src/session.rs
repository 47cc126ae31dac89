//! Running a whole document
//!
//! A session runs a document in two passes. The first pass parses it silently
//! under the initial settings and resolves every active `Settings:` section
//! into a timeline of settings keyed by the line they start governing. The
//! second pass scans and parses the document again, this time using the
//! timeline for comment handling and diagnostics, and runs the active sections.

use crate::config::{Platform, Settings, SettingsSchema, SettingsSource, parse_settings_text};
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::parser::{SectionKind, active_sections, parse, scan, settings_content};
use crate::runner::{RunStatistics, Runner};
use serde_json::Map;
use std::collections::HashMap;
use std::io::Write;
use tempfile::TempDir;
use tracing::{debug, warn};

/// Settings in effect for each stretch of a document
#[derive(Debug, Clone)]
pub struct SettingsTimeline {
    /// Sorted by first governed line; the first entry starts at line 0
    entries: Vec<(usize, Settings)>,
}

impl SettingsTimeline {
    pub fn new(initial: Settings) -> Self {
        Self {
            entries: vec![(0, initial)],
        }
    }

    /// Make `settings` govern every line from `first_line` on
    pub fn push(&mut self, first_line: usize, settings: Settings) {
        self.entries.retain(|(line, _)| *line < first_line);
        self.entries.push((first_line, settings));
    }

    /// Settings governing the 0-based line `line`
    pub fn at(&self, line: usize) -> &Settings {
        let index = self.entries.partition_point(|(first, _)| *first <= line);
        &self.entries[index.saturating_sub(1)].1
    }

    /// Settings governing the end of the document
    pub fn last(&self) -> &Settings {
        &self.entries[self.entries.len() - 1].1
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One configured run of .many documents
#[derive(Debug)]
pub struct Session {
    settings: Option<SettingsSource>,
    schema: SettingsSchema,
    platform: Platform,
    diagnostics: Diagnostics,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            settings: None,
            schema: SettingsSchema::builtin().clone(),
            platform: Platform::current(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Use caller-provided settings; embedded `Settings:` sections are then ignored
    pub fn with_settings(mut self, settings: SettingsSource) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn with_schema(mut self, schema: SettingsSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    fn resolve(
        &self,
        overrides: &Map<String, serde_json::Value>,
        issues: &mut Vec<String>,
    ) -> Settings {
        let (settings, found) =
            Settings::resolve_with_issues(&self.schema, overrides, self.platform);
        issues.extend(found);
        settings
    }

    fn report_all(&mut self, issues: Vec<String>, settings: &Settings) {
        self.diagnostics.set_enabled(settings.globals().show_errors);
        for issue in issues {
            self.diagnostics.report(issue);
        }
    }

    /// Settings the document starts with
    fn initial_settings(&mut self) -> Settings {
        let mut issues = Vec::new();
        let overrides = match &self.settings {
            Some(source) => source.load(&mut issues),
            None => Map::new(),
        };
        let settings = self.resolve(&overrides, &mut issues);
        self.report_all(issues, &settings);
        settings
    }

    /// First pass: resolve embedded settings sections into a timeline
    ///
    /// Issues found while resolving a section are returned keyed by its header
    /// line so they surface when the second pass reaches it.
    fn build_timeline(
        &self,
        document: &str,
        initial: Settings,
    ) -> (SettingsTimeline, HashMap<usize, Vec<String>>) {
        let run_comments = initial.globals().run_comments;
        let mut timeline = SettingsTimeline::new(initial);
        let mut issues_by_line = HashMap::new();
        if self.settings.is_some() {
            return (timeline, issues_by_line);
        }

        let scanned = scan(document, |_| run_comments);
        let sections = parse(&scanned, |_, _| {});
        for section in active_sections(&sections) {
            if section.kind != SectionKind::Settings {
                continue;
            }
            for snippet in section.active_snippets() {
                let run_blanks = timeline.at(section.header_line).globals().run_blanks;
                let Some(content) = settings_content(snippet, run_blanks) else {
                    continue;
                };
                let mut issues = Vec::new();
                let overrides = parse_settings_text(&content.text, &mut issues);
                let settings = self.resolve(&overrides, &mut issues);
                debug!(
                    "Settings from line {} govern from line {}",
                    content.line_number,
                    section.last_line + 2
                );
                timeline.push(section.last_line + 1, settings);
                issues_by_line
                    .entry(section.header_line)
                    .or_insert_with(Vec::new)
                    .extend(issues);
            }
        }
        (timeline, issues_by_line)
    }

    /// Run `document`, writing the report to `out`
    pub fn run(&mut self, document: &str, out: impl Write) -> Result<RunStatistics> {
        let initial = self.initial_settings();
        let (timeline, mut issues_by_line) = self.build_timeline(document, initial);
        debug!("Settings timeline has {} entries", timeline.len());

        let scanned = scan(document, |line| timeline.at(line).globals().run_comments);
        let diagnostics = &mut self.diagnostics;
        let sections = parse(&scanned, |line, message| {
            diagnostics.set_enabled(timeline.at(line).globals().show_errors);
            diagnostics.report(message);
        });

        let directory = TempDir::new()?;
        let mut runner = Runner::new(out, directory.path());
        for section in active_sections(&sections) {
            let settings = timeline.at(section.header_line);
            if section.kind == SectionKind::Settings {
                if self.settings.is_some() {
                    debug!(
                        "Ignoring embedded settings at line {} in favor of provided settings",
                        section.header_line + 1
                    );
                    continue;
                }
                if let Some(issues) = issues_by_line.remove(&section.header_line) {
                    self.report_all(issues, timeline.at(section.last_line + 1));
                }
            }
            self.diagnostics.set_enabled(settings.globals().show_errors);
            runner.run_section(section, settings, &mut self.diagnostics)?;
        }

        let stats = runner.finish(timeline.last())?;
        if let Err(e) = directory.close() {
            warn!("Could not remove temporary directory: {}", e);
        }
        Ok(stats)
    }
}
