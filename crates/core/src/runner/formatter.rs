//! Text layout of run reports and the closing summary

use super::RunOutcome;
use super::stats::RunStatistics;
use crate::config::{GlobalSettings, Language};
use crate::parser::Content;
use std::io::{self, Write};
use std::time::Duration;

pub const DIVIDER_CHAR: char = '*';
pub const DIVIDER_WIDTH: usize = 60;

pub fn divider() -> String {
    DIVIDER_CHAR.to_string().repeat(DIVIDER_WIDTH)
}

/// `title line N` centered in a row of dashes
pub fn subdivider(title: &str, line_number: usize) -> String {
    format!("{:-^width$}", format!(" {title} line {line_number} "), width = DIVIDER_WIDTH)
}

/// The first line of a run report, up to the language name
pub fn headline_start(run_number: usize, language: &Language) -> String {
    format!("{run_number}. {}", language.name)
}

/// The rest of the first line: time, exit code and command, as enabled
pub fn headline_end(language: &Language, outcome: &RunOutcome) -> String {
    let mut headline = String::new();
    if language.show_time {
        headline.push_str(&format!(" ({:.3}s)", outcome.elapsed.as_secs_f64()));
    }
    if !outcome.exit.is_success() {
        headline.push_str(&format!(" [exit code {}]", outcome.exit));
    }
    if language.show_command {
        headline.push_str(&format!(" > {}", outcome.command));
    }
    headline
}

fn write_part(
    out: &mut impl Write,
    title: &str,
    text: &str,
    line_number: usize,
    trim: bool,
    minimalist: bool,
) -> io::Result<()> {
    if !minimalist {
        writeln!(out, "{}", subdivider(title, line_number))?;
    }
    let text = if trim {
        text.trim_matches(['\r', '\n'])
    } else {
        text
    };
    writeln!(out, "{text}")
}

/// Everything after the headline: the enabled parts and trailing spacing
pub fn write_run_body(
    out: &mut impl Write,
    language: &Language,
    code: &Content,
    argv: Option<&Content>,
    stdin: Option<&Content>,
    outcome: &RunOutcome,
    minimalist: bool,
) -> io::Result<()> {
    if !minimalist {
        if language.show_code {
            write_part(out, "code at", &code.text, code.line_number, true, minimalist)?;
        }
        if language.show_argv
            && let Some(argv) = argv
        {
            write_part(out, "argv at", &argv.text, argv.line_number, true, minimalist)?;
        }
        if language.show_stdin
            && let Some(stdin) = stdin
        {
            write_part(out, "stdin at", &stdin.text, stdin.line_number, true, minimalist)?;
        }
    }
    if language.show_output {
        write_part(out, "output from", &outcome.output, code.line_number, false, minimalist)?;
    }
    for _ in 0..language.spacing {
        writeln!(out)?;
    }
    Ok(())
}

/// Closing divider, success line and equality line, as enabled
pub fn write_footer(
    out: &mut impl Write,
    stats: &RunStatistics,
    globals: &GlobalSettings,
    elapsed: Duration,
) -> io::Result<()> {
    if !globals.minimalist {
        writeln!(out, "{}", divider())?;
    }
    if globals.show_stats {
        let timer = globals.show_time.then_some(elapsed);
        writeln!(out, "{}", stats.summary_line(timer))?;
    }
    if globals.show_equal {
        writeln!(out, "{}", stats.equal_line())?;
    }
    if !globals.minimalist && (globals.show_stats || globals.show_equal) {
        writeln!(out, "{}", divider())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ExitMarker;
    use crate::config::Settings;

    fn python() -> Language {
        Settings::defaults().language("python").unwrap().clone()
    }

    fn outcome(output: &str, exit: ExitMarker) -> RunOutcome {
        RunOutcome {
            output: output.to_string(),
            exit,
            elapsed: Duration::from_millis(250),
            command: "python \"x.py\"".to_string(),
        }
    }

    fn content(text: &str, line_number: usize) -> Content {
        Content {
            text: text.to_string(),
            line_number,
            prefix_lines: 0,
            newline: "\n".to_string(),
        }
    }

    #[test]
    fn test_divider_and_subdivider() {
        assert_eq!(divider().len(), 60);
        assert!(divider().chars().all(|c| c == '*'));
        let sub = subdivider("output from", 3);
        assert_eq!(sub.len(), 60);
        assert_eq!(sub, format!("{} output from line 3 {}", "-".repeat(20), "-".repeat(20)));
    }

    #[test]
    fn test_headline() {
        let mut language = python();
        assert_eq!(headline_start(2, &language), "2. Python");
        assert_eq!(headline_end(&language, &outcome("", ExitMarker::Code(0))), "");
        assert_eq!(
            headline_end(&language, &outcome("", ExitMarker::TimedOut)),
            " [exit code T]"
        );

        language.show_time = true;
        language.show_command = true;
        assert_eq!(
            headline_end(&language, &outcome("", ExitMarker::Code(1))),
            " (0.250s) [exit code 1] > python \"x.py\""
        );
    }

    #[test]
    fn test_run_body_parts() {
        let mut language = python();
        language.show_code = true;
        let code = content("print(1)\n", 4);
        let argv = content("a b", 2);
        let mut out = Vec::new();
        let run = outcome("1\n", ExitMarker::Code(0));
        write_run_body(&mut out, &language, &code, Some(&argv), None, &run, false).unwrap();
        let text = String::from_utf8(out).unwrap();
        let expected = format!(
            "{}\nprint(1)\n{}\na b\n{}\n1\n\n\n",
            subdivider("code at", 4),
            subdivider("argv at", 2),
            subdivider("output from", 4)
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_minimalist_body_is_output_only() {
        let mut language = python();
        language.show_code = true;
        language.spacing = 0;
        let code = content("print(1)", 1);
        let mut out = Vec::new();
        let run = outcome("1", ExitMarker::Code(0));
        write_run_body(&mut out, &language, &code, None, None, &run, true).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1\n");
    }

    #[test]
    fn test_footer() {
        let mut stats = RunStatistics::new();
        let run = stats.record_run(true);
        stats.record_output(run, "x");
        let mut globals = Settings::defaults().globals().clone();

        let mut out = Vec::new();
        write_footer(&mut out, &stats, &globals, Duration::ZERO).unwrap();
        let divider = divider();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!(
                "{divider}\n1/1 program successfully run!\n1/1 had the exact same stdout!\n{divider}\n"
            )
        );

        globals.show_stats = false;
        globals.show_equal = false;
        let mut out = Vec::new();
        write_footer(&mut out, &stats, &globals, Duration::ZERO).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), format!("{divider}\n"));
    }
}
