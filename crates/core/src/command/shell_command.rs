use crate::config::Policy;
use crate::error::{Error, Result};
use std::fmt;
use std::io::{Read, Write};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use wait_timeout::ChildExt;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitMarker {
    Code(i32),
    /// Killed after exceeding the time limit, shown as `T`
    TimedOut,
    /// Ended without an exit code (e.g. by a signal), shown as `?`
    Terminated,
}

impl ExitMarker {
    pub fn is_success(&self) -> bool {
        *self == ExitMarker::Code(0)
    }
}

impl fmt::Display for ExitMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitMarker::Code(code) => write!(f, "{code}"),
            ExitMarker::TimedOut => write!(f, "T"),
            ExitMarker::Terminated => write!(f, "?"),
        }
    }
}

/// Raw result of executing a [`ShellCommand`]
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutcome {
    /// Stdout, with stderr folded in according to the stderr policy
    pub output: String,
    pub exit: ExitMarker,
    pub elapsed: Duration,
}

/// A command line run through the platform shell
#[derive(Debug, Clone)]
pub struct ShellCommand {
    pub command: String,
    pub stdin: Option<String>,
    /// Time limit in seconds
    pub timeout: f64,
    pub stderr: Policy,
}

impl ShellCommand {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            stdin: None,
            timeout: f64::INFINITY,
            stderr: Policy::Smart,
        }
    }

    pub fn with_stdin(mut self, stdin: impl Into<String>) -> Self {
        self.stdin = Some(stdin.into());
        self
    }

    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout = seconds;
        self
    }

    pub fn with_stderr(mut self, stderr: Policy) -> Self {
        self.stderr = stderr;
        self
    }

    fn shell(&self) -> Command {
        #[cfg(windows)]
        {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(&self.command);
            cmd
        }
        #[cfg(not(windows))]
        {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(&self.command);
            cmd
        }
    }

    /// Run to completion or until the time limit, then kill
    ///
    /// Only a failure to start the shell is an error; timeouts and nonzero
    /// exits are ordinary outcomes.
    pub fn execute(&self) -> Result<CommandOutcome> {
        let mut cmd = self.shell();
        cmd.stdin(if self.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });

        let merged_reader = match self.stderr {
            Policy::Yes => {
                let (reader, writer) = std::io::pipe()?;
                cmd.stdout(writer.try_clone()?).stderr(writer);
                Some(reader)
            }
            Policy::No => {
                cmd.stdout(Stdio::piped()).stderr(Stdio::null());
                None
            }
            Policy::Smart => {
                cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
                None
            }
        };

        debug!("Spawning: {}", self.command);
        let start = Instant::now();
        let mut child = cmd.spawn().map_err(|source| Error::SpawnError {
            command: self.command.clone(),
            source,
        })?;
        // The command still owns the write ends of a merged pipe
        drop(cmd);

        if let Some(input) = self.stdin.clone()
            && let Some(mut child_stdin) = child.stdin.take()
        {
            thread::spawn(move || {
                if let Err(e) = child_stdin.write_all(input.as_bytes()) {
                    debug!("Child stopped reading stdin: {}", e);
                }
            });
        }

        let stdout_handle = match merged_reader {
            Some(reader) => Some(thread::spawn(move || read_all(reader))),
            None => child.stdout.take().map(|out| thread::spawn(move || read_all(out))),
        };
        let stderr_handle = child.stderr.take().map(|err| thread::spawn(move || read_all(err)));

        let status = match wait(&mut child, self.timeout)? {
            Some(status) => status,
            None => {
                warn!("Command timed out after {}s, killing: {}", self.timeout, self.command);
                if let Err(e) = child.kill() {
                    debug!("Kill after timeout failed: {}", e);
                }
                // Readers may still be blocked on pipes held by grandchildren
                if let Err(e) = child.wait() {
                    debug!("Reaping timed out child failed: {}", e);
                }
                return Ok(CommandOutcome {
                    output: format!("TIMED OUT OF {}s LIMIT", self.timeout),
                    exit: ExitMarker::TimedOut,
                    elapsed: start.elapsed(),
                });
            }
        };
        let elapsed = start.elapsed();

        let mut output = join(stdout_handle);
        let errors = join(stderr_handle);

        let exit = status.code().map_or(ExitMarker::Terminated, ExitMarker::Code);
        if self.stderr == Policy::Smart && !exit.is_success() {
            output.push_str(&errors);
        }

        debug!("Command finished with exit {} in {:?}", exit, elapsed);
        Ok(CommandOutcome { output, exit, elapsed })
    }
}

/// Wait for `child`, giving up after `timeout` seconds
///
/// Non-positive or NaN limits expire at once; limits too large for a
/// `Duration` never expire.
fn wait(child: &mut Child, timeout: f64) -> Result<Option<std::process::ExitStatus>> {
    let limit = if timeout.is_nan() || timeout <= 0.0 {
        Some(Duration::ZERO)
    } else {
        Duration::try_from_secs_f64(timeout).ok()
    };
    match limit {
        Some(limit) => Ok(child.wait_timeout(limit)?),
        None => Ok(Some(child.wait()?)),
    }
}

fn read_all<R: Read>(mut reader: R) -> String {
    let mut bytes = Vec::new();
    if let Err(e) = reader.read_to_end(&mut bytes) {
        debug!("Reading child output failed: {}", e);
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

fn join(handle: Option<thread::JoinHandle<String>>) -> String {
    match handle.map(|h| h.join()) {
        Some(Ok(text)) => text,
        Some(Err(_)) => {
            warn!("Output reader thread panicked");
            String::new()
        }
        None => String::new(),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_exit_marker_display() {
        assert_eq!(ExitMarker::Code(3).to_string(), "3");
        assert_eq!(ExitMarker::TimedOut.to_string(), "T");
        assert_eq!(ExitMarker::Terminated.to_string(), "?");
        assert!(ExitMarker::Code(0).is_success());
        assert!(!ExitMarker::TimedOut.is_success());
    }

    #[test]
    fn test_stdout_and_exit_code() {
        let outcome = ShellCommand::new("echo hi; exit 3").execute().unwrap();
        assert_eq!(outcome.output, "hi\n");
        assert_eq!(outcome.exit, ExitMarker::Code(3));
    }

    #[test]
    fn test_stdin_is_piped() {
        let outcome = ShellCommand::new("cat").with_stdin("a\nb\n").execute().unwrap();
        assert_eq!(outcome.output, "a\nb\n");
        assert!(outcome.exit.is_success());
    }

    #[test]
    fn test_stderr_policies() {
        let script = "echo out; echo err 1>&2";

        let merged = ShellCommand::new(script).with_stderr(Policy::Yes).execute().unwrap();
        assert!(merged.output.contains("out\n"));
        assert!(merged.output.contains("err\n"));

        let dropped = ShellCommand::new(script).with_stderr(Policy::No).execute().unwrap();
        assert_eq!(dropped.output, "out\n");

        let smart_ok = ShellCommand::new(script).with_stderr(Policy::Smart).execute().unwrap();
        assert_eq!(smart_ok.output, "out\n");

        let smart_fail = ShellCommand::new(format!("{script}; exit 1"))
            .with_stderr(Policy::Smart)
            .execute()
            .unwrap();
        assert_eq!(smart_fail.output, "out\nerr\n");
    }

    #[test]
    fn test_timeout_kills() {
        let outcome = ShellCommand::new("sleep 5").with_timeout(0.01).execute().unwrap();
        assert_eq!(outcome.exit, ExitMarker::TimedOut);
        assert_eq!(outcome.output, "TIMED OUT OF 0.01s LIMIT");
        assert!(outcome.elapsed < Duration::from_secs(5));
    }
}
