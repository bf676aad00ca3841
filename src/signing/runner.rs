//! External tool execution.
//!
//! All subprocesses go through the [`CommandRunner`] trait so the signing
//! sequence can be exercised without a keychain or `codesign` binary.

use crate::error::{Result, SignError};
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::process::Command;

/// A single external command line.
///
/// Arguments flagged as sensitive are masked when the invocation is displayed
/// or logged, but passed through verbatim when executed.
#[derive(Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<OsString>,
    sensitive: Vec<usize>,
}

impl Invocation {
    /// Creates an invocation of `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            sensitive: Vec::new(),
        }
    }

    /// Appends an argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Appends an argument that must never appear in logs.
    pub fn sensitive_arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.sensitive.push(self.args.len());
        self.arg(arg)
    }

    /// Program name, resolved on `PATH` at execution time.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments in order, unmasked.
    pub fn args(&self) -> &[OsString] {
        &self.args
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for (i, arg) in self.args.iter().enumerate() {
            if self.sensitive.contains(&i) {
                write!(f, " ********")?;
            } else {
                write!(f, " {}", arg.to_string_lossy())?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invocation({})", self)
    }
}

/// Outcome of a finished subprocess.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Whether the process exited with status 0
    pub success: bool,
    /// Captured stdout
    pub stdout: String,
    /// Captured stderr
    pub stderr: String,
}

/// Runs external commands on behalf of the signer.
pub trait CommandRunner {
    /// Runs `invocation` to completion and returns its captured output.
    ///
    /// A non-zero exit is reported through [`CommandOutput::success`]; `Err`
    /// is reserved for commands that could not be started at all.
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        (**self).run(invocation)
    }
}

/// [`CommandRunner`] that spawns real processes and blocks until they exit.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        let path = which::which(invocation.program()).map_err(|e| SignError::Tool {
            program: invocation.program().to_string(),
            reason: format!("not found in PATH: {}", e),
        })?;

        log::debug!("Running: {}", invocation);

        let output = Command::new(&path)
            .args(invocation.args())
            .output()
            .map_err(|e| SignError::Tool {
                program: invocation.program().to_string(),
                reason: format!("failed to execute {}: {}", path.display(), e),
            })?;

        let result = CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !result.stdout.trim().is_empty() {
            log::debug!("{} stdout: {}", invocation.program(), result.stdout.trim());
        }
        if !result.stderr.trim().is_empty() {
            log::debug!("{} stderr: {}", invocation.program(), result.stderr.trim());
        }
        if !result.success {
            log::debug!(
                "{} exited with status {:?}",
                invocation.program(),
                output.status.code()
            );
        }

        Ok(result)
    }
}
