//! Process execution helpers.
//!
//! External commands are considered "world-touching" and must go through the HAL so we can
//! test workflows without spawning real processes.

use crate::HalResult;
use std::fmt;
use std::path::PathBuf;

/// A fully described command invocation: program, arguments and extra environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Variables added on top of the inherited environment.
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Program followed by its arguments, space separated.
    pub fn command_line(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Process execution trait (external command runner).
pub trait ProcessOps {
    /// Run `spec` with stdout/stderr inherited from this process and wait for it to exit.
    ///
    /// There is no timeout: the caller blocks until the child is done.
    fn run_inherited(&self, spec: &CommandSpec) -> HalResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_joins_program_and_args() {
        let spec = CommandSpec::new("/tmp/x/ld.so")
            .arg("/tmp/x/bcachefs")
            .arg("format")
            .env("LD_LIBRARY_PATH", "/tmp/x");
        assert_eq!(spec.command_line(), "/tmp/x/ld.so /tmp/x/bcachefs format");
        assert_eq!(spec.to_string(), spec.command_line());
    }
}
