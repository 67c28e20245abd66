//! External build steps.
//!
//! Every step carries its own working directory; the process-wide current
//! directory is never changed. Commands are argument lists, never shell strings.

use anyhow::{bail, Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// One external command: program, arguments, working directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl Step {
    pub fn new(program: impl Into<String>, cwd: &Path) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.to_path_buf(),
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// The command line without the working directory, e.g. `jlpm run build`.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).current_dir(&self.cwd);
        cmd
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (in {})", self.command_line(), self.cwd.display())
    }
}

/// A unit of work in a build pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Run(Step),
    /// Remove a file or directory tree; a missing path is fine.
    RemovePath(PathBuf),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Run(step) => step.fmt(f),
            Action::RemovePath(path) => write!(f, "remove {}", path.display()),
        }
    }
}

impl From<Step> for Action {
    fn from(step: Step) -> Self {
        Action::Run(step)
    }
}

/// Executes actions, failing on the first one that does not succeed.
pub trait Runner {
    fn execute(&mut self, action: &Action) -> Result<()>;

    fn execute_all(&mut self, actions: &[Action]) -> Result<()> {
        for action in actions {
            self.execute(action)?;
        }
        Ok(())
    }
}

/// Spawns real processes and blocks until each exits.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl Runner for SystemRunner {
    fn execute(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Run(step) => {
                log::info!("$ {}", step.command_line());
                log::debug!("  cwd: {}", step.cwd.display());
                let status = step
                    .to_command()
                    .status()
                    .with_context(|| format!("Error running command: {step}"))?;
                if !status.success() {
                    bail!("Error running command: {step}: {status}");
                }
                Ok(())
            }
            Action::RemovePath(path) => remove_path(path),
        }
    }
}

/// Logs actions without performing them.
#[derive(Debug, Default)]
pub struct DryRunner;

impl Runner for DryRunner {
    fn execute(&mut self, action: &Action) -> Result<()> {
        log::info!("[dry-run] {action}");
        Ok(())
    }
}

fn remove_path(path: &Path) -> Result<()> {
    let meta = match std::fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("nothing to remove at {}", path.display());
            return Ok(());
        }
        Err(e) => return Err(e).with_context(|| format!("Inspecting {}", path.display())),
    };
    log::info!("Removing {}", path.display());
    let removed = if meta.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    removed.with_context(|| format!("Removing {}", path.display()))
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{Action, Runner};
    use anyhow::{bail, Result};

    /// Records every action; optionally fails when a step's command line matches.
    #[derive(Debug, Default)]
    pub struct RecordingRunner {
        pub actions: Vec<Action>,
        pub fail_on: Option<String>,
    }

    impl RecordingRunner {
        pub fn failing_on(command_line: &str) -> Self {
            Self {
                actions: Vec::new(),
                fail_on: Some(command_line.to_string()),
            }
        }

        pub fn command_lines(&self) -> Vec<String> {
            self.actions
                .iter()
                .map(|a| match a {
                    Action::Run(step) => step.command_line(),
                    Action::RemovePath(path) => format!("remove {}", path.display()),
                })
                .collect()
        }
    }

    impl Runner for RecordingRunner {
        fn execute(&mut self, action: &Action) -> Result<()> {
            self.actions.push(action.clone());
            if let (Action::Run(step), Some(fail_on)) = (action, &self.fail_on) {
                if &step.command_line() == fail_on {
                    bail!("Error running command: {step}: exit status: 1");
                }
            }
            Ok(())
        }
    }
}
