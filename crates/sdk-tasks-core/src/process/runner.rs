//! Running external commands with inherited output

use crate::error::{TaskError, TaskResult, GENERIC_FAILURE};
use colored::Colorize;
use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command as TokioCommand;

/// One external command and what it is for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// Status line printed before the command runs
    pub description: String,
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn new(description: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// The command as an operator would type it
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Executes external commands, one at a time
pub trait CommandRunner {
    /// Run `command` to completion; a nonzero exit is an error
    fn run(&self, command: &CommandLine) -> impl Future<Output = TaskResult<()>>;
}

/// Runs commands as child processes sharing this process's stdio
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    working_dir: PathBuf,
}

impl ProcessRunner {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }
}

impl CommandRunner for ProcessRunner {
    async fn run(&self, command: &CommandLine) -> TaskResult<()> {
        let shown = command.display();
        println!("{}", command.description.bold());
        println!("{} {}", "Running:".dimmed(), shown.yellow());

        tracing::debug!(
            program = %command.program,
            cwd = %self.working_dir.display(),
            "spawning"
        );

        let status = TokioCommand::new(&command.program)
            .args(&command.args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|source| TaskError::ProcessSpawn {
                command: shown.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            // Killed by a signal: no code to forward
            let code = status.code().unwrap_or(GENERIC_FAILURE);
            tracing::debug!(code, command = %shown, "command failed");
            Err(TaskError::ProcessFailed {
                description: command.description.clone(),
                command: shown,
                code,
            })
        }
    }
}

/// Run a command whose failure should not stop the caller
///
/// Returns whether the command succeeded.
pub async fn run_best_effort<R: CommandRunner>(runner: &R, command: &CommandLine) -> bool {
    match runner.run(command).await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "continuing after best-effort step failed");
            eprintln!("{} {}", "Warning:".yellow(), err);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_joins_program_and_args() {
        let cmd = CommandLine::new("Running black ...", "python3")
            .args(["-m", "black"])
            .arg("/src/slack_sdk");
        assert_eq!(cmd.display(), "python3 -m black /src/slack_sdk");
    }

    #[test]
    fn test_display_without_args() {
        let cmd = CommandLine::new("Checking", "true");
        assert_eq!(cmd.display(), "true");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_process_runner_forwards_exit_status() {
        let runner = ProcessRunner::new(".");
        let cmd = CommandLine::new("Failing on purpose", "sh").args(["-c", "exit 7"]);
        let err = runner.run(&cmd).await.unwrap_err();
        assert_eq!(err.exit_code(), 7);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_process_runner_success() {
        let runner = ProcessRunner::new(".");
        let cmd = CommandLine::new("Succeeding", "sh").args(["-c", "exit 0"]);
        assert!(runner.run(&cmd).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let runner = ProcessRunner::new(".");
        let cmd = CommandLine::new("Nothing", "definitely-not-a-real-program-4821");
        let err = runner.run(&cmd).await.unwrap_err();
        assert!(matches!(err, TaskError::ProcessSpawn { .. }));
        assert!(!run_best_effort(&runner, &cmd).await);
    }
}
