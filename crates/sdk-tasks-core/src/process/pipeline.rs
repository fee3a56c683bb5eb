//! Fail-fast sequence of typed steps

use super::runner::{CommandLine, CommandRunner};
use crate::codegen::VariantOrchestrator;
use crate::error::{TaskError, TaskResult};
use colored::Colorize;
use std::io::ErrorKind;
use std::path::PathBuf;

/// One unit of work in an operation
#[derive(Debug, Clone)]
pub enum Step {
    /// Run an external command; nonzero exit is fatal
    Run(CommandLine),
    /// Delete directories; ones that do not exist are skipped
    RemoveDirs {
        description: String,
        paths: Vec<PathBuf>,
    },
    /// Regenerate the client variants
    Codegen(Box<VariantOrchestrator>),
}

impl Step {
    pub fn description(&self) -> &str {
        match self {
            Step::Run(cmd) => &cmd.description,
            Step::RemoveDirs { description, .. } => description,
            Step::Codegen(_) => "Generating client variants",
        }
    }

    async fn execute<R: CommandRunner>(&self, runner: &R) -> TaskResult<()> {
        match self {
            Step::Run(cmd) => runner.run(cmd).await,
            Step::RemoveDirs { description, paths } => {
                println!("{}", description.bold());
                for path in paths {
                    match tokio::fs::remove_dir_all(path).await {
                        Ok(()) => tracing::debug!(path = %path.display(), "removed"),
                        Err(e) if e.kind() == ErrorKind::NotFound => {}
                        Err(source) => {
                            return Err(TaskError::RemoveDir {
                                path: path.clone(),
                                source,
                            })
                        }
                    }
                }
                Ok(())
            }
            Step::Codegen(orchestrator) => orchestrator.run(runner).await.map(|_| ()),
        }
    }
}

/// Steps executed strictly in order; the first failure stops the rest
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    steps: Vec<Step>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn command(self, command: CommandLine) -> Self {
        self.step(Step::Run(command))
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub async fn run<R: CommandRunner>(&self, runner: &R) -> TaskResult<()> {
        let total = self.steps.len();
        for (index, step) in self.steps.iter().enumerate() {
            tracing::info!(step = index + 1, total, "{}", step.description());
            if let Err(err) = step.execute(runner).await {
                tracing::debug!(step = index + 1, skipped = total - index - 1, "pipeline aborted");
                return Err(err);
            }
        }
        Ok(())
    }
}
