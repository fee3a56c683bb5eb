//! Error types for build tasks and code generation

use std::path::PathBuf;
use thiserror::Error;

/// Exit status used when a failure has no child process status to forward
pub const GENERIC_FAILURE: i32 = 1;

/// Errors that abort a task pipeline
#[derive(Debug, Error)]
pub enum TaskError {
    /// An external command exited with a nonzero status
    #[error("{description} failed: `{command}` exited with status {code}")]
    ProcessFailed {
        description: String,
        command: String,
        code: i32,
    },

    /// An external command could not be started at all
    #[error("Failed to start `{command}`: {source}")]
    ProcessSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The canonical source could not be read
    #[error("Failed to read canonical source '{}': {source}", path.display())]
    MissingInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A generated artifact could not be written
    #[error("Failed to write generated file '{}': {source}", path.display())]
    WriteArtifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required rewrite rule matched nothing
    #[error("Rule #{ordinal} of the {profile} profile matched nothing (pattern: {pattern:?})")]
    RuleNoMatch {
        profile: String,
        ordinal: usize,
        pattern: String,
    },

    /// A build directory could not be removed
    #[error("Failed to remove '{}': {source}", path.display())]
    RemoveDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An option was passed to an operation that does not accept it
    #[error("Operation '{operation}' does not accept option '{option}'")]
    UnknownOption { operation: String, option: String },

    /// The project configuration file exists but cannot be read
    #[error("Failed to read configuration '{}': {source}", path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The project configuration file is malformed
    #[error("Invalid configuration in '{}': {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The package version could not be read
    #[error("Could not read package version from '{}': {reason}", path.display())]
    Version { path: PathBuf, reason: String },
}

impl TaskError {
    /// Process exit status the CLI should terminate with
    pub fn exit_code(&self) -> i32 {
        match self {
            TaskError::ProcessFailed { code, .. } => *code,
            _ => GENERIC_FAILURE,
        }
    }
}

pub type TaskResult<T> = Result<T, TaskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_failure_forwards_exit_code() {
        let err = TaskError::ProcessFailed {
            description: "Running black".to_string(),
            command: "python3 -m black slack_sdk".to_string(),
            code: 123,
        };
        assert_eq!(err.exit_code(), 123);
        assert!(err.to_string().contains("python3 -m black slack_sdk"));
    }

    #[test]
    fn test_other_errors_use_generic_code() {
        let err = TaskError::UnknownOption {
            operation: "upload".to_string(),
            option: "test_target".to_string(),
        };
        assert_eq!(err.exit_code(), GENERIC_FAILURE);
    }
}
