//! Shared test fixtures: a Slack-shaped project and a recording runner
//!
//! Also compiled into the integration tests, so paths go through the crate name.

#![allow(dead_code)]

use sdk_tasks_core::codegen::ClientShape;
use sdk_tasks_core::error::{TaskError, TaskResult};
use sdk_tasks_core::process::{CommandLine, CommandRunner};
use sdk_tasks_core::project::ProjectConfig;
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Clone)]
pub struct TestProject;

impl ProjectConfig for TestProject {
    fn name(&self) -> &'static str {
        "slack_sdk"
    }

    fn display_name(&self) -> &'static str {
        "Slack SDK"
    }

    fn client_shape(&self) -> ClientShape {
        ClientShape {
            package: "slack_sdk".to_string(),
            canonical_path: PathBuf::from("slack_sdk/web/client.py"),
            class_name: "WebClient".to_string(),
            base_class: "BaseClient".to_string(),
            response_type: "SlackResponse".to_string(),
            base_module: "base_client".to_string(),
        }
    }

    fn packages(&self) -> Vec<String> {
        vec!["slack".to_string(), "slack_sdk".to_string()]
    }

    fn codegen_dependencies(&self) -> Vec<String> {
        vec!["black==22.3.0".to_string()]
    }

    fn validate_dependencies(&self) -> Vec<String> {
        vec!["pytest>=6.2.5,<7".to_string(), "flake8>=4,<5".to_string()]
    }

    fn regenerate_command(&self) -> &'static str {
        "sdk-tools codegen"
    }

    fn python_env(&self) -> &'static str {
        "SDK_TOOLS_TEST_PYTHON"
    }
}

/// Records every command; fails those whose description contains `fail_on`
#[derive(Default)]
pub struct RecordingRunner {
    pub fail_on: Option<(&'static str, i32)>,
    pub commands: Mutex<Vec<CommandLine>>,
}

impl RecordingRunner {
    pub fn failing_on(description: &'static str, code: i32) -> Self {
        Self {
            fail_on: Some((description, code)),
            commands: Mutex::new(Vec::new()),
        }
    }

    pub fn descriptions(&self) -> Vec<String> {
        self.commands
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.description.clone())
            .collect()
    }
}

impl CommandRunner for RecordingRunner {
    async fn run(&self, command: &CommandLine) -> TaskResult<()> {
        self.commands.lock().unwrap().push(command.clone());
        match self.fail_on {
            Some((needle, code)) if command.description.contains(needle) => {
                Err(TaskError::ProcessFailed {
                    description: command.description.clone(),
                    command: command.display(),
                    code,
                })
            }
            _ => Ok(()),
        }
    }
}

/// The canonical client used across tests
pub const CANONICAL_CLIENT: &str = r#""""A Python module for interacting with Slack's Web API."""
import os
from typing import Union, Optional

from .base_client import BaseClient, SlackResponse


class WebClient(BaseClient):
    """A WebClient allows apps to communicate with the Slack Platform's Web API.

    Example of recommended usage:
    ```python
        from slack_sdk import WebClient

        client = WebClient(token=os.environ['SLACK_API_TOKEN'])
    ```
    """

    def api_test(self, **kwargs) -> SlackResponse:
        """Checks API calling code."""
        return self.api_call("api.test", params=kwargs)

    def chat_postMessage(
        self,
        *,
        channel: str,
        text: Optional[str] = None,
        **kwargs,
    ) -> SlackResponse:
        """Sends a message to a channel."""
        kwargs.update({"channel": channel, "text": text})
        return self.api_call("chat.postMessage", json=kwargs)
"#;
