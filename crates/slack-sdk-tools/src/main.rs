//! sdk-tools - Build tasks and client code generation for the Slack SDK

use anyhow::Result;
use clap::{Args as ClapArgs, Parser, Subcommand};
use colored::Colorize;
use sdk_tasks_core::codegen::ClientShape;
use sdk_tasks_core::commands::{Invocation, Operation};
use sdk_tasks_core::{ProjectConfig, TaskError};
use std::path::PathBuf;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Slack SDK project configuration
#[derive(Clone)]
pub struct SlackSdkConfig;

impl ProjectConfig for SlackSdkConfig {
    fn name(&self) -> &'static str {
        "slack_sdk"
    }

    fn display_name(&self) -> &'static str {
        "slack_sdk"
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
        [
            "pytest>=6.2.5,<7",
            "pytest-asyncio<1",
            "Flask-Sockets>=0.2,<1",
            "Flask>=1,<2",
            "Werkzeug<2",
            "itsdangerous==1.1.0",
            "Jinja2==3.0.3",
            "pytest-cov>=2,<3",
            "codecov>=2,<3",
            "flake8>=4,<5",
            "black==22.3.0",
            "click==8.0.4",
            "psutil>=5,<6",
            "databases>=0.5",
            "boto3<=2",
            "moto>=3,<4",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    fn regenerate_command(&self) -> &'static str {
        "sdk-tools codegen"
    }

    fn python_env(&self) -> &'static str {
        "SDK_TOOLS_PYTHON"
    }
}

#[derive(Parser, Debug)]
#[command(name = "sdk-tools")]
#[command(about = "Build tasks and client code generation for the Slack SDK")]
#[command(version)]
pub struct Args {
    /// Project root containing the packages and tests
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Increase log verbosity (-v, -vv, -vvv); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Regenerate the async and legacy clients from the canonical client
    Codegen,
    /// Run the formatter, the linter and unit tests with coverage
    Validate(TestTargetArgs),
    /// Run unit tests
    #[command(name = "unit_tests")]
    UnitTests(TestTargetArgs),
    /// Run integration tests
    #[command(name = "integration_tests")]
    IntegrationTests(TestTargetArgs),
    /// Build and publish the package
    Upload,
}

#[derive(ClapArgs, Debug)]
pub struct TestTargetArgs {
    /// Test path under the test root (e.g. web/test_web_client.py)
    #[arg(short = 'i', long = "test-target")]
    pub test_target: Option<String>,
}

impl From<Command> for Invocation {
    fn from(command: Command) -> Self {
        let (operation, target) = match command {
            Command::Codegen => (Operation::Codegen, None),
            Command::Validate(args) => (Operation::Validate, args.test_target),
            Command::UnitTests(args) => (Operation::UnitTests, args.test_target),
            Command::IntegrationTests(args) => (Operation::IntegrationTests, args.test_target),
            Command::Upload => (Operation::Upload, None),
        };
        Invocation {
            operation,
            test_target: target,
        }
    }
}

fn init_tracing(verbose: u8) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,sdk_tasks_core=info".to_string(),
            2 => "info,sdk_tasks_core=debug".to_string(),
            _ => "debug,sdk_tasks_core=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Interrupted runs may leave one variant regenerated and the other stale
    ctrlc::set_handler(move || {
        eprintln!();
        eprintln!("{}", "Interrupted".yellow());
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    init_tracing(args.verbose);

    let config = SlackSdkConfig;
    let invocation = Invocation::from(args.command);
    tracing::debug!(?invocation, root = %args.root.display(), "parsed command line");

    match sdk_tasks_core::run(&config, &invocation, args.root).await {
        Ok(()) => Ok(()),
        Err(err @ TaskError::ProcessFailed { .. }) => {
            // The child already reported its failure on the shared stderr
            eprintln!("{} {}", "Error:".red().bold(), err);
            std::process::exit(err.exit_code());
        }
        Err(err) => Err(anyhow::Error::new(err)
            .context(format!("{} failed", invocation.operation))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use sdk_tasks_core::commands::lookup;

    #[test]
    fn test_cli_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_every_subcommand_is_a_known_operation() {
        let cli = Args::command();
        for sub in cli.get_subcommands().filter(|s| s.get_name() != "help") {
            let spec = lookup(sub.get_name())
                .unwrap_or_else(|| panic!("no operation named {}", sub.get_name()));
            let takes_target = sub.get_arguments().any(|a| a.get_id() == "test_target");
            assert_eq!(takes_target, !spec.options.is_empty(), "{}", spec.name);
        }
    }

    #[test]
    fn test_parse_test_target() {
        let args = Args::parse_from(["sdk-tools", "unit_tests", "--test-target", "tests/web"]);
        let invocation = Invocation::from(args.command);
        assert_eq!(invocation.operation, Operation::UnitTests);
        assert_eq!(invocation.test_target.as_deref(), Some("tests/web"));
    }

    #[test]
    fn test_short_test_target_flag() {
        let args = Args::parse_from(["sdk-tools", "integration_tests", "-i", "web"]);
        assert_eq!(
            Invocation::from(args.command),
            Invocation::new(Operation::IntegrationTests).with_test_target("web")
        );
    }

    #[test]
    fn test_global_root_flag() {
        let args = Args::parse_from(["sdk-tools", "codegen", "--root", "/src/python-slack-sdk"]);
        assert_eq!(args.root, PathBuf::from("/src/python-slack-sdk"));
        assert_eq!(Invocation::from(args.command), Invocation::new(Operation::Codegen));
    }

    #[test]
    fn test_banner_points_at_canonical_client() {
        let profiles = SlackSdkConfig.profiles();
        assert!(profiles[0]
            .header_banner
            .contains("#  1) Modify slack_sdk/web/client.py"));
        assert!(profiles[0].header_banner.contains("Run `sdk-tools codegen`"));
        assert_eq!(
            profiles[1].output_path,
            PathBuf::from("slack_sdk/web/legacy_client.py")
        );
    }
}
