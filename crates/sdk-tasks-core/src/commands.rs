//! Named operations and the pipelines they run
//!
//! Every operation is one row of [`OPERATIONS`]: its public name, the options it
//! accepts and the function that turns settings into a [`Pipeline`].

use crate::config::TaskSettings;
use crate::error::{TaskError, TaskResult};
use crate::process::{CommandLine, Pipeline, Step};
use crate::version::{check_release_version, read_package_version};
use std::fmt;

/// Option narrowing the test path under the operation's test root
pub const TEST_TARGET: &str = "test_target";

const UNIT_TEST_ROOT: &str = "tests";
const INTEGRATION_TEST_ROOT: &str = "integration_tests";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Codegen,
    Validate,
    UnitTests,
    IntegrationTests,
    Upload,
}

impl Operation {
    pub fn spec(self) -> &'static OperationSpec {
        &OPERATIONS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A request to run one operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub operation: Operation,
    pub test_target: Option<String>,
}

impl Invocation {
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            test_target: None,
        }
    }

    pub fn with_test_target(mut self, target: impl Into<String>) -> Self {
        self.test_target = Some(target.into());
        self
    }
}

type BuildFn = fn(&TaskSettings, &Invocation) -> TaskResult<Pipeline>;

pub struct OperationSpec {
    pub operation: Operation,
    pub name: &'static str,
    pub description: &'static str,
    pub options: &'static [&'static str],
    build: BuildFn,
}

impl fmt::Debug for OperationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationSpec")
            .field("name", &self.name)
            .field("options", &self.options)
            .finish()
    }
}

/// Indexed by `Operation as usize`
pub static OPERATIONS: &[OperationSpec] = &[
    OperationSpec {
        operation: Operation::Codegen,
        name: "codegen",
        description: "Regenerate the async and legacy clients from the canonical client.",
        options: &[],
        build: build_codegen,
    },
    OperationSpec {
        operation: Operation::Validate,
        name: "validate",
        description: "Run the formatter, the linter and unit tests with coverage.",
        options: &[TEST_TARGET],
        build: build_validate,
    },
    OperationSpec {
        operation: Operation::UnitTests,
        name: "unit_tests",
        description: "Run unit tests.",
        options: &[TEST_TARGET],
        build: build_unit_tests,
    },
    OperationSpec {
        operation: Operation::IntegrationTests,
        name: "integration_tests",
        description: "Run integration tests.",
        options: &[TEST_TARGET],
        build: build_integration_tests,
    },
    OperationSpec {
        operation: Operation::Upload,
        name: "upload",
        description: "Build and publish the package.",
        options: &[],
        build: build_upload,
    },
];

pub fn lookup(name: &str) -> Option<&'static OperationSpec> {
    OPERATIONS.iter().find(|spec| spec.name == name)
}

/// Check the invocation against its table row and build the pipeline
pub fn dispatch(settings: &TaskSettings, invocation: &Invocation) -> TaskResult<Pipeline> {
    let spec = invocation.operation.spec();
    if invocation.test_target.is_some() && !spec.options.contains(&TEST_TARGET) {
        return Err(TaskError::UnknownOption {
            operation: spec.name.to_string(),
            option: TEST_TARGET.to_string(),
        });
    }
    (spec.build)(settings, invocation)
}

/// `<root>/<target>`, tolerating a target that already starts with `<root>/`
pub fn test_path(root: &str, target: Option<&str>) -> String {
    let target = target.unwrap_or_default();
    let prefix = format!("{}/", root);
    let relative = target.strip_prefix(prefix.as_str()).unwrap_or(target);
    format!("{}{}", prefix, relative)
}

fn build_codegen(settings: &TaskSettings, _: &Invocation) -> TaskResult<Pipeline> {
    Ok(Pipeline::new().step(Step::Codegen(Box::new(settings.orchestrator()))))
}

fn build_validate(settings: &TaskSettings, invocation: &Invocation) -> TaskResult<Pipeline> {
    let mut pipeline = Pipeline::new().command(settings.pip_install(
        "Installing test dependencies ...",
        settings.validate_dependencies.iter().cloned(),
    ));

    for package in &settings.packages {
        pipeline = pipeline.command(settings.format(
            format!("Running {} for {} ...", settings.formatter, package),
            &settings.package_dir(package),
        ));
    }
    for package in &settings.packages {
        pipeline = pipeline.command(settings.lint(
            format!("Running flake8 for {} ...", package),
            &settings.package_dir(package),
        ));
    }

    let coverage = format!(
        "--cov={}",
        settings.package_dir(&settings.package).display()
    );
    Ok(pipeline.command(
        settings
            .test_runner("Running unit tests ...")
            .args(["--cov-report=xml".to_string(), coverage])
            .arg(test_path(UNIT_TEST_ROOT, invocation.test_target.as_deref())),
    ))
}

fn build_unit_tests(settings: &TaskSettings, invocation: &Invocation) -> TaskResult<Pipeline> {
    Ok(Pipeline::new().command(
        settings
            .test_runner("Running unit tests ...")
            .arg(test_path(UNIT_TEST_ROOT, invocation.test_target.as_deref())),
    ))
}

fn build_integration_tests(
    settings: &TaskSettings,
    invocation: &Invocation,
) -> TaskResult<Pipeline> {
    Ok(Pipeline::new().command(settings.test_runner("Running integration tests ...").arg(
        test_path(INTEGRATION_TEST_ROOT, invocation.test_target.as_deref()),
    )))
}

fn build_upload(settings: &TaskSettings, _: &Invocation) -> TaskResult<Pipeline> {
    let version = read_package_version(&settings.root.join(&settings.version_file))?;
    if let Some(warning) = check_release_version(&version) {
        tracing::warn!("{}", warning);
    }

    Ok(Pipeline::new()
        .command(settings.pip_install("Installing upload dependencies ...", ["wheel"]))
        .step(Step::RemoveDirs {
            description: "Removing previous builds ...".to_string(),
            paths: vec![settings.root.join("dist"), settings.root.join("build")],
        })
        .command(
            CommandLine::new(
                format!(
                    "Building {} {} source and wheel (universal) distribution ...",
                    settings.display_name, version
                ),
                &settings.python,
            )
            .args(["setup.py", "sdist", "bdist_wheel", "--universal"]),
        )
        .command(settings.pip_install("Installing Twine dependency ...", ["twine"]))
        .command(
            settings
                .python_module("Uploading the package to PyPI via Twine ...", "twine")
                .args(["upload", "dist/*"]),
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolsConfig;
    use crate::test_utils::TestProject;
    use std::path::PathBuf;

    fn settings(root: PathBuf) -> TaskSettings {
        TaskSettings::resolve(&TestProject, root, ToolsConfig::default(), None)
    }

    fn commands(pipeline: &Pipeline) -> Vec<String> {
        pipeline
            .steps()
            .iter()
            .filter_map(|step| match step {
                Step::Run(cmd) => Some(cmd.display()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_table_is_indexed_by_operation() {
        for (index, spec) in OPERATIONS.iter().enumerate() {
            assert_eq!(spec.operation as usize, index);
            assert_eq!(lookup(spec.name).unwrap().operation, spec.operation);
        }
        assert!(lookup("deploy").is_none());
    }

    #[test]
    fn test_test_path_strips_root_once() {
        assert_eq!(test_path("tests", None), "tests/");
        assert_eq!(test_path("tests", Some("web/test_client.py")), "tests/web/test_client.py");
        assert_eq!(test_path("tests", Some("tests/web")), "tests/web");
        assert_eq!(test_path("tests", Some("tests/tests/web")), "tests/tests/web");
        assert_eq!(
            test_path("integration_tests", Some("integration_tests/web")),
            "integration_tests/web"
        );
    }

    #[test]
    fn test_validate_steps_in_order() {
        let pipeline = dispatch(
            &settings(PathBuf::from("/repo")),
            &Invocation::new(Operation::Validate).with_test_target("tests/web"),
        )
        .unwrap();
        assert_eq!(
            commands(&pipeline),
            vec![
                "python3 -m pip install pytest>=6.2.5,<7 flake8>=4,<5",
                "python3 -m black /repo/slack",
                "python3 -m black /repo/slack_sdk",
                "python3 -m flake8 /repo/slack",
                "python3 -m flake8 /repo/slack_sdk",
                "python3 -m pytest --cov-report=xml --cov=/repo/slack_sdk tests/web",
            ]
        );
    }

    #[test]
    fn test_unit_and_integration_roots_differ() {
        let settings = settings(PathBuf::from("/repo"));
        let unit = dispatch(
            &settings,
            &Invocation::new(Operation::UnitTests).with_test_target("web"),
        )
        .unwrap();
        let integration = dispatch(
            &settings,
            &Invocation::new(Operation::IntegrationTests).with_test_target("web"),
        )
        .unwrap();
        assert_eq!(commands(&unit), vec!["python3 -m pytest tests/web"]);
        assert_eq!(
            commands(&integration),
            vec!["python3 -m pytest integration_tests/web"]
        );
    }

    #[test]
    fn test_test_target_rejected_where_not_declared() {
        for operation in [Operation::Codegen, Operation::Upload] {
            let err = dispatch(
                &settings(PathBuf::from("/repo")),
                &Invocation::new(operation).with_test_target("web"),
            )
            .unwrap_err();
            assert!(matches!(err, TaskError::UnknownOption { .. }));
        }
    }

    #[test]
    fn test_codegen_is_a_single_codegen_step() {
        let pipeline = dispatch(
            &settings(PathBuf::from("/repo")),
            &Invocation::new(Operation::Codegen),
        )
        .unwrap();
        assert_eq!(pipeline.steps().len(), 1);
        match &pipeline.steps()[0] {
            Step::Codegen(orchestrator) => {
                assert_eq!(orchestrator.profiles().len(), 2);
                assert_eq!(
                    orchestrator.formatter().display(),
                    "python3 -m black /repo/slack_sdk"
                );
            }
            other => panic!("unexpected step: {other:?}"),
        }
    }

    #[test]
    fn test_upload_reads_version_and_cleans_first() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("slack_sdk")).unwrap();
        std::fs::write(
            dir.path().join("slack_sdk/version.py"),
            "\"\"\"Check the latest version at https://pypi.org/project/slack-sdk/\"\"\"\n__version__ = \"3.19.0\"\n",
        )
        .unwrap();

        let pipeline = dispatch(
            &settings(dir.path().to_path_buf()),
            &Invocation::new(Operation::Upload),
        )
        .unwrap();
        let steps = pipeline.steps();
        assert_eq!(steps.len(), 5);
        assert!(matches!(steps[1], Step::RemoveDirs { .. }));
        assert!(steps[2].description().contains("Slack SDK 3.19.0"));
        assert_eq!(
            commands(&pipeline).last().unwrap(),
            "python3 -m twine upload dist/*"
        );
    }

    #[test]
    fn test_upload_without_version_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = dispatch(
            &settings(dir.path().to_path_buf()),
            &Invocation::new(Operation::Upload),
        )
        .unwrap_err();
        assert!(matches!(err, TaskError::Version { .. }));
    }
}
