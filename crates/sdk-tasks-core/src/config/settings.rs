//! Effective settings: project defaults, configuration file and environment

use super::file::ToolsConfig;
use crate::codegen::{VariantOrchestrator, VariantProfile};
use crate::error::TaskResult;
use crate::process::CommandLine;
use crate::project::ProjectConfig;
use std::path::{Path, PathBuf};

const DEFAULT_PYTHON: &str = "python3";
const DEFAULT_FORMATTER: &str = "black";
const LINTER: &str = "flake8";
const TEST_RUNNER: &str = "pytest";

/// Everything an operation needs to build its pipeline
#[derive(Debug, Clone)]
pub struct TaskSettings {
    pub display_name: String,
    pub root: PathBuf,
    pub python: String,
    pub formatter: String,
    /// Package holding the canonical client; measured for coverage
    pub package: String,
    /// Packages formatted and linted during validation
    pub packages: Vec<String>,
    pub canonical_path: PathBuf,
    pub codegen_dependencies: Vec<String>,
    pub validate_dependencies: Vec<String>,
    pub profiles: Vec<VariantProfile>,
    pub version_file: PathBuf,
}

impl TaskSettings {
    /// Read the configuration file under `root` and the interpreter override
    pub fn load<C: ProjectConfig>(config: &C, root: PathBuf) -> TaskResult<Self> {
        let file = ToolsConfig::load(&root.join(config.config_file()))?;
        let python = std::env::var(config.python_env())
            .ok()
            .filter(|v| !v.trim().is_empty());
        Ok(Self::resolve(config, root, file, python))
    }

    /// Merge layers; the interpreter resolves env, then file, then `python3`
    pub fn resolve<C: ProjectConfig>(
        config: &C,
        root: PathBuf,
        file: ToolsConfig,
        python_override: Option<String>,
    ) -> Self {
        let shape = config.client_shape();

        let mut profiles = config.profiles();
        for (name, rules) in file.extra_rules {
            match profiles.iter_mut().find(|p| p.name() == name) {
                Some(profile) => profile.rules.extend(rules),
                None => tracing::warn!(profile = %name, "extra rules for unknown profile ignored"),
            }
        }

        let mut codegen_dependencies = config.codegen_dependencies();
        codegen_dependencies.extend(file.codegen_dependencies);
        let mut validate_dependencies = config.validate_dependencies();
        validate_dependencies.extend(file.validate_dependencies);

        Self {
            display_name: config.display_name().to_string(),
            python: python_override
                .or(file.python)
                .unwrap_or_else(|| DEFAULT_PYTHON.to_string()),
            formatter: file
                .formatter
                .unwrap_or_else(|| DEFAULT_FORMATTER.to_string()),
            package: shape.package.clone(),
            packages: config.packages(),
            canonical_path: shape.canonical_path,
            codegen_dependencies,
            validate_dependencies,
            profiles,
            version_file: config.version_file(),
            root,
        }
    }

    pub fn package_dir(&self, package: &str) -> PathBuf {
        self.root.join(package)
    }

    /// `<python> -m <module>`
    pub fn python_module(&self, description: impl Into<String>, module: &str) -> CommandLine {
        CommandLine::new(description, &self.python).args(["-m", module])
    }

    pub fn pip_install<I, S>(&self, description: impl Into<String>, packages: I) -> CommandLine
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.python_module(description, "pip")
            .arg("install")
            .args(packages)
    }

    pub fn format(&self, description: impl Into<String>, target: &Path) -> CommandLine {
        self.python_module(description, &self.formatter)
            .arg(target.display().to_string())
    }

    pub fn lint(&self, description: impl Into<String>, target: &Path) -> CommandLine {
        self.python_module(description, LINTER)
            .arg(target.display().to_string())
    }

    pub fn test_runner(&self, description: impl Into<String>) -> CommandLine {
        self.python_module(description, TEST_RUNNER)
    }

    /// Orchestrator regenerating every profile of this project
    pub fn orchestrator(&self) -> VariantOrchestrator {
        let formatter = self.format(
            format!("Running {} (code formatter) ...", self.formatter),
            &self.package_dir(&self.package),
        );
        let install = self.pip_install(
            "Installing required dependencies ...",
            self.codegen_dependencies.iter().cloned(),
        );
        VariantOrchestrator::new(
            self.root.clone(),
            self.canonical_path.clone(),
            self.profiles.clone(),
            formatter,
        )
        .with_install(install)
    }
}
