//! Regenerates every variant from the canonical client

use super::engine::RuleEngine;
use super::profile::VariantProfile;
use super::source::CanonicalSource;
use crate::error::{TaskError, TaskResult};
use crate::process::{run_best_effort, CommandLine, CommandRunner};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Clone)]
pub struct VariantOrchestrator {
    root: PathBuf,
    /// Relative to `root`
    canonical_path: PathBuf,
    profiles: Vec<VariantProfile>,
    /// Best-effort install of codegen-only dependencies
    install: Option<CommandLine>,
    /// Run over the output directory once every artifact is written
    formatter: CommandLine,
    engine: RuleEngine,
}

impl VariantOrchestrator {
    pub fn new(
        root: impl Into<PathBuf>,
        canonical_path: impl Into<PathBuf>,
        profiles: Vec<VariantProfile>,
        formatter: CommandLine,
    ) -> Self {
        Self {
            root: root.into(),
            canonical_path: canonical_path.into(),
            profiles,
            install: None,
            formatter,
            engine: RuleEngine::new(),
        }
    }

    pub fn with_install(mut self, install: CommandLine) -> Self {
        self.install = Some(install);
        self
    }

    pub fn profiles(&self) -> &[VariantProfile] {
        &self.profiles
    }

    pub fn formatter(&self) -> &CommandLine {
        &self.formatter
    }

    /// Generate, write and format every variant
    ///
    /// All variants are generated before the first write, so a rule failure
    /// leaves the existing files untouched. Writes happen in profile order and
    /// overwrite unconditionally; an interruption between two writes leaves the
    /// later files stale.
    pub async fn run<R: CommandRunner>(&self, runner: &R) -> TaskResult<Vec<PathBuf>> {
        if let Some(install) = &self.install {
            run_best_effort(runner, install).await;
        }

        let source = CanonicalSource::load(&self.root.join(&self.canonical_path)).await?;
        let artifacts = self.generate(&source)?;

        let mut written = Vec::with_capacity(artifacts.len());
        for (path, content) in artifacts {
            write_artifact(&path, &content).await?;
            println!("  {} {}", "->".blue(), path.display());
            written.push(path);
        }

        runner.run(&self.formatter).await?;
        Ok(written)
    }

    /// Produce each profile's artifact without touching the filesystem
    pub fn generate(&self, source: &CanonicalSource) -> TaskResult<Vec<(PathBuf, String)>> {
        self.profiles
            .iter()
            .map(|profile| {
                tracing::info!(
                    profile = profile.name(),
                    rules = profile.rules.len(),
                    "generating variant"
                );
                let content = self.engine.generate(profile, source.text())?;
                Ok((self.root.join(&profile.output_path), content))
            })
            .collect()
    }
}

async fn write_artifact(path: &Path, content: &str) -> TaskResult<()> {
    let to_err = |source: std::io::Error| TaskError::WriteArtifact {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await.map_err(to_err)?;
    }
    fs::write(path, content).await.map_err(to_err)
}
