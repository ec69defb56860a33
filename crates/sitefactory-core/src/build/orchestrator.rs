//! Build orchestration
//!
//! One run walks a fixed sequence of states:
//!
//! `Initialized → OutputPrepared → TemplateLoaded → TreeCopied →
//! ComponentsProcessed → ConfigComposed → GeneratorInvoked →
//! SummaryComputed → Done`
//!
//! A fatal error stops the run in the state it had reached and is returned as
//! a [`BuildFailure`]. Non-fatal conditions are collected into the result.

use super::request::BuildRequest;
use super::result::{BuildFailure, BuildResult, BuildStage, BuildWarning};
use crate::config::{self, ConfigOverrides, SITE_CONFIG_FILE};
use crate::error::{FactoryError, MissingKind};
use crate::generator::version::check_compatibility;
use crate::generator::{self, GeneratorOptions, Invocation, SiteGenerator};
use crate::materialize::{copy_template_tree, copy_tree, ComponentMaterializer, OutputStats};
use crate::template::{registry, TemplateDescriptor};
use crate::workspace::{Workspace, THEMES_DIR};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Upper bound on the version query, below the build timeout
const VERSION_QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Paths resolved before anything is written
struct ResolvedInputs {
    template_dir: PathBuf,
    /// Workspace theme directory to copy, if the theme lives there
    theme_source: Option<PathBuf>,
    config_override: Option<PathBuf>,
}

/// Sequences one build from request to result
///
/// Holds no mutable state: concurrent runs with distinct output directories
/// do not interfere.
pub struct BuildOrchestrator<G: SiteGenerator> {
    workspace: Workspace,
    generator: G,
}

impl<G: SiteGenerator> BuildOrchestrator<G> {
    pub fn new(workspace: Workspace, generator: G) -> Self {
        Self {
            workspace,
            generator,
        }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Run a build, aborting the generator on Ctrl+C
    pub async fn run(&self, request: &BuildRequest) -> Result<BuildResult, BuildFailure> {
        self.run_with_cancel(request, interrupt_signal()).await
    }

    /// Run a build; resolving `cancel` during generation aborts it
    pub async fn run_with_cancel<F>(
        &self,
        request: &BuildRequest,
        cancel: F,
    ) -> Result<BuildResult, BuildFailure>
    where
        F: Future<Output = ()>,
    {
        let mut progress = Progress::new();
        let mut warnings = Vec::new();
        info!(template = %request.template, theme = %request.theme, output = %request.output.display(), "starting build");

        let inputs = self.resolve_inputs(request).map_err(progress.fail())?;

        std::fs::create_dir_all(&request.output)
            .map_err(|e| FactoryError::io(&request.output, e))
            .map_err(progress.fail())?;
        progress.advance(BuildStage::OutputPrepared);

        let template = TemplateDescriptor::load(&inputs.template_dir, SITE_CONFIG_FILE)
            .map_err(progress.fail())?;
        let version_limit = request.generator_timeout.min(VERSION_QUERY_TIMEOUT);
        if let Some(warning) = self.generator_version_warning(&template, version_limit).await {
            warnings.push(warning);
        }
        let resolution = registry::resolve(&template, &request.components);
        for component in &resolution.unknown_status {
            warn!(component = %component.name, status = %component.status, "unknown component status");
            warnings.push(BuildWarning::UnknownStatus {
                component: component.name.clone(),
                status: component.status.as_str().to_string(),
            });
        }
        for (component, reason) in &resolution.excluded {
            debug!(component = %component.name, %reason, "component excluded");
        }
        progress.advance(BuildStage::TemplateLoaded);

        let mut files_copied =
            copy_template_tree(&template.root, &request.output).map_err(progress.fail())?;
        progress.advance(BuildStage::TreeCopied);

        let report = ComponentMaterializer::new(self.workspace.root(), &request.output)
            .copy_components(&resolution.included);
        files_copied += report.files_copied;
        warnings.extend(report.warnings);
        files_copied += copy_requested_theme(&inputs, request).map_err(progress.fail())?;
        progress.advance(BuildStage::ComponentsProcessed);

        let base_config = match &inputs.config_override {
            Some(path) => Some(
                std::fs::read_to_string(path)
                    .map_err(|e| FactoryError::io(path, e))
                    .map_err(progress.fail())?,
            ),
            None => template.base_config.clone(),
        };
        if let Some(warning) =
            compose_config(base_config.as_deref(), request).map_err(progress.fail())?
        {
            warnings.push(warning);
        }
        progress.advance(BuildStage::ConfigComposed);

        let options = GeneratorOptions {
            minify: request.minify,
            draft: request.draft,
            future: request.future,
            environment: request.environment,
        };
        let invocation = Invocation {
            program: self.generator.program(),
            args: self.generator.build_args(&options),
            cwd: &request.output,
            timeout: request.generator_timeout,
        };
        let generator_output = generator::invoke(&invocation, cancel)
            .await
            .map_err(|e| progress.failure(e.into()))?;
        progress.advance(BuildStage::GeneratorInvoked);

        // Best effort: a failed walk only drops the statistics
        let stats = match OutputStats::collect(&request.output) {
            Ok(stats) => Some(stats),
            Err(e) => {
                warn!(error = %e, "output statistics unavailable");
                None
            }
        };
        progress.advance(BuildStage::SummaryComputed);

        let result = BuildResult {
            output: request.output.clone(),
            template: template.name.clone(),
            included: resolution.included_names(),
            excluded: resolution
                .excluded
                .iter()
                .map(|(component, reason)| (component.name.clone(), *reason))
                .collect(),
            files_copied,
            stats,
            generator: generator_output,
            warnings,
        };

        progress.advance(BuildStage::Done);
        info!(
            files = result.files_copied,
            warnings = result.warning_count(),
            "build finished"
        );
        Ok(result)
    }

    /// Check everything that must exist before the output directory is touched
    fn resolve_inputs(&self, request: &BuildRequest) -> Result<ResolvedInputs, FactoryError> {
        let template_dir = self.workspace.template_dir(&request.template);
        if !template_dir.is_dir() {
            return Err(FactoryError::NotFound {
                kind: MissingKind::Template,
                name: request.template.clone(),
                path: template_dir,
            });
        }

        let workspace_theme = self.workspace.theme_dir(&request.theme);
        let template_theme = template_dir.join(THEMES_DIR).join(&request.theme);
        let theme_source = if workspace_theme.is_dir() {
            Some(workspace_theme)
        } else if template_theme.is_dir() {
            // Arrives with the template tree
            None
        } else {
            return Err(FactoryError::NotFound {
                kind: MissingKind::Theme,
                name: request.theme.clone(),
                path: workspace_theme,
            });
        };

        if let Some(path) = &request.config {
            if !path.is_file() {
                return Err(FactoryError::io(
                    path,
                    std::io::Error::new(std::io::ErrorKind::NotFound, "configuration file not found"),
                ));
            }
        }

        Ok(ResolvedInputs {
            template_dir,
            theme_source,
            config_override: request.config.clone(),
        })
    }

    async fn generator_version_warning(
        &self,
        template: &TemplateDescriptor,
        limit: Duration,
    ) -> Option<BuildWarning> {
        let required = template.min_generator_version.as_deref()?;
        let found = generator::detect_version(&self.generator, limit).await?;
        let message = check_compatibility(&found, required)?;
        warn!("{}", message);
        Some(BuildWarning::GeneratorVersion { message })
    }
}

/// Copy the requested theme from the workspace unless a component already placed it
fn copy_requested_theme(inputs: &ResolvedInputs, request: &BuildRequest) -> Result<usize, FactoryError> {
    let Some(source) = &inputs.theme_source else {
        return Ok(0);
    };
    let target = request.output.join(THEMES_DIR).join(&request.theme);
    if target.exists() {
        debug!(theme = %request.theme, "theme already materialized");
        return Ok(0);
    }
    copy_tree(source, &target)
}

/// Write the composed site configuration into the output directory
///
/// Returns a warning instead of failing when there is nothing to compose
/// or the base configuration cannot be parsed.
fn compose_config(
    base: Option<&str>,
    request: &BuildRequest,
) -> Result<Option<BuildWarning>, FactoryError> {
    let target = request.output.join(SITE_CONFIG_FILE);

    let Some(base) = base else {
        warn!("no base configuration found, skipping configuration composition");
        return Ok(Some(BuildWarning::ConfigPatchSkipped {
            reason: format!("template has no {}", SITE_CONFIG_FILE),
        }));
    };

    let overrides = ConfigOverrides {
        theme: Some(request.theme.clone()),
        base_url: request.base_url.clone(),
        environment: request.environment,
    };

    match config::compose(base, &overrides) {
        Ok(text) => {
            write_config(&target, &text)?;
            Ok(None)
        }
        Err(e) => {
            warn!(error = %e, "configuration left unmodified");
            write_config(&target, base)?;
            Ok(Some(BuildWarning::ConfigPatchSkipped {
                reason: e.to_string(),
            }))
        }
    }
}

fn write_config(path: &Path, text: &str) -> Result<(), FactoryError> {
    std::fs::write(path, text).map_err(|e| FactoryError::io(path, e))
}

/// Tracks the state a run has reached, for tagging failures
struct Progress {
    stage: BuildStage,
}

impl Progress {
    fn new() -> Self {
        Self {
            stage: BuildStage::Initialized,
        }
    }

    fn advance(&mut self, next: BuildStage) {
        debug_assert!(next > self.stage, "build stages only move forward");
        debug!(stage = %next, "build stage reached");
        self.stage = next;
    }

    fn failure(&self, error: FactoryError) -> BuildFailure {
        warn!(stage = %self.stage, error = %error, "build failed");
        BuildFailure::new(self.stage, error)
    }

    fn fail(&self) -> impl FnOnce(FactoryError) -> BuildFailure + '_ {
        move |error| self.failure(error)
    }
}

/// Resolves on Ctrl+C; never resolves if the handler cannot be installed
async fn interrupt_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
