//! Build outcome types: result, warnings, pipeline stages and failures

use crate::error::FactoryError;
use crate::generator::GeneratorOutput;
use crate::materialize::OutputStats;
use crate::template::ExclusionReason;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// States of one pipeline run, in the only order they can occur
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BuildStage {
    Initialized,
    OutputPrepared,
    TemplateLoaded,
    TreeCopied,
    ComponentsProcessed,
    ConfigComposed,
    GeneratorInvoked,
    SummaryComputed,
    Done,
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A non-fatal condition observed during a build
#[derive(Debug, Clone, PartialEq)]
pub enum BuildWarning {
    /// A declared static file or layout does not exist
    AssetMissing { component: String, path: PathBuf },

    /// A declared asset exists but could not be copied
    AssetCopyFailed {
        component: String,
        path: PathBuf,
        message: String,
    },

    /// A theme component's directory is not present (e.g. an unfetched submodule)
    ThemeAssetSkipped { component: String, path: PathBuf },

    /// A component declares a status the pipeline does not know
    UnknownStatus { component: String, status: String },

    /// Configuration composition did not run
    ConfigPatchSkipped { reason: String },

    /// The installed generator is older than the template requires
    GeneratorVersion { message: String },
}

impl BuildWarning {
    pub fn is_asset_missing(&self) -> bool {
        matches!(self, BuildWarning::AssetMissing { .. })
    }
}

impl fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildWarning::AssetMissing { component, path } => {
                write!(f, "[{}] asset not found: {}", component, path.display())
            }
            BuildWarning::AssetCopyFailed {
                component,
                path,
                message,
            } => write!(
                f,
                "[{}] failed to copy {}: {}",
                component,
                path.display(),
                message
            ),
            BuildWarning::ThemeAssetSkipped { component, path } => write!(
                f,
                "[{}] theme directory not present, skipped: {}",
                component,
                path.display()
            ),
            BuildWarning::UnknownStatus { component, status } => {
                if status.is_empty() {
                    write!(f, "[{}] has no status", component)
                } else {
                    write!(f, "[{}] has unknown status '{}'", component, status)
                }
            }
            BuildWarning::ConfigPatchSkipped { reason } => {
                write!(f, "configuration not composed: {}", reason)
            }
            BuildWarning::GeneratorVersion { message } => write!(f, "{}", message),
        }
    }
}

/// Terminal artifact of a successful build
#[derive(Debug, Clone)]
pub struct BuildResult {
    pub output: PathBuf,
    pub template: String,
    /// Included components, in declaration order
    pub included: Vec<String>,
    /// Excluded components with their reason, in declaration order
    pub excluded: Vec<(String, ExclusionReason)>,
    pub files_copied: usize,
    /// `None` when the output could not be measured
    pub stats: Option<OutputStats>,
    pub generator: GeneratorOutput,
    pub warnings: Vec<BuildWarning>,
}

impl BuildResult {
    pub fn stats_available(&self) -> bool {
        self.stats.is_some()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    pub fn asset_missing_count(&self) -> usize {
        self.warnings.iter().filter(|w| w.is_asset_missing()).count()
    }
}

/// A fatal error, tagged with the last state the pipeline reached
#[derive(Debug, Error)]
#[error("build failed during {stage}")]
pub struct BuildFailure {
    pub stage: BuildStage,
    #[source]
    pub error: FactoryError,
}

impl BuildFailure {
    pub fn new(stage: BuildStage, error: FactoryError) -> Self {
        Self { stage, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stages_are_ordered() {
        assert!(BuildStage::Initialized < BuildStage::OutputPrepared);
        assert!(BuildStage::GeneratorInvoked < BuildStage::SummaryComputed);
        assert!(BuildStage::SummaryComputed < BuildStage::Done);
    }

    #[test]
    fn test_failure_names_stage_and_keeps_cause() {
        use crate::error::ExternalToolError;
        use std::error::Error as _;

        let failure = BuildFailure::new(
            BuildStage::ConfigComposed,
            FactoryError::ExternalTool(ExternalToolError::Aborted),
        );

        assert_eq!(failure.to_string(), "build failed during ConfigComposed");
        let cause = failure.source().map(|e| e.to_string()).unwrap_or_default();
        assert!(cause.contains("generator interrupted"));
        assert!(!failure.to_string().contains(&cause));
    }

    #[test]
    fn test_warning_display() {
        let warning = BuildWarning::AssetMissing {
            component: "quiz-engine".to_string(),
            path: PathBuf::from("components/quiz-engine/js/quiz.js"),
        };
        assert_eq!(
            warning.to_string(),
            "[quiz-engine] asset not found: components/quiz-engine/js/quiz.js"
        );

        let unknown = BuildWarning::UnknownStatus {
            component: "x".to_string(),
            status: String::new(),
        };
        assert_eq!(unknown.to_string(), "[x] has no status");
    }
}
