//! Site Factory Core - Template assembly pipeline for Hugo sites
//!
//! This library combines a **template**, a **theme** and a selection of
//! **components** into an output directory, then hands that directory to an
//! external static-site generator.
//!
//! # Architecture
//!
//! The pipeline is organized into leaves and one sequencer:
//!
//! - **Component registry** (`template`) - Loads `components.yml` and decides which components take part
//! - **Config composer** (`config`) - Applies theme, base URL and environment overrides to `hugo.toml`
//! - **File materializer** (`materialize`) - Copies the template tree and component assets, measures the output
//! - **Build orchestrator** (`build`) - Runs the stages in order and owns the single build outcome
//!
//! `scaffold` writes new templates and component declarations that pass
//! `validate` without further editing.
//!
//! The generator is reached only through the [`SiteGenerator`] trait and always
//! runs with the output directory as an explicit working directory.
//!
//! # Example Usage
//!
//! ```ignore
//! use sitefactory_core::{BuildOrchestrator, BuildRequest, Hugo, Workspace};
//!
//! let orchestrator = BuildOrchestrator::new(Workspace::new("."), Hugo::default());
//! let request = BuildRequest::new("default", "compose", "./site")
//!     .with_components(["quiz-engine"]);
//! let result = orchestrator.run(&request).await?;
//! println!("{} files, {} warnings", result.files_copied, result.warning_count());
//! ```

pub mod build;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod materialize;
pub mod scaffold;
pub mod template;
pub mod validate;
pub mod workspace;

// Re-export main types for convenience
pub use build::{
    BuildFailure, BuildOrchestrator, BuildRequest, BuildResult, BuildStage, BuildWarning,
    Environment,
};
pub use error::{ExternalToolError, FactoryError, MissingKind, Result};
pub use generator::{GeneratorOptions, Hugo, SiteGenerator};
pub use scaffold::{component_stanza, scaffold_template, ScaffoldOptions, ScaffoldReport};
pub use template::{ComponentDescriptor, ComponentStatus, ExclusionReason, TemplateDescriptor};
pub use validate::{validate_template, ValidationReport};
pub use workspace::Workspace;
