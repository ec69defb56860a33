//! External static-site generator integration
//!
//! This module provides:
//! - The `SiteGenerator` trait describing how a generator is invoked
//! - The `Hugo` implementation
//! - Version detection and minimum-version checks
//! - A subprocess runner with timeout and interrupt forwarding

pub mod runner;
pub mod version;

use crate::build::Environment;

pub use runner::{detect_version, invoke, GeneratorOutput, Invocation};

/// Flags passed through from the build request to the generator
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneratorOptions {
    pub minify: bool,
    pub draft: bool,
    pub future: bool,
    pub environment: Environment,
}

/// Configuration trait for an external site generator
///
/// The pipeline only knows generators through this trait, so tests and
/// alternative generators can stand in for Hugo.
pub trait SiteGenerator: Send + Sync {
    /// Human-readable display name
    fn display_name(&self) -> &str;

    /// Binary to execute
    fn program(&self) -> &str;

    /// Arguments for a site build
    fn build_args(&self, options: &GeneratorOptions) -> Vec<String>;

    /// Arguments that make the binary print its version
    fn version_args(&self) -> Vec<String> {
        vec!["version".to_string()]
    }
}

/// The Hugo static-site generator
#[derive(Debug, Clone)]
pub struct Hugo {
    program: String,
}

impl Hugo {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for Hugo {
    fn default() -> Self {
        Self::new("hugo")
    }
}

impl SiteGenerator for Hugo {
    fn display_name(&self) -> &str {
        "Hugo"
    }

    fn program(&self) -> &str {
        &self.program
    }

    fn build_args(&self, options: &GeneratorOptions) -> Vec<String> {
        let mut args = Vec::new();
        if options.minify {
            args.push("--minify".to_string());
        }
        if options.draft {
            args.push("--buildDrafts".to_string());
        }
        if options.future {
            args.push("--buildFuture".to_string());
        }
        args.push("--environment".to_string());
        args.push(options.environment.as_str().to_string());
        args
    }
}
