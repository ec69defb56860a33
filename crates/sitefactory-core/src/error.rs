//! Error types for the assembly pipeline

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// What kind of directory a [`FactoryError::NotFound`] refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingKind {
    Template,
    Theme,
    Component,
}

impl fmt::Display for MissingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MissingKind::Template => "Template",
            MissingKind::Theme => "Theme",
            MissingKind::Component => "Component",
        };
        write!(f, "{}", name)
    }
}

/// Failures of the external site generator subprocess
#[derive(Debug, Error)]
pub enum ExternalToolError {
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Generator exited with code {code}{}", stderr_suffix(.stderr))]
    Failed { code: i32, stderr: String },

    #[error("Generator timed out after {} seconds{}", .after.as_secs(), stderr_suffix(.stderr))]
    TimedOut { after: Duration, stderr: String },

    #[error("Build aborted: generator interrupted")]
    Aborted,
}

impl ExternalToolError {
    /// Exit code reported by the generator, if it ran to completion
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ExternalToolError::Failed { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Captured diagnostic output, if any
    pub fn stderr(&self) -> &str {
        match self {
            ExternalToolError::Failed { stderr, .. } | ExternalToolError::TimedOut { stderr, .. } => {
                stderr
            }
            _ => "",
        }
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(":\n{}", trimmed)
    }
}

/// Fatal errors of the assembly pipeline
#[derive(Debug, Error)]
pub enum FactoryError {
    #[error("Validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),

    #[error("{kind} '{name}' not found at {}", .path.display())]
    NotFound {
        kind: MissingKind,
        name: String,
        path: PathBuf,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Template '{name}' already exists at {}", .path.display())]
    TemplateExists { name: String, path: PathBuf },

    #[error("Failed to serialize {}: {source}", .path.display())]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    ExternalTool(#[from] ExternalToolError),
}

impl FactoryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FactoryError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, FactoryError>;
