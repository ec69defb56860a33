//! Workspace layout: where templates, themes and components live

use std::io;
use std::path::{Path, PathBuf};

/// Environment variable overriding the workspace root
pub const ROOT_ENV: &str = "SITEFACTORY_ROOT";

pub const TEMPLATES_DIR: &str = "templates";
pub const THEMES_DIR: &str = "themes";
pub const COMPONENTS_DIR: &str = "components";

/// A project root containing `templates/`, `themes/` and `components/`
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the root from an explicit path, then `SITEFACTORY_ROOT`, then `fallback`
    pub fn resolve(explicit: Option<PathBuf>, fallback: PathBuf) -> Self {
        let root = explicit
            .or_else(|| std::env::var_os(ROOT_ENV).map(PathBuf::from))
            .unwrap_or(fallback);
        Self::new(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.root.join(TEMPLATES_DIR)
    }

    pub fn themes_dir(&self) -> PathBuf {
        self.root.join(THEMES_DIR)
    }

    pub fn components_dir(&self) -> PathBuf {
        self.root.join(COMPONENTS_DIR)
    }

    pub fn template_dir(&self, name: &str) -> PathBuf {
        self.templates_dir().join(name)
    }

    pub fn theme_dir(&self, name: &str) -> PathBuf {
        self.themes_dir().join(name)
    }

    /// Template directory names, sorted
    pub fn templates(&self) -> io::Result<Vec<String>> {
        list_dirs(&self.templates_dir())
    }

    /// Theme directory names, sorted
    pub fn themes(&self) -> io::Result<Vec<String>> {
        list_dirs(&self.themes_dir())
    }
}

/// Sorted names of the non-hidden subdirectories of `dir`; a missing `dir` is empty
fn list_dirs(dir: &Path) -> io::Result<Vec<String>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with('.') {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}
