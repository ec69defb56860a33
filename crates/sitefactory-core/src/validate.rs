//! Structural validation of a template
//!
//! Every problem is collected before anything is reported, so a caller sees
//! the complete list in one pass. Errors make a template unusable; warnings
//! describe gaps the pipeline tolerates.

use crate::config::SITE_CONFIG_FILE;
use crate::error::FactoryError;
use crate::generator::version::parse_version;
use crate::materialize::{component_source_dir, locate_asset, LAYOUTS_DIR, STATIC_DIR};
use crate::template::{ComponentDescriptor, ComponentStatus, ComponentsManifest, MANIFEST_FILE};
use crate::workspace::Workspace;
use std::path::Path;

/// Directories a template is expected to provide
pub const RECOMMENDED_DIRS: &[&str] = &["content", "static", "archetypes"];

/// Aggregated outcome of a validation pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Fold the errors into a single [`FactoryError::Validation`]
    pub fn into_result(self) -> Result<Vec<String>, FactoryError> {
        if self.errors.is_empty() {
            Ok(self.warnings)
        } else {
            Err(FactoryError::Validation(self.errors))
        }
    }
}

/// Validate the template `name` inside `workspace`
pub fn validate_template(workspace: &Workspace, name: &str) -> ValidationReport {
    let mut report = ValidationReport::default();
    let dir = workspace.template_dir(name);

    if !dir.is_dir() {
        report.error(format!("Template directory not found: {}", dir.display()));
        return report;
    }

    check_site_config(&dir, name, &mut report);

    for recommended in RECOMMENDED_DIRS {
        let path = dir.join(recommended);
        if !path.exists() {
            report.warning(format!(
                "Template '{}' missing recommended directory: {}",
                name, recommended
            ));
        } else if !path.is_dir() {
            report.error(format!(
                "Template '{}' has {} as file, expected directory",
                name, recommended
            ));
        }
    }

    let manifest_path = dir.join(MANIFEST_FILE);
    if !manifest_path.is_file() {
        report.warning(format!("Template '{}' missing {} (recommended)", name, MANIFEST_FILE));
        return report;
    }

    let manifest = match std::fs::read_to_string(&manifest_path)
        .map_err(|e| e.to_string())
        .and_then(|content| ComponentsManifest::parse(&content).map_err(|e| e.to_string()))
    {
        Ok(manifest) => manifest,
        Err(e) => {
            report.error(format!("Invalid {} in template '{}': {}", MANIFEST_FILE, name, e));
            return report;
        }
    };

    for component in &manifest.components {
        check_component(workspace.root(), component, &mut report);
    }

    if let Some(min_version) = &manifest.hugo.min_version {
        if !is_plain_semver(min_version) {
            report.warning(format!(
                "Hugo minVersion should follow semantic versioning: {}",
                min_version
            ));
        }
    }

    report
}

/// Check that an output path can hold a generated site
pub fn validate_output(output: &Path) -> ValidationReport {
    let mut report = ValidationReport::default();

    if output.as_os_str().is_empty() || output == Path::new(".") || output == Path::new("./") {
        report.error("Output directory cannot be the current directory");
    } else if output.is_file() {
        report.error(format!(
            "Output path exists as file, expected directory: {}",
            output.display()
        ));
    }

    report
}

fn check_site_config(dir: &Path, name: &str, report: &mut ValidationReport) {
    let path = dir.join(SITE_CONFIG_FILE);
    if !path.is_file() {
        report.error(format!(
            "Template '{}' missing required file: {}",
            name, SITE_CONFIG_FILE
        ));
        return;
    }

    let parsed = std::fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|content| content.parse::<toml::Table>().map_err(|e| e.to_string()));

    match parsed {
        Ok(table) => {
            if !table.contains_key("title") && !table.contains_key("baseURL") {
                report.warning(format!(
                    "Template '{}' {} seems incomplete (no title or baseURL)",
                    name, SITE_CONFIG_FILE
                ));
            }
        }
        Err(e) => report.error(format!(
            "Template '{}' has invalid {}: {}",
            name, SITE_CONFIG_FILE, e
        )),
    }
}

fn check_component(root: &Path, component: &ComponentDescriptor, report: &mut ValidationReport) {
    let name = &component.name;

    match &component.status {
        ComponentStatus::Unknown(raw) if raw.is_empty() => {
            report.error(format!("Component '{}' missing required 'status' field", name));
        }
        ComponentStatus::Unknown(raw) => {
            report.warning(format!("Component '{}' has unknown status: {}", name, raw));
        }
        _ => {}
    }

    if component.version.is_empty() {
        report.warning(format!("Component '{}' missing version information", name));
    }
    if component.description.is_empty() {
        report.warning(format!("Component '{}' missing description", name));
    }

    let source_dir = component_source_dir(root, component);
    if let Some(source) = &component.source_path {
        if !source_dir.exists() {
            report.warning(format!(
                "Component '{}' source path does not exist: {}",
                name, source
            ));
        }
    }

    // Planned components are never copied and themes are copied whole
    if source_dir.exists() && component.status != ComponentStatus::Planned && !component.is_theme() {
        let assets = component
            .static_files
            .iter()
            .map(|file| ("static file", file, STATIC_DIR))
            .chain(component.layouts.iter().map(|file| ("layout", file, LAYOUTS_DIR)));
        for (kind, file, nested) in assets {
            if locate_asset(&source_dir, file, nested).is_none() {
                report.warning(format!(
                    "Component '{}' {} not found: {} (in {})",
                    name,
                    kind,
                    file,
                    source_dir.strip_prefix(root).unwrap_or(&source_dir).display()
                ));
            }
        }
    }

    match (&component.status, &component.source_path) {
        (ComponentStatus::Planned, Some(_)) => report.warning(format!(
            "Component '{}' is marked as planned but has a source path defined",
            name
        )),
        (ComponentStatus::Stable, None) => report.warning(format!(
            "Component '{}' is marked as stable but has no source path defined",
            name
        )),
        _ => {}
    }
}

/// `X.Y.Z` with no prefix or suffix
fn is_plain_semver(raw: &str) -> bool {
    let parts: Vec<_> = raw.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
        && parse_version(raw).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn workspace_with(name: &str, config: Option<&str>, manifest: Option<&str>) -> (TempDir, Workspace) {
        let dir = TempDir::new().unwrap();
        let template = dir.path().join("templates").join(name);
        fs::create_dir_all(&template).unwrap();
        for recommended in RECOMMENDED_DIRS {
            fs::create_dir_all(template.join(recommended)).unwrap();
        }
        if let Some(config) = config {
            fs::write(template.join(SITE_CONFIG_FILE), config).unwrap();
        }
        if let Some(manifest) = manifest {
            fs::write(template.join(MANIFEST_FILE), manifest).unwrap();
        }
        let ws = Workspace::new(dir.path());
        (dir, ws)
    }

    #[test]
    fn test_missing_template_stops_early() {
        let dir = TempDir::new().unwrap();
        let report = validate_template(&Workspace::new(dir.path()), "ghost");

        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("Template directory not found"));
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_complete_template_is_valid() {
        let (dir, ws) = workspace_with(
            "default",
            Some("baseURL = \"/\"\ntitle = \"Site\"\n"),
            Some(
                "components:\n  quiz-engine:\n    version: 1.0.0\n    status: stable\n    description: Quizzes\n    sourcePath: components/quiz-engine\n    static_files: [\"js/quiz.js\"]\nhugo:\n  minVersion: 0.110.0\n",
            ),
        );
        let js = dir.path().join("components/quiz-engine/js");
        fs::create_dir_all(&js).unwrap();
        fs::write(js.join("quiz.js"), "").unwrap();

        let report = validate_template(&ws, "default");

        assert!(report.is_valid(), "{:?}", report.errors);
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    }

    #[test]
    fn test_collects_every_problem() {
        let (dir, ws) = workspace_with(
            "broken",
            Some("languageCode = \"en\"\n"),
            Some(
                "components:\n  nameless:\n    version: 1.0.0\n  odd:\n    status: beta\n    description: d\n    version: 1.0.0\n  someday:\n    status: planned\n    description: d\n    version: 1.0.0\n    sourcePath: components/someday\nhugo:\n  minVersion: v0.110\n",
            ),
        );
        fs::remove_dir(dir.path().join("templates/broken/static")).unwrap();
        fs::write(dir.path().join("templates/broken/static"), "").unwrap();

        let report = validate_template(&ws, "broken");

        assert_eq!(report.errors.len(), 2, "{:?}", report.errors);
        assert!(report.errors.iter().any(|e| e.contains("static as file")));
        assert!(report.errors.iter().any(|e| e.contains("'nameless' missing required 'status'")));

        let warnings = report.warnings.join("\n");
        assert!(warnings.contains("seems incomplete"));
        assert!(warnings.contains("unknown status: beta"));
        assert!(warnings.contains("'nameless' missing description"));
        assert!(warnings.contains("source path does not exist: components/someday"));
        assert!(warnings.contains("planned but has a source path"));
        assert!(warnings.contains("minVersion should follow semantic versioning"));
    }

    #[test]
    fn test_asset_lookup_matches_copy_step() {
        let (dir, ws) = workspace_with(
            "default",
            Some("baseURL = \"/\"\ntitle = \"Site\"\n"),
            Some(
                "components:\n  quiz-engine:\n    version: 1.0.0\n    status: experimental\n    description: Quizzes\n    static_files: [\"js/quiz.js\", \"css/quiz.css\"]\n    layouts: [\"shortcodes/quiz.html\"]\n",
            ),
        );
        // No sourcePath: assets come from components/<name>, static files may sit under static/
        let source = dir.path().join("components/quiz-engine");
        fs::create_dir_all(source.join("static/js")).unwrap();
        fs::write(source.join("static/js/quiz.js"), "").unwrap();
        fs::create_dir_all(source.join("layouts/shortcodes")).unwrap();
        fs::write(source.join("layouts/shortcodes/quiz.html"), "").unwrap();

        let report = validate_template(&ws, "default");

        assert!(report.is_valid(), "{:?}", report.errors);
        assert_eq!(report.warnings.len(), 1, "{:?}", report.warnings);
        assert!(report.warnings[0].contains("static file not found: css/quiz.css (in components/quiz-engine)"));
    }

    #[test]
    fn test_invalid_site_config_is_error() {
        let (_dir, ws) = workspace_with("default", Some("title = [unterminated"), Some(""));
        let report = validate_template(&ws, "default");

        assert!(report.errors.iter().any(|e| e.contains("invalid hugo.toml")));
    }

    #[test]
    fn test_missing_files() {
        let (_dir, ws) = workspace_with("bare", None, None);
        let report = validate_template(&ws, "bare");

        assert!(report.errors.iter().any(|e| e.contains("missing required file: hugo.toml")));
        assert!(report.warnings.iter().any(|w| w.contains("missing components.yml")));
    }

    #[test]
    fn test_unparsable_manifest_is_error() {
        let (_dir, ws) = workspace_with("default", Some("title = \"x\"\n"), Some("components: [unclosed"));
        let report = validate_template(&ws, "default");

        assert!(report.errors.iter().any(|e| e.contains("Invalid components.yml")));
    }

    #[test]
    fn test_into_result() {
        let mut report = ValidationReport::default();
        report.warning("just a note");
        assert_eq!(report.clone().into_result().unwrap(), ["just a note"]);

        report.error("broken");
        assert!(matches!(report.into_result(), Err(FactoryError::Validation(errors)) if errors == ["broken"]));
    }

    #[test]
    fn test_output_checks() {
        assert!(!validate_output(Path::new(".")).is_valid());

        let dir = TempDir::new().unwrap();
        let file = dir.path().join("site");
        fs::write(&file, "").unwrap();
        assert!(!validate_output(&file).is_valid());
        assert!(validate_output(&dir.path().join("fresh")).is_valid());
    }
}
