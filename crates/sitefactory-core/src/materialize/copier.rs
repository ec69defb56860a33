//! File materialization: template tree and component assets

use crate::build::BuildWarning;
use crate::error::{FactoryError, Result};
use crate::template::ComponentDescriptor;
use crate::workspace::{COMPONENTS_DIR, THEMES_DIR};
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Path segments never copied: VCS metadata, dependency caches, OS metadata files
pub const EXCLUDED_NAMES: &[&str] = &[
    ".git",
    ".svn",
    ".hg",
    "node_modules",
    ".DS_Store",
    "Thumbs.db",
];

/// Static assets land under this directory of the output
pub const STATIC_DIR: &str = "static";
/// Layout files land under this directory of the output
pub const LAYOUTS_DIR: &str = "layouts";

/// Result of materializing files into an output directory
#[derive(Debug, Default)]
pub struct MaterializeReport {
    pub files_copied: usize,
    pub warnings: Vec<BuildWarning>,
}

impl MaterializeReport {
    fn absorb(&mut self, other: MaterializeReport) {
        self.files_copied += other.files_copied;
        self.warnings.extend(other.warnings);
    }
}

/// Check whether a single path segment is filtered out of every copy
pub fn is_excluded(name: &OsStr) -> bool {
    name.to_str()
        .is_some_and(|name| EXCLUDED_NAMES.contains(&name))
}

/// Recursively copy `src` into `dest`, skipping excluded segments
///
/// Returns the number of files written. Directory entries are visited in
/// file-name order so identical inputs produce identical copy sequences.
pub fn copy_tree(src: &Path, dest: &Path) -> Result<usize> {
    let mut copied = 0;

    let walker = WalkDir::new(src)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_excluded(entry.file_name()));

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            FactoryError::io(path, e.into())
        })?;

        let relative = entry
            .path()
            .strip_prefix(src)
            .unwrap_or_else(|_| entry.path());
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).map_err(|e| FactoryError::io(&target, e))?;
        } else {
            copy_file(entry.path(), &target)?;
            copied += 1;
        }
    }

    Ok(copied)
}

/// Copy one file, creating parent directories as needed
pub fn copy_file(src: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent).map_err(|e| FactoryError::io(parent, e))?;
    }
    std::fs::copy(src, dest).map_err(|e| FactoryError::io(src, e))?;
    debug!(from = %src.display(), to = %dest.display(), "copied file");
    Ok(())
}

/// Step A: copy the whole template directory into the output directory
pub fn copy_template_tree(template_root: &Path, output_root: &Path) -> Result<usize> {
    if !template_root.is_dir() {
        return Err(FactoryError::io(
            template_root,
            std::io::Error::new(std::io::ErrorKind::NotFound, "template directory is unreadable"),
        ));
    }
    copy_tree(template_root, output_root)
}

/// Places component assets into an output directory
///
/// Component source paths are resolved against the workspace root.
pub struct ComponentMaterializer<'a> {
    workspace_root: &'a Path,
    output_root: &'a Path,
}

impl<'a> ComponentMaterializer<'a> {
    pub fn new(workspace_root: &'a Path, output_root: &'a Path) -> Self {
        Self {
            workspace_root,
            output_root,
        }
    }

    /// Step B: process included components in declaration order
    ///
    /// Per-file problems become warnings; nothing here aborts the build.
    pub fn copy_components(&self, components: &[&ComponentDescriptor]) -> MaterializeReport {
        let mut report = MaterializeReport::default();
        for component in components {
            let component_report = if component.is_theme() {
                self.copy_theme_component(component)
            } else {
                self.copy_standalone_component(component)
            };
            report.absorb(component_report);
        }
        report
    }

    fn source_dir(&self, component: &ComponentDescriptor) -> PathBuf {
        component_source_dir(self.workspace_root, component)
    }

    fn copy_theme_component(&self, component: &ComponentDescriptor) -> MaterializeReport {
        let mut report = MaterializeReport::default();
        let source = self.source_dir(component);
        let Some(theme) = component.theme_name() else {
            return report;
        };

        if !source.is_dir() {
            debug!(component = %component.name, path = %source.display(), "theme assets not present, skipping");
            report.warnings.push(BuildWarning::ThemeAssetSkipped {
                component: component.name.clone(),
                path: source,
            });
            return report;
        }

        let target = self.output_root.join(THEMES_DIR).join(theme);
        match copy_tree(&source, &target) {
            Ok(count) => report.files_copied += count,
            Err(e) => {
                warn!(component = %component.name, error = %e, "failed to copy theme");
                report.warnings.push(BuildWarning::AssetCopyFailed {
                    component: component.name.clone(),
                    path: source,
                    message: e.to_string(),
                });
            }
        }
        report
    }

    fn copy_standalone_component(&self, component: &ComponentDescriptor) -> MaterializeReport {
        let mut report = MaterializeReport::default();
        let source = self.source_dir(component);
        let static_root = self.output_root.join(STATIC_DIR);
        let layouts_root = self.output_root.join(LAYOUTS_DIR);

        for entry in &component.static_files {
            self.copy_entry(component, &source, entry, STATIC_DIR, &static_root, &mut report);
        }
        for entry in &component.layouts {
            self.copy_entry(component, &source, entry, LAYOUTS_DIR, &layouts_root, &mut report);
        }

        report
    }

    /// Copy one declared file or directory into a mirrored location under `dest_root`
    fn copy_entry(
        &self,
        component: &ComponentDescriptor,
        source: &Path,
        entry: &str,
        nested: &str,
        dest_root: &Path,
        report: &mut MaterializeReport,
    ) {
        let Some(relative) = safe_relative(entry) else {
            warn!(component = %component.name, entry, "declared asset path escapes its component");
            report.warnings.push(BuildWarning::AssetMissing {
                component: component.name.clone(),
                path: PathBuf::from(entry),
            });
            return;
        };

        let Some(found) = locate(source, &relative, nested) else {
            warn!(component = %component.name, entry, "declared asset not found");
            report.warnings.push(BuildWarning::AssetMissing {
                component: component.name.clone(),
                path: source.join(&relative),
            });
            return;
        };

        let target = dest_root.join(&relative);
        let copied = if found.is_dir() {
            copy_tree(&found, &target)
        } else {
            copy_file(&found, &target).map(|_| 1)
        };

        match copied {
            Ok(count) => report.files_copied += count,
            Err(e) => {
                warn!(component = %component.name, entry, error = %e, "failed to copy asset");
                report.warnings.push(BuildWarning::AssetCopyFailed {
                    component: component.name.clone(),
                    path: found,
                    message: e.to_string(),
                });
            }
        }
    }
}

/// Directory a component's assets are read from
///
/// `sourcePath` is relative to the workspace root; without one the component
/// is expected under `components/<name>`.
pub fn component_source_dir(workspace_root: &Path, component: &ComponentDescriptor) -> PathBuf {
    match &component.source_path {
        Some(path) => workspace_root.join(path),
        None => workspace_root.join(COMPONENTS_DIR).join(&component.name),
    }
}

/// Find a declared asset the way the copy step does
///
/// `nested` is the output directory the asset is destined for (`static` or
/// `layouts`); components may keep their files under it. Entries that are
/// absolute or climb out of the component are never found.
pub fn locate_asset(source: &Path, entry: &str, nested: &str) -> Option<PathBuf> {
    locate(source, &safe_relative(entry)?, nested)
}

/// Look for an entry directly under the component, then under its nested directory
fn locate(source: &Path, relative: &Path, nested: &str) -> Option<PathBuf> {
    [source.join(relative), source.join(nested).join(relative)]
        .into_iter()
        .find(|candidate| candidate.exists())
}

/// Normalize a declared relative path, rejecting absolute paths and `..`
fn safe_relative(entry: &str) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for part in Path::new(entry).components() {
        match part {
            Component::Normal(segment) => out.push(segment),
            Component::CurDir => {}
            _ => return None,
        }
    }
    if out.as_os_str().is_empty() {
        None
    } else {
        Some(out)
    }
}

/// Copy the template tree and every included component's assets
pub fn materialize(
    template_root: &Path,
    output_root: &Path,
    workspace_root: &Path,
    components: &[&ComponentDescriptor],
) -> Result<MaterializeReport> {
    let mut report = MaterializeReport {
        files_copied: copy_template_tree(template_root, output_root)?,
        warnings: Vec::new(),
    };
    report.absorb(ComponentMaterializer::new(workspace_root, output_root).copy_components(components));
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::ComponentStatus;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn relative_files(root: &Path) -> BTreeSet<String> {
        WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                e.path()
                    .strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    fn standalone(name: &str, source: &str, static_files: &[&str]) -> ComponentDescriptor {
        ComponentDescriptor {
            name: name.to_string(),
            status: ComponentStatus::Stable,
            source_path: Some(source.to_string()),
            static_files: static_files.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_excluded_segments() {
        assert!(is_excluded(OsStr::new(".git")));
        assert!(is_excluded(OsStr::new("node_modules")));
        assert!(is_excluded(OsStr::new(".DS_Store")));
        assert!(!is_excluded(OsStr::new("content")));
        assert!(!is_excluded(OsStr::new(".gitignore")));
    }

    #[test]
    fn test_copy_tree_filters_during_walk() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("template");
        write(&src.join("hugo.toml"), "title = 'x'");
        write(&src.join("content/_index.md"), "# Home");
        write(&src.join(".git/HEAD"), "ref: refs/heads/main");
        write(&src.join("assets/node_modules/pkg/index.js"), "");
        write(&src.join("static/.DS_Store"), "");
        write(&src.join(".gitignore"), "public/");

        let out = dir.path().join("out");
        let copied = copy_tree(&src, &out).unwrap();

        assert_eq!(copied, 3);
        assert_eq!(
            relative_files(&out),
            [".gitignore", "content/_index.md", "hugo.toml"]
                .into_iter()
                .map(String::from)
                .collect::<BTreeSet<_>>()
        );
    }

    #[test]
    fn test_static_files_mirrored_into_static_dir() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(&root.join("components/quiz-engine/js/quiz.js"), "quiz()");
        write(&root.join("components/quiz-engine/quiz/data/q1.json"), "{}");
        write(&root.join("components/quiz-engine/quiz/data/q2.json"), "{}");

        let quiz = standalone("quiz-engine", "components/quiz-engine", &["js/quiz.js", "quiz/"]);
        let out = root.join("out");
        let report = ComponentMaterializer::new(root, &out).copy_components(&[&quiz]);

        assert_eq!(report.files_copied, 3);
        assert!(report.warnings.is_empty());
        assert!(out.join("static/js/quiz.js").is_file());
        assert!(out.join("static/quiz/data/q2.json").is_file());
    }

    #[test]
    fn test_missing_static_file_is_a_warning() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(&root.join("components/quiz-engine/css/quiz.css"), "");

        let quiz = standalone("quiz-engine", "components/quiz-engine", &["js/quiz.js", "css/quiz.css"]);
        let out = root.join("out");
        let report = ComponentMaterializer::new(root, &out).copy_components(&[&quiz]);

        assert_eq!(report.files_copied, 1);
        assert_eq!(report.warnings.len(), 1);
        assert!(matches!(
            &report.warnings[0],
            BuildWarning::AssetMissing { component, .. } if component == "quiz-engine"
        ));
        assert!(out.join("static/css/quiz.css").is_file());
    }

    #[test]
    fn test_layouts_copied() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(&root.join("components/cite/layouts/shortcodes/cite.html"), "<cite/>");

        let mut cite = standalone("cite", "components/cite", &[]);
        cite.layouts = vec!["shortcodes/cite.html".to_string()];
        let out = root.join("out");
        let report = ComponentMaterializer::new(root, &out).copy_components(&[&cite]);

        assert_eq!(report.files_copied, 1);
        assert!(out.join("layouts/shortcodes/cite.html").is_file());
    }

    #[test]
    fn test_escaping_entry_rejected() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(&root.join("secret.txt"), "");

        let sneaky = standalone("sneaky", "components/sneaky", &["../../secret.txt"]);
        let out = root.join("out");
        let report = ComponentMaterializer::new(root, &out).copy_components(&[&sneaky]);

        assert_eq!(report.files_copied, 0);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_source_dir_defaults_to_components_dir() {
        let root = Path::new("/work");
        let mut quiz = standalone("quiz-engine", "vendor/quiz", &[]);
        assert_eq!(component_source_dir(root, &quiz), root.join("vendor/quiz"));

        quiz.source_path = None;
        assert_eq!(
            component_source_dir(root, &quiz),
            root.join(COMPONENTS_DIR).join("quiz-engine")
        );
        assert_eq!(THEMES_DIR, "themes");
    }

    #[test]
    fn test_locate_asset_checks_nested_dir() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("components/quiz-engine");
        write(&source.join("static/js/quiz.js"), "quiz()");
        write(&source.join("css/quiz.css"), "");

        assert_eq!(
            locate_asset(&source, "js/quiz.js", STATIC_DIR),
            Some(source.join("static/js/quiz.js"))
        );
        assert_eq!(
            locate_asset(&source, "./css/quiz.css", STATIC_DIR),
            Some(source.join("css/quiz.css"))
        );
        assert_eq!(locate_asset(&source, "js/quiz.js", LAYOUTS_DIR), None);
        assert_eq!(locate_asset(&source, "../quiz-engine/css/quiz.css", STATIC_DIR), None);
    }

    #[test]
    fn test_theme_component_copied_whole() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(&root.join("themes/compose/layouts/index.html"), "<html/>");
        write(&root.join("themes/compose/theme.toml"), "name = 'Compose'");
        write(&root.join("themes/compose/.git"), "gitdir: ../../.git/modules/compose");

        let theme = standalone("compose-theme", "themes/compose", &[]);
        let out = root.join("out");
        let report = ComponentMaterializer::new(root, &out).copy_components(&[&theme]);

        assert_eq!(report.files_copied, 2);
        assert!(out.join("themes/compose/layouts/index.html").is_file());
        assert!(!out.join("themes/compose/.git").exists());
    }

    #[test]
    fn test_missing_theme_component_skipped() {
        let dir = TempDir::new().unwrap();
        let theme = standalone("compose-theme", "themes/compose", &[]);
        let out = dir.path().join("out");
        let report = ComponentMaterializer::new(dir.path(), &out).copy_components(&[&theme]);

        assert_eq!(report.files_copied, 0);
        assert!(matches!(report.warnings[0], BuildWarning::ThemeAssetSkipped { .. }));
        assert!(!out.join("themes").exists());
    }

    #[test]
    fn test_materialize_is_deterministic() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        let template = root.join("templates/default");
        write(&template.join("hugo.toml"), "title = 'x'");
        write(&template.join("content/posts/first.md"), "first");
        write(&root.join("components/quiz-engine/js/quiz.js"), "quiz()");
        let quiz = standalone("quiz-engine", "components/quiz-engine", &["js/quiz.js"]);

        let out = root.join("out");
        let first = materialize(&template, &out, root, &[&quiz]).unwrap();
        let first_files = relative_files(&out);

        std::fs::remove_dir_all(&out).unwrap();
        let second = materialize(&template, &out, root, &[&quiz]).unwrap();

        assert_eq!(first.files_copied, second.files_copied);
        assert_eq!(first_files, relative_files(&out));
        assert_eq!(first.files_copied, 3);
    }
}
