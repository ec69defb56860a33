//! Skeletons for new templates and component declarations
//!
//! A generated template is immediately usable: it passes
//! [`validate_template`](crate::validate::validate_template) and builds with
//! the workspace's default theme.

use crate::config::SITE_CONFIG_FILE;
use crate::error::{FactoryError, MissingKind, Result};
use crate::materialize::{copy_file, is_excluded, STATIC_DIR};
use crate::template::{
    ComponentDescriptor, ComponentStatus, GeneratorRequirements, TemplateMeta, MANIFEST_FILE,
};
use crate::workspace::{Workspace, COMPONENTS_DIR, THEMES_DIR};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Oldest generator release the generated configuration is written for
pub const DEFAULT_MIN_VERSION: &str = "0.110.0";

const CONTENT_DIR: &str = "content";
const ARCHETYPES_DIR: &str = "archetypes";

/// Directories taken over from a base template
const INHERITED_DIRS: &[&str] = &[CONTENT_DIR, STATIC_DIR];

#[derive(Debug, Clone)]
pub struct ScaffoldOptions {
    /// Write into an existing template directory
    pub force: bool,
    /// Template whose `content/` and `static/` replace the sample content
    pub based_on: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    /// Theme named in the generated `hugo.toml`
    pub theme: String,
}

impl Default for ScaffoldOptions {
    fn default() -> Self {
        Self {
            force: false,
            based_on: None,
            description: None,
            author: None,
            theme: "compose".to_string(),
        }
    }
}

/// What [`scaffold_template`] wrote
#[derive(Debug, Clone, Default)]
pub struct ScaffoldReport {
    pub root: PathBuf,
    /// Files written from the skeleton, relative to `root`
    pub written: Vec<PathBuf>,
    /// Files taken over from the base template
    pub inherited: usize,
    /// The directory existed before and was written into
    pub replaced: bool,
}

/// `components.yml` as written for a new template
#[derive(Serialize)]
struct ManifestSkeleton {
    template: TemplateMeta,
    components: BTreeMap<String, ComponentDescriptor>,
    hugo: GeneratorRequirements,
    build: BTreeMap<String, serde_yaml::Value>,
}

/// Create `templates/<name>` with a site configuration, a manifest and sample content
pub fn scaffold_template(
    workspace: &Workspace,
    name: &str,
    options: &ScaffoldOptions,
) -> Result<ScaffoldReport> {
    check_name(name)?;

    let root = workspace.template_dir(name);
    let replaced = root.exists();
    if replaced && !options.force {
        return Err(FactoryError::TemplateExists {
            name: name.to_string(),
            path: root,
        });
    }

    let base = match &options.based_on {
        Some(base_name) => {
            check_name(base_name)?;
            let base = workspace.template_dir(base_name);
            if !base.is_dir() {
                return Err(FactoryError::NotFound {
                    kind: MissingKind::Template,
                    name: base_name.clone(),
                    path: base,
                });
            }
            Some(base)
        }
        None => None,
    };

    info!(template = name, path = %root.display(), replaced, "generating template");

    let mut report = ScaffoldReport {
        root: root.clone(),
        replaced,
        ..Default::default()
    };

    let manifest = manifest_text(workspace, name, options)?;
    write_skeleton_file(&root, MANIFEST_FILE, &manifest, &mut report)?;
    write_skeleton_file(&root, SITE_CONFIG_FILE, &site_config_text(name, options), &mut report)?;

    for dir in [CONTENT_DIR, STATIC_DIR, ARCHETYPES_DIR] {
        let path = root.join(dir);
        std::fs::create_dir_all(&path).map_err(|e| FactoryError::io(&path, e))?;
    }

    match &base {
        Some(base) => {
            for dir in INHERITED_DIRS {
                report.inherited += copy_missing(&base.join(dir), &root.join(dir))?;
            }
        }
        None => {
            for (relative, text) in sample_content() {
                write_skeleton_file(&root, relative, text, &mut report)?;
            }
            write_skeleton_file(&root, "static/.gitkeep", "", &mut report)?;
        }
    }

    for (relative, text) in archetypes() {
        write_skeleton_file(&root, relative, text, &mut report)?;
    }

    info!(
        template = name,
        written = report.written.len(),
        inherited = report.inherited,
        "template generated"
    );
    Ok(report)
}

/// A manifest entry for a new component, ready to paste under `components:`
///
/// Components that are not planned point at `components/<name>`.
pub fn component_stanza(
    name: &str,
    status: ComponentStatus,
    description: Option<&str>,
) -> std::result::Result<String, serde_yaml::Error> {
    let source_path =
        (status != ComponentStatus::Planned).then(|| format!("{}/{}", COMPONENTS_DIR, name));
    let component = ComponentDescriptor {
        name: name.to_string(),
        version: "1.0.0".to_string(),
        status,
        description: description
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} component", name)),
        source_path,
        ..Default::default()
    };

    let mut entry = BTreeMap::new();
    entry.insert(name.to_string(), component);
    let yaml = serde_yaml::to_string(&entry)?;

    Ok(yaml.lines().map(|line| format!("  {}\n", line)).collect())
}

/// Template names are single, visible directory names
fn check_name(name: &str) -> Result<()> {
    let mut parts = Path::new(name).components();
    let single = matches!(
        (parts.next(), parts.next()),
        (Some(Component::Normal(_)), None)
    );
    if single && !name.starts_with('.') {
        Ok(())
    } else {
        Err(FactoryError::Validation(vec![format!(
            "Invalid template name '{}'",
            name
        )]))
    }
}

fn write_skeleton_file(
    root: &Path,
    relative: &str,
    text: &str,
    report: &mut ScaffoldReport,
) -> Result<()> {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| FactoryError::io(parent, e))?;
    }
    std::fs::write(&path, text).map_err(|e| FactoryError::io(&path, e))?;
    debug!(path = %path.display(), "wrote skeleton file");
    report.written.push(PathBuf::from(relative));
    Ok(())
}

/// Copy files from `src` that do not exist yet under `dest`
fn copy_missing(src: &Path, dest: &Path) -> Result<usize> {
    if !src.is_dir() {
        return Ok(0);
    }

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
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(src).unwrap_or_else(|_| entry.path());
        let target = dest.join(relative);
        if target.exists() {
            continue;
        }
        copy_file(entry.path(), &target)?;
        copied += 1;
    }
    Ok(copied)
}

fn manifest_text(workspace: &Workspace, name: &str, options: &ScaffoldOptions) -> Result<String> {
    let mut components = BTreeMap::new();
    // Only reference a theme the workspace can actually supply
    if workspace.theme_dir(&options.theme).is_dir() {
        let theme_component = format!("{}-theme", options.theme);
        components.insert(
            theme_component.clone(),
            ComponentDescriptor {
                name: theme_component,
                version: "1.0.0".to_string(),
                status: ComponentStatus::Stable,
                description: format!("{} theme", options.theme),
                source_path: Some(format!("{}/{}", THEMES_DIR, options.theme)),
                ..Default::default()
            },
        );
    }

    let mut build = BTreeMap::new();
    build.insert("writeStats".to_string(), serde_yaml::Value::Bool(true));

    let skeleton = ManifestSkeleton {
        template: TemplateMeta {
            name: name.to_string(),
            version: "1.0.0".to_string(),
            description: options
                .description
                .clone()
                .unwrap_or_else(|| format!("{} site template", name)),
            author: options.author.clone().unwrap_or_default(),
        },
        components,
        hugo: GeneratorRequirements {
            min_version: Some(DEFAULT_MIN_VERSION.to_string()),
            extended: false,
        },
        build,
    };

    serde_yaml::to_string(&skeleton).map_err(|source| FactoryError::ManifestWrite {
        path: workspace.template_dir(name).join(MANIFEST_FILE),
        source,
    })
}

fn site_config_text(name: &str, options: &ScaffoldOptions) -> String {
    let mut chars = name.chars();
    let title = match chars.next() {
        Some(first) => format!("{}{} Site", first.to_uppercase(), chars.as_str()),
        None => "Site".to_string(),
    };
    let description = options
        .description
        .clone()
        .unwrap_or_else(|| format!("{} site", title));

    format!(
        r#"# Site configuration for the {name} template
# theme and baseURL are replaced at build time

baseURL = "http://localhost:1313/"
languageCode = "en-us"
title = {title:?}
theme = {theme:?}

[menu]
  [[menu.main]]
    name = "Home"
    url = "/"
    weight = 1

  [[menu.main]]
    name = "About"
    url = "/about/"
    weight = 2

[params]
  description = {description:?}
  author = {author:?}

[markup]
  [markup.goldmark.renderer]
    unsafe = true
  [markup.highlight]
    style = "github"
"#,
        name = name,
        title = title,
        theme = options.theme,
        description = description,
        author = options.author.as_deref().unwrap_or(""),
    )
}

fn sample_content() -> [(&'static str, &'static str); 3] {
    [
        (
            "content/_index.md",
            "---\ntitle: \"Welcome\"\ndraft: false\n---\n\nThis site was assembled from a generated template.\nReplace this page with your own introduction.\n",
        ),
        (
            "content/about.md",
            "---\ntitle: \"About\"\ndraft: false\n---\n\nTell readers who runs this site and why.\n",
        ),
        (
            "content/posts/first-post.md",
            "---\ntitle: \"First Post\"\ndraft: true\ntags: [\"hello\"]\ncategories: [\"blog\"]\n---\n\nDrafts are only rendered with `--draft`.\n",
        ),
    ]
}

fn archetypes() -> [(&'static str, &'static str); 2] {
    [
        (
            "archetypes/default.md",
            "---\ntitle: \"{{ replace .Name \"-\" \" \" | title }}\"\ndate: {{ .Date }}\ndraft: true\n---\n",
        ),
        (
            "archetypes/posts.md",
            "---\ntitle: \"{{ replace .Name \"-\" \" \" | title }}\"\ndate: {{ .Date }}\ndraft: true\ntags: []\ncategories: [\"blog\"]\n---\n",
        ),
    ]
}
