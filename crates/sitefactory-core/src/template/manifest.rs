//! Template manifest types and parsing (`components.yml`)

use crate::error::{FactoryError, Result};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

/// Name of the component manifest inside a template directory
pub const MANIFEST_FILE: &str = "components.yml";

/// Declared maturity of a component
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComponentStatus {
    Stable,
    Experimental,
    Planned,
    Deprecated,
    /// Any other status string, kept verbatim so it can be reported
    Unknown(String),
}

impl ComponentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ComponentStatus::Stable => "stable",
            ComponentStatus::Experimental => "experimental",
            ComponentStatus::Planned => "planned",
            ComponentStatus::Deprecated => "deprecated",
            ComponentStatus::Unknown(raw) => raw,
        }
    }

    /// Status icon used in listings
    pub fn icon(&self) -> &'static str {
        match self {
            ComponentStatus::Stable => "✅",
            ComponentStatus::Experimental => "🧪",
            ComponentStatus::Planned => "📋",
            ComponentStatus::Deprecated => "❌",
            ComponentStatus::Unknown(_) => "❓",
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, ComponentStatus::Unknown(_))
    }
}

impl Default for ComponentStatus {
    fn default() -> Self {
        ComponentStatus::Unknown(String::new())
    }
}

impl From<String> for ComponentStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "stable" => ComponentStatus::Stable,
            "experimental" => ComponentStatus::Experimental,
            "planned" => ComponentStatus::Planned,
            "deprecated" => ComponentStatus::Deprecated,
            _ => ComponentStatus::Unknown(raw),
        }
    }
}

impl From<ComponentStatus> for String {
    fn from(status: ComponentStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ComponentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentStatus::Unknown(raw) if raw.is_empty() => write!(f, "unknown"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

/// One declared component of a template
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    /// Filled from the mapping key, never read from the body
    #[serde(skip)]
    pub name: String,

    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub status: ComponentStatus,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    /// Directory holding the component's assets, relative to the workspace root
    #[serde(
        default,
        rename = "sourcePath",
        alias = "submodule_path",
        skip_serializing_if = "Option::is_none"
    )]
    pub source_path: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub static_files: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub layouts: Vec<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub configuration: BTreeMap<String, serde_yaml::Value>,
}

impl ComponentDescriptor {
    /// Whether the source path points into the shared themes tree
    pub fn is_theme(&self) -> bool {
        self.source_path
            .as_deref()
            .and_then(|p| p.trim_start_matches("./").split('/').next())
            .is_some_and(|segment| segment == "themes")
    }

    /// Directory name the theme is materialized under (last path segment)
    pub fn theme_name(&self) -> Option<&str> {
        self.source_path
            .as_deref()
            .and_then(|p| p.trim_end_matches('/').rsplit('/').next())
            .filter(|s| !s.is_empty())
    }
}

/// `template:` section of the manifest
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
}

/// `hugo:` section of the manifest (generator requirement hints)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratorRequirements {
    #[serde(default, rename = "minVersion")]
    pub min_version: Option<String>,
    #[serde(default)]
    pub extended: bool,
}

/// Raw shape of `components.yml`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComponentsManifest {
    #[serde(default)]
    pub template: TemplateMeta,

    #[serde(default, deserialize_with = "ordered_components")]
    pub components: Vec<ComponentDescriptor>,

    #[serde(default)]
    pub hugo: GeneratorRequirements,

    /// Pass-through generator hints, opaque to the pipeline
    #[serde(default)]
    pub build: BTreeMap<String, serde_yaml::Value>,
}

impl ComponentsManifest {
    pub fn parse(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        // An empty file deserializes as null
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }
}

/// Keep the mapping's declaration order and reject duplicate names
fn ordered_components<'de, D>(deserializer: D) -> std::result::Result<Vec<ComponentDescriptor>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ComponentsVisitor;

    impl<'de> Visitor<'de> for ComponentsVisitor {
        type Value = Vec<ComponentDescriptor>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a mapping of component name to component definition")
        }

        fn visit_unit<E: serde::de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
            let mut seen = HashSet::new();
            let mut components = Vec::new();
            while let Some((name, body)) = map.next_entry::<String, Option<ComponentDescriptor>>()? {
                if !seen.insert(name.clone()) {
                    return Err(serde::de::Error::custom(format!(
                        "duplicate component '{}'",
                        name
                    )));
                }
                let mut component = body.unwrap_or_default();
                component.name = name;
                components.push(component);
            }
            Ok(components)
        }
    }

    deserializer.deserialize_any(ComponentsVisitor)
}

/// Immutable snapshot of one template, loaded once per build
#[derive(Debug, Clone)]
pub struct TemplateDescriptor {
    pub name: String,
    pub version: String,
    pub description: String,
    pub author: String,
    pub min_generator_version: Option<String>,
    pub requires_extended: bool,
    /// Template directory on disk
    pub root: PathBuf,
    /// Base site configuration text, if the template ships one
    pub base_config: Option<String>,
    /// Components in declaration order
    pub components: Vec<ComponentDescriptor>,
    pub build_hints: BTreeMap<String, serde_yaml::Value>,
}

impl TemplateDescriptor {
    /// Load a template from its directory
    ///
    /// A missing `components.yml` yields a template without components;
    /// `config_file` names the site configuration file inside the template.
    pub fn load(root: &Path, config_file: &str) -> Result<Self> {
        let dir_name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let manifest_path = root.join(MANIFEST_FILE);
        let manifest = if manifest_path.is_file() {
            let content = std::fs::read_to_string(&manifest_path)
                .map_err(|e| FactoryError::io(&manifest_path, e))?;
            ComponentsManifest::parse(&content).map_err(|source| FactoryError::Manifest {
                path: manifest_path.clone(),
                source,
            })?
        } else {
            ComponentsManifest::default()
        };

        let config_path = root.join(config_file);
        let base_config = if config_path.is_file() {
            Some(
                std::fs::read_to_string(&config_path)
                    .map_err(|e| FactoryError::io(&config_path, e))?,
            )
        } else {
            None
        };

        Ok(Self::from_manifest(dir_name, root.to_path_buf(), manifest, base_config))
    }

    pub fn from_manifest(
        dir_name: String,
        root: PathBuf,
        manifest: ComponentsManifest,
        base_config: Option<String>,
    ) -> Self {
        let meta = manifest.template;
        Self {
            name: if meta.name.is_empty() { dir_name } else { meta.name },
            version: meta.version,
            description: meta.description,
            author: meta.author,
            min_generator_version: manifest.hugo.min_version,
            requires_extended: manifest.hugo.extended,
            root,
            base_config,
            components: manifest.components,
            build_hints: manifest.build,
        }
    }

    pub fn component(&self, name: &str) -> Option<&ComponentDescriptor> {
        self.components.iter().find(|c| c.name == name)
    }
}
