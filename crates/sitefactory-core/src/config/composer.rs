//! Site configuration composition
//!
//! The base configuration is edited in place as a TOML document, so comments,
//! key order and formatting of untouched lines survive. Keys that are absent
//! from the base are inserted rather than skipped.

use crate::build::Environment;
use thiserror::Error;
use toml_edit::{DocumentMut, Item, Table, TableLike, Value};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("base configuration is not valid TOML: {0}")]
    Parse(#[from] toml_edit::TomlError),
}

/// Build-time overrides applied on top of a template's base configuration
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub theme: Option<String>,
    pub base_url: Option<String>,
    pub environment: Environment,
}

/// Produce the target site configuration text
pub fn compose(base: &str, overrides: &ConfigOverrides) -> Result<String, ConfigError> {
    let mut doc: DocumentMut = base.parse()?;
    apply(&mut doc, overrides);
    Ok(doc.to_string())
}

/// Apply overrides to an already parsed document
pub fn apply(doc: &mut DocumentMut, overrides: &ConfigOverrides) {
    let root = doc.as_table_mut();

    if let Some(theme) = &overrides.theme {
        let current = root.get("theme").and_then(Item::as_str);
        if current != Some(theme.as_str()) {
            set(root, "theme", theme.as_str());
        }
    }

    if let Some(base_url) = &overrides.base_url {
        set(root, "baseURL", base_url.as_str());
    }

    if overrides.environment == Environment::Production {
        apply_production(root);
    }
}

fn apply_production(root: &mut Table) {
    set(root, "enableRobotsTXT", true);

    let params = root
        .entry("params")
        .or_insert(Item::Table(Table::new()));
    // `params = { ... }` is as valid as a `[params]` section
    if let Some(params) = params.as_table_like_mut() {
        set(params, "env", Environment::Production.as_str());
    }
}

/// Assign a value, keeping the spacing and trailing comment of an existing one
fn set<T>(table: &mut T, key: &str, new: impl Into<Value>)
where
    T: TableLike + ?Sized,
{
    let mut new = new.into();
    match table.get_mut(key).and_then(Item::as_value_mut) {
        Some(existing) => {
            *new.decor_mut() = existing.decor().clone();
            *existing = new;
        }
        None => {
            table.insert(key, Item::Value(new));
        }
    }
}
