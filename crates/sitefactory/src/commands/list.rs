//! `sitefactory list`

use crate::ListTarget;
use anyhow::{Context, Result};
use colored::Colorize;
use sitefactory_core::config::SITE_CONFIG_FILE;
use sitefactory_core::template::MANIFEST_FILE;
use sitefactory_core::{TemplateDescriptor, Workspace};
use std::path::Path;

/// How complete a template directory is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Readiness {
    Ready,
    Incomplete,
    Empty,
}

impl Readiness {
    fn of(dir: &Path) -> Self {
        match (dir.join(SITE_CONFIG_FILE).is_file(), dir.join(MANIFEST_FILE).is_file()) {
            (true, true) => Readiness::Ready,
            (true, false) => Readiness::Incomplete,
            _ => Readiness::Empty,
        }
    }

    fn label(&self) -> String {
        match self {
            Readiness::Ready => "ready".green().to_string(),
            Readiness::Incomplete => "incomplete".yellow().to_string(),
            Readiness::Empty => "empty".red().to_string(),
        }
    }
}

pub fn run(workspace: &Workspace, what: ListTarget) -> Result<()> {
    if matches!(what, ListTarget::Templates | ListTarget::All) {
        list_templates(workspace)?;
    }
    if matches!(what, ListTarget::Themes | ListTarget::All) {
        list_themes(workspace)?;
    }
    if matches!(what, ListTarget::Components | ListTarget::All) {
        list_components(workspace)?;
    }
    Ok(())
}

fn templates(workspace: &Workspace) -> Result<Vec<String>> {
    workspace.templates().with_context(|| {
        format!("Failed to read templates in {}", workspace.templates_dir().display())
    })
}

fn list_templates(workspace: &Workspace) -> Result<()> {
    println!("{}", "Templates".cyan().bold());
    let names = templates(workspace)?;
    if names.is_empty() {
        println!("  {}", "none found".dimmed());
    }
    for name in names {
        let readiness = Readiness::of(&workspace.template_dir(&name));
        println!("  {:<24} {}", name, readiness.label());
    }
    println!();
    Ok(())
}

fn list_themes(workspace: &Workspace) -> Result<()> {
    println!("{}", "Themes".cyan().bold());
    let names = workspace.themes().with_context(|| {
        format!("Failed to read themes in {}", workspace.themes_dir().display())
    })?;
    if names.is_empty() {
        println!("  {}", "none found".dimmed());
    }
    for name in names {
        println!("  {}", name);
    }
    println!();
    Ok(())
}

fn list_components(workspace: &Workspace) -> Result<()> {
    println!("{}", "Components".cyan().bold());
    for name in templates(workspace)? {
        let dir = workspace.template_dir(&name);
        if !dir.join(MANIFEST_FILE).is_file() {
            continue;
        }

        let template = match TemplateDescriptor::load(&dir, SITE_CONFIG_FILE) {
            Ok(template) => template,
            Err(e) => {
                eprintln!("{} {}", "Warning:".yellow(), e);
                continue;
            }
        };

        println!("  {}", name.bold());
        if template.components.is_empty() {
            println!("    {}", "no components".dimmed());
        }
        for component in &template.components {
            let version = if component.version.is_empty() {
                String::new()
            } else {
                format!(" {}", component.version.dimmed())
            };
            println!(
                "    {} {}{} [{}]",
                component.status.icon(),
                component.name,
                version,
                component.status
            );
            if !component.description.is_empty() {
                println!("       {}", component.description.dimmed());
            }
        }
    }
    println!();
    Ok(())
}
