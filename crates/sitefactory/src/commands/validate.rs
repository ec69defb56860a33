//! `sitefactory validate`

use anyhow::{bail, Context, Result};
use colored::Colorize;
use sitefactory_core::{validate_template, Workspace};

pub fn run(workspace: &Workspace, template: Option<&str>) -> Result<()> {
    let names = match template {
        Some(name) => vec![name.to_string()],
        None => workspace.templates().with_context(|| {
            format!("Failed to read templates in {}", workspace.templates_dir().display())
        })?,
    };

    if names.is_empty() {
        println!("{}", "No templates to validate".yellow());
        return Ok(());
    }

    let mut failed = Vec::new();
    for name in &names {
        let report = validate_template(workspace, name);

        println!("{} {}", "Template".cyan().bold(), name.bold());
        for warning in &report.warnings {
            println!("  {} {}", "warning:".yellow(), warning);
        }
        for error in &report.errors {
            println!("  {} {}", "error:".red().bold(), error);
        }

        if report.is_valid() {
            println!("  {}", "valid".green());
        } else {
            failed.push(name.as_str());
        }
        println!();
    }

    if !failed.is_empty() {
        bail!("Validation failed for {}", failed.join(", "));
    }
    Ok(())
}
