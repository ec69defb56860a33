//! `sitefactory generate`

use crate::GenerateTarget;
use anyhow::{bail, Result};
use colored::Colorize;
use sitefactory_core::{
    component_stanza, scaffold_template, ComponentStatus, FactoryError, ScaffoldOptions, Workspace,
};

pub fn run(workspace: &Workspace, what: GenerateTarget) -> Result<()> {
    match what {
        GenerateTarget::Template {
            name,
            force,
            based_on,
            description,
            author,
            theme,
        } => {
            let options = ScaffoldOptions {
                force,
                based_on,
                description,
                author,
                theme,
            };
            generate_template(workspace, &name, &options)
        }
        GenerateTarget::Component {
            name,
            status,
            description,
        } => generate_component(&name, &status, description.as_deref()),
    }
}

fn generate_template(workspace: &Workspace, name: &str, options: &ScaffoldOptions) -> Result<()> {
    let report = match scaffold_template(workspace, name, options) {
        Ok(report) => report,
        Err(e @ FactoryError::TemplateExists { .. }) => bail!("{}. Use --force to overwrite", e),
        Err(e) => return Err(e.into()),
    };

    if report.replaced {
        println!("{} {}", "Overwrote template".yellow(), name.bold());
    } else {
        println!("{} {}", "Generated template".green(), name.bold());
    }
    println!("  {}", report.root.display().to_string().dimmed());
    for file in &report.written {
        println!("  {} {}", "+".green(), file.display());
    }
    if let Some(base) = &options.based_on {
        println!("  {} files taken from {}", report.inherited, base.cyan());
    }

    println!();
    println!("{}", "Next steps".cyan().bold());
    println!("  1. Declare components in components.yml");
    println!("  2. Add pages under content/");
    println!("  3. Run: sitefactory build --template {}", name);
    Ok(())
}

fn generate_component(name: &str, status: &str, description: Option<&str>) -> Result<()> {
    let status = ComponentStatus::from(status.to_string());
    if status.is_unknown() {
        bail!(
            "unknown status '{}' (expected stable, experimental, planned or deprecated)",
            status.as_str()
        );
    }

    let stanza = component_stanza(name, status, description)?;
    // stdout stays plain YAML so it can be appended to a manifest
    eprintln!("{}", "Add under `components:` in components.yml".dimmed());
    print!("{}", stanza);
    Ok(())
}
