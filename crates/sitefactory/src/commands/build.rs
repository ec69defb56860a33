//! `sitefactory build`

use crate::BuildArgs;
use anyhow::{anyhow, Result};
use colored::Colorize;
use sitefactory_core::validate::{validate_output, validate_template};
use sitefactory_core::{BuildOrchestrator, BuildRequest, BuildResult, Hugo, SiteGenerator, Workspace};
use std::time::Duration;

pub async fn run(workspace: &Workspace, args: BuildArgs, verbose: bool) -> Result<()> {
    cliclack::intro(format!("sitefactory {}", crate::CLI_VERSION))?;

    let output_report = validate_output(&args.output);
    if !output_report.is_valid() {
        for error in &output_report.errors {
            cliclack::log::error(error)?;
        }
        output_report.into_result()?;
    }

    // The pipeline trusts its input, so structural problems stop the build here
    let report = validate_template(workspace, &args.template);
    for warning in &report.warnings {
        cliclack::log::warning(warning)?;
    }
    if !report.is_valid() {
        for error in &report.errors {
            cliclack::log::error(error)?;
        }
        report.into_result()?;
    }

    let mut request = BuildRequest::new(&args.template, &args.theme, &args.output)
        .with_components(args.components)
        .with_environment(args.environment)
        .with_timeout(Duration::from_secs(args.timeout));
    request.base_url = args.base_url;
    request.config = args.config;
    request.minify = args.minify;
    request.draft = args.draft;
    request.future = args.future;
    request.verbose = verbose;

    cliclack::log::info(format!(
        "Template {}, theme {}, environment {}",
        request.template.cyan(),
        request.theme.cyan(),
        request.environment
    ))?;

    let generator = Hugo::default();
    let generator_name = generator.display_name().to_string();
    let orchestrator = BuildOrchestrator::new(workspace.clone(), generator);

    let spinner = cliclack::spinner();
    spinner.start(format!("Building site with {}...", generator_name));

    let result = match orchestrator.run(&request).await {
        Ok(result) => result,
        Err(failure) => {
            spinner.stop(format!("Build failed during {}", failure.stage));
            return Err(anyhow!(failure));
        }
    };

    spinner.stop(format!("Built site in {}", result.output.display()));

    if verbose {
        for line in result.generator.stdout.lines() {
            println!("  {}", line.dimmed());
        }
    }

    for warning in &result.warnings {
        cliclack::log::warning(warning.to_string())?;
    }

    print_summary(&result);

    if result.warning_count() == 0 {
        cliclack::outro("Site ready")?;
    } else {
        cliclack::outro(format!("Site ready with {} warnings", result.warning_count()))?;
    }

    Ok(())
}

fn print_summary(result: &BuildResult) {
    println!();
    println!("  {}", "Build summary".cyan().bold());
    println!();
    println!("  {:<12} {}", "Template".dimmed(), result.template);
    println!("  {:<12} {}", "Output".dimmed(), result.output.display());

    let included = if result.included.is_empty() {
        "none".dimmed().to_string()
    } else {
        result.included.join(", ").green().to_string()
    };
    println!("  {:<12} {}", "Included".dimmed(), included);

    for (name, reason) in &result.excluded {
        println!("  {:<12} {} ({})", "Excluded".dimmed(), name.yellow(), reason);
    }

    println!("  {:<12} {}", "Copied".dimmed(), result.files_copied);
    match &result.stats {
        Some(stats) => println!(
            "  {:<12} {} files, {}",
            "Site".dimmed(),
            stats.file_count,
            stats.human_size()
        ),
        None => println!("  {:<12} {}", "Site".dimmed(), "statistics unavailable".yellow()),
    }
    println!();
}
