//! sitefactory CLI - Assemble Hugo sites from templates, themes and components

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use sitefactory_core::build::DEFAULT_GENERATOR_TIMEOUT;
use sitefactory_core::logging::{self, LogOptions};
use sitefactory_core::{Environment, Workspace};
use std::path::PathBuf;

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(name = "sitefactory")]
#[command(about = "Assemble Hugo sites from templates, themes and components")]
#[command(version)]
pub struct Args {
    /// Workspace root containing templates/, themes/ and components/ (default: $SITEFACTORY_ROOT or the current directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level: debug, info, warn, error or quiet (default: $HUGO_LOG_LEVEL or info)
    #[arg(long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a site from a template
    Build(BuildArgs),
    /// List templates, themes and components
    List(ListArgs),
    /// Check a template's structure and component declarations
    Validate(ValidateArgs),
    /// Generate a new template or a component declaration
    Generate(GenerateArgs),
}

#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Template name
    #[arg(short, long)]
    pub template: String,

    /// Theme name
    #[arg(long, default_value = "compose")]
    pub theme: String,

    /// Components to include (comma-separated); stable components are always included
    #[arg(short, long, value_delimiter = ',')]
    pub components: Vec<String>,

    /// Output directory
    #[arg(short, long, default_value = "./site")]
    pub output: PathBuf,

    /// Alternative base site configuration replacing the template's hugo.toml
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Minify the generated site
    #[arg(long)]
    pub minify: bool,

    /// Include draft content
    #[arg(long)]
    pub draft: bool,

    /// Include content dated in the future
    #[arg(long)]
    pub future: bool,

    /// Override the site's baseURL
    #[arg(long = "base-url")]
    pub base_url: Option<String>,

    /// Target environment (development, staging, production)
    #[arg(short, long, default_value = "development")]
    pub environment: Environment,

    /// Seconds the generator may run before the build fails
    #[arg(long, default_value_t = DEFAULT_GENERATOR_TIMEOUT.as_secs())]
    pub timeout: u64,
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// What to list
    #[arg(value_enum, default_value = "all")]
    pub what: ListTarget,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListTarget {
    Templates,
    Themes,
    Components,
    All,
}

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Template to validate (default: every template)
    pub template: Option<String>,
}

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    #[command(subcommand)]
    pub what: GenerateTarget,
}

#[derive(Subcommand, Debug)]
pub enum GenerateTarget {
    /// Create templates/<name> with a site configuration, manifest and sample content
    Template {
        /// Template name
        name: String,

        /// Write into an existing template directory
        #[arg(long)]
        force: bool,

        /// Take content/ and static/ from an existing template
        #[arg(long = "based-on")]
        based_on: Option<String>,

        /// Template description
        #[arg(long)]
        description: Option<String>,

        /// Template author
        #[arg(long)]
        author: Option<String>,

        /// Theme named in the generated configuration
        #[arg(long, default_value = "compose")]
        theme: String,
    },
    /// Print a components.yml entry for a new component
    Component {
        /// Component name
        name: String,

        /// Component status (stable, experimental, planned, deprecated)
        #[arg(long, default_value = "experimental")]
        status: String,

        /// Component description
        #[arg(long)]
        description: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    let args = Args::parse();

    logging::init(&LogOptions {
        level: args.log_level.clone(),
        verbose: args.verbose,
    })?;

    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    let workspace = Workspace::resolve(args.root.clone(), cwd);

    let result = match args.command {
        Command::Build(build_args) => commands::build::run(&workspace, build_args, args.verbose).await,
        Command::List(list_args) => commands::list::run(&workspace, list_args.what),
        Command::Validate(validate_args) => {
            commands::validate::run(&workspace, validate_args.template.as_deref())
        }
        Command::Generate(generate_args) => commands::generate::run(&workspace, generate_args.what),
    };

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}
