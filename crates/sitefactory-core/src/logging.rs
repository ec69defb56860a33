//! Tracing subscriber setup
//!
//! Level precedence: explicit level, then `HUGO_LOG_LEVEL`, then `info`
//! (`debug` when verbose). `HUGO_LOG_FILE` redirects output to a file.

use anyhow::{anyhow, Context, Result};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

pub const LOG_LEVEL_ENV: &str = "HUGO_LOG_LEVEL";
pub const LOG_FILE_ENV: &str = "HUGO_LOG_FILE";

#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Level requested on the command line
    pub level: Option<String>,
    pub verbose: bool,
}

/// Parse a level name as accepted by `--log-level` and `HUGO_LOG_LEVEL`
pub fn parse_level(raw: &str) -> Result<LevelFilter> {
    match raw.trim().to_lowercase().as_str() {
        "trace" => Ok(LevelFilter::TRACE),
        "debug" => Ok(LevelFilter::DEBUG),
        "info" => Ok(LevelFilter::INFO),
        "warn" | "warning" => Ok(LevelFilter::WARN),
        "error" => Ok(LevelFilter::ERROR),
        "quiet" | "off" => Ok(LevelFilter::OFF),
        other => Err(anyhow!(
            "Unknown log level '{}' (expected debug, info, warn, error or quiet)",
            other
        )),
    }
}

/// Pick the effective level
pub fn resolve_level(flag: Option<&str>, env: Option<&str>, verbose: bool) -> Result<LevelFilter> {
    if let Some(level) = flag {
        return parse_level(level);
    }
    if let Some(level) = env.filter(|l| !l.trim().is_empty()) {
        return parse_level(level).with_context(|| format!("Invalid {}", LOG_LEVEL_ENV));
    }
    Ok(if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    })
}

/// Install the global subscriber
pub fn init(options: &LogOptions) -> Result<()> {
    let env_level = std::env::var(LOG_LEVEL_ENV).ok();
    let level = resolve_level(options.level.as_deref(), env_level.as_deref(), options.verbose)?;
    let filter = EnvFilter::new(level.to_string());

    let log_file = std::env::var_os(LOG_FILE_ENV)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from);

    let installed = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .without_time()
            .with_writer(std::io::stderr)
            .try_init(),
    };

    installed.map_err(|e| anyhow!("Failed to initialize logging: {}", e))
}
