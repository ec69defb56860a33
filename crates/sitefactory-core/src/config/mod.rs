//! Site configuration utilities

pub mod composer;

pub use composer::{compose, ConfigError, ConfigOverrides};

/// Site configuration file the generator reads from the site root
pub const SITE_CONFIG_FILE: &str = "hugo.toml";
