//! Build request: the validated input of one pipeline run

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Default time the generator may run before the build fails
pub const DEFAULT_GENERATOR_TIMEOUT: Duration = Duration::from_secs(300);

/// Target environment of a build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!(
                "unknown environment '{}' (expected development, staging or production)",
                other
            )),
        }
    }
}

/// Everything one build needs, already validated by the caller
#[derive(Debug, Clone)]
pub struct BuildRequest {
    /// Template directory name under the workspace's `templates/`
    pub template: String,

    /// Theme applied to the site
    pub theme: String,

    /// Explicitly requested components; empty means "no preference"
    pub components: BTreeSet<String>,

    /// Output directory of the materialized site
    pub output: PathBuf,

    pub environment: Environment,
    pub minify: bool,
    pub draft: bool,
    pub future: bool,

    /// Replaces the configuration's `baseURL`
    pub base_url: Option<String>,

    /// Alternative base site configuration, replacing the template's own
    pub config: Option<PathBuf>,

    pub verbose: bool,

    /// Upper bound on the generator run
    pub generator_timeout: Duration,
}

impl BuildRequest {
    pub fn new(template: impl Into<String>, theme: impl Into<String>, output: impl Into<PathBuf>) -> Self {
        Self {
            template: template.into(),
            theme: theme.into(),
            components: BTreeSet::new(),
            output: output.into(),
            environment: Environment::default(),
            minify: false,
            draft: false,
            future: false,
            base_url: None,
            config: None,
            verbose: false,
            generator_timeout: DEFAULT_GENERATOR_TIMEOUT,
        }
    }

    /// Request components by name (duplicates collapse)
    pub fn with_components<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.components = names
            .into_iter()
            .map(Into::into)
            .map(|name: String| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.generator_timeout = timeout;
        self
    }
}
