//! `config.toml` settings file.
//!
//! Every key is optional:
//! ```toml
//! timeout_secs = 5
//! concurrency = 4
//! index_fallback = false
//! cache_file = "/tmp/expmod-cache.json"
//!
//! [endpoints]
//! api = "https://api.github.com"
//! raw = "https://raw.githubusercontent.com"
//! index = "https://pkg.go.dev"
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use expmod_core::{DEFAULT_API_URL, DEFAULT_CONCURRENCY, DEFAULT_INDEX_URL, DEFAULT_RAW_URL};

pub const SETTINGS_FILE: &str = "config.toml";
pub const TOKEN_ENV_KEY: &str = "GITHUB_TOKEN";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default)]
    pub index_fallback: bool,
    #[serde(default)]
    pub cache_file: Option<PathBuf>,
    #[serde(default)]
    pub endpoints: Endpoints,
    /// Bearer credential; only ever read from the environment.
    #[serde(skip)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Endpoints {
    #[serde(default = "default_api")]
    pub api: String,
    #[serde(default = "default_raw")]
    pub raw: String,
    #[serde(default = "default_index")]
    pub index: String,
    /// Replaces `https://` in front of discovery requests.
    #[serde(default)]
    pub discovery: Option<String>,
}

fn default_timeout_secs() -> u64 {
    expmod_core::DEFAULT_TIMEOUT.as_secs()
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_api() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_raw() -> String {
    DEFAULT_RAW_URL.to_string()
}

fn default_index() -> String {
    DEFAULT_INDEX_URL.to_string()
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api: default_api(),
            raw: default_raw(),
            index: default_index(),
            discovery: None,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            concurrency: default_concurrency(),
            index_fallback: false,
            cache_file: None,
            endpoints: Endpoints::default(),
            token: None,
        }
    }
}

impl Settings {
    pub fn parse(text: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Load the explicit settings file, else the per-user one when present,
    /// else the built-in defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match user_settings_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Apply `EXPMOD_CACHE` and `GITHUB_TOKEN`. Empty values count as unset.
    pub fn apply_env(&mut self, cache: Option<OsString>, token: Option<String>) {
        if let Some(cache) = cache.filter(|value| !value.is_empty()) {
            self.cache_file = Some(PathBuf::from(cache));
        }
        if let Some(token) = token.filter(|value| !value.is_empty()) {
            self.token = Some(token);
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be greater than zero");
        }
        if self.concurrency == 0 {
            bail!("concurrency must be greater than zero");
        }
        Ok(())
    }
}

fn user_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("expmod").join(SETTINGS_FILE))
}
