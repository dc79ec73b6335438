//! Settings loading and API key resolution.
//!
//! Settings are layered with the `config` crate:
//!
//! ```text
//! defaults < config file < CINEGRID_* environment < CLI overrides
//! ```
//!
//! The movie-database API key is resolved separately so its origin can be
//! reported. The first non-blank value wins:
//!
//! 1. a value injected by the launcher (`--api-key`)
//! 2. `CINEGRID_API_KEY`, then `TMDB_API_KEY`
//! 3. `api_key` in the local override file (`config.local.toml`)
//!
//! A missing key is not an error. A malformed override file is.

use std::fmt;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, Map, Source};
use serde::Deserialize;
use tracing::{debug, info};

use crate::app::Tab;
use crate::error::Result;

/// Delay between expanding a search box and focusing its input.
pub const DEFAULT_FOCUS_DELAY_MS: u64 = 100;

/// Default location of the local override file.
pub const LOCAL_OVERRIDE_FILE: &str = "config.local.toml";

/// Environment prefix for settings.
const ENV_PREFIX: &str = "CINEGRID";

/// Environment prefixes searched for the API key, in priority order.
const KEY_ENV_PREFIXES: [&str; 2] = [ENV_PREFIX, "TMDB"];

const API_KEY: &str = "api_key";

#[derive(Debug, Deserialize)]
struct RawSettings {
    roster: PathBuf,
    tab: String,
    focus_delay_ms: u64,
}

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Path to the roster JSON file.
    pub roster: PathBuf,
    /// Tab shown at start-up.
    pub tab: Tab,
    /// Delay before an expanded search box takes focus.
    pub focus_delay_ms: u64,
}

/// Values given on the command line, applied over every other layer.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub roster: Option<PathBuf>,
    pub tab: Option<String>,
    pub focus_delay_ms: Option<u64>,
}

impl Settings {
    /// Load settings from defaults, an optional config file, the process
    /// environment and CLI overrides.
    pub fn load(config_file: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        Self::load_with_env(config_file, overrides, None)
    }

    fn load_with_env(
        config_file: Option<&Path>,
        overrides: &Overrides,
        env: Option<Map<String, String>>,
    ) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("roster", "roster.json")?
            .set_default("tab", Tab::Directors.id())?
            .set_default("focus_delay_ms", DEFAULT_FOCUS_DELAY_MS as i64)?;

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).required(false));
        }

        let raw: RawSettings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(env),
            )
            .set_override_option(
                "roster",
                overrides.roster.as_ref().map(|p| p.display().to_string()),
            )?
            .set_override_option("tab", overrides.tab.clone())?
            .set_override_option(
                "focus_delay_ms",
                overrides.focus_delay_ms.map(|ms| ms as i64),
            )?
            .build()?
            .try_deserialize()?;

        let settings = Self {
            roster: raw.roster,
            tab: raw.tab.parse()?,
            focus_delay_ms: raw.focus_delay_ms,
        };
        debug!(?settings, "settings loaded");
        Ok(settings)
    }
}

/// Where an API key was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOrigin {
    Injected,
    Environment,
    LocalFile,
}

impl KeyOrigin {
    pub fn label(&self) -> &'static str {
        match self {
            KeyOrigin::Injected => "injected",
            KeyOrigin::Environment => "env",
            KeyOrigin::LocalFile => "local file",
        }
    }
}

/// A resolved API key. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey {
    value: String,
    origin: KeyOrigin,
}

impl ApiKey {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn origin(&self) -> KeyOrigin {
        self.origin
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKey")
            .field("value", &"<redacted>")
            .field("origin", &self.origin)
            .finish()
    }
}

/// Walks the API key sources in priority order.
#[derive(Debug, Clone)]
pub struct ApiKeyResolver {
    injected: Option<String>,
    local_file: PathBuf,
    env: Option<Map<String, String>>,
}

impl ApiKeyResolver {
    /// Create a resolver reading the given local override file.
    pub fn new(local_file: impl Into<PathBuf>) -> Self {
        Self {
            injected: None,
            local_file: local_file.into(),
            env: None,
        }
    }

    /// Set the launcher-injected value, the highest priority source.
    pub fn injected(mut self, value: Option<String>) -> Self {
        self.injected = value;
        self
    }

    /// Read environment variables from `env` instead of the process.
    pub fn with_env(mut self, env: Map<String, String>) -> Self {
        self.env = Some(env);
        self
    }

    /// Resolve the key, returning `None` when no source provides one.
    pub fn resolve(&self) -> Result<Option<ApiKey>> {
        if let Some(value) = self.injected.as_deref().and_then(non_blank) {
            return Ok(Some(self.found(value, KeyOrigin::Injected)));
        }

        for prefix in KEY_ENV_PREFIXES {
            let source = Environment::with_prefix(prefix).source(self.env.clone());
            if let Some(value) = lookup(source)? {
                return Ok(Some(self.found(&value, KeyOrigin::Environment)));
            }
        }

        let source = File::from(self.local_file.as_path()).required(false);
        if let Some(value) = lookup(source)? {
            return Ok(Some(self.found(&value, KeyOrigin::LocalFile)));
        }

        info!("no API key configured");
        Ok(None)
    }

    fn found(&self, value: &str, origin: KeyOrigin) -> ApiKey {
        info!(origin = origin.label(), "API key resolved");
        ApiKey {
            value: value.to_string(),
            origin,
        }
    }
}

/// Read `api_key` from a single source.
fn lookup<S>(source: S) -> std::result::Result<Option<String>, ConfigError>
where
    S: Source + Send + Sync + 'static,
{
    let config = Config::builder().add_source(source).build()?;
    match config.get_string(API_KEY) {
        Ok(value) => Ok(non_blank(&value).map(str::to_string)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn toml_file(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "{}", content).unwrap();
        file
    }

    fn env(pairs: &[(&str, &str)]) -> Map<String, String> {
        let mut map = Map::new();
        for (k, v) in pairs {
            map.insert(k.to_string(), v.to_string());
        }
        map
    }

    #[test]
    fn test_injected_key_wins() {
        let file = toml_file(r#"api_key = "from-file""#);
        let key = ApiKeyResolver::new(file.path())
            .injected(Some("from-flag".to_string()))
            .with_env(env(&[("TMDB_API_KEY", "from-env")]))
            .resolve()
            .unwrap()
            .unwrap();
        assert_eq!(key.value(), "from-flag");
        assert_eq!(key.origin(), KeyOrigin::Injected);
    }

    #[test]
    fn test_env_beats_local_file() {
        let file = toml_file(r#"api_key = "from-file""#);
        let key = ApiKeyResolver::new(file.path())
            .with_env(env(&[("TMDB_API_KEY", "from-env")]))
            .resolve()
            .unwrap()
            .unwrap();
        assert_eq!(key.value(), "from-env");
        assert_eq!(key.origin(), KeyOrigin::Environment);
    }

    #[test]
    fn test_prefixed_env_beats_tmdb_env() {
        let key = ApiKeyResolver::new("/nonexistent/config.local.toml")
            .with_env(env(&[
                ("TMDB_API_KEY", "tmdb"),
                ("CINEGRID_API_KEY", "cinegrid"),
            ]))
            .resolve()
            .unwrap()
            .unwrap();
        assert_eq!(key.value(), "cinegrid");
    }

    #[test]
    fn test_local_file_fallback() {
        let file = toml_file(r#"api_key = "from-file""#);
        let key = ApiKeyResolver::new(file.path())
            .with_env(Map::new())
            .resolve()
            .unwrap()
            .unwrap();
        assert_eq!(key.value(), "from-file");
        assert_eq!(key.origin(), KeyOrigin::LocalFile);
    }

    #[test]
    fn test_blank_values_are_skipped() {
        let file = toml_file(r#"api_key = "from-file""#);
        let key = ApiKeyResolver::new(file.path())
            .injected(Some("   ".to_string()))
            .with_env(env(&[("TMDB_API_KEY", "")]))
            .resolve()
            .unwrap()
            .unwrap();
        assert_eq!(key.origin(), KeyOrigin::LocalFile);
    }

    #[test]
    fn test_no_key_anywhere() {
        let key = ApiKeyResolver::new("/nonexistent/config.local.toml")
            .with_env(Map::new())
            .resolve()
            .unwrap();
        assert!(key.is_none());
    }

    #[test]
    fn test_malformed_local_file_is_an_error() {
        let file = toml_file("api_key = = broken");
        let result = ApiKeyResolver::new(file.path())
            .with_env(Map::new())
            .resolve();
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let key = ApiKey {
            value: "secret".to_string(),
            origin: KeyOrigin::Injected,
        };
        let debug = format!("{:?}", key);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("redacted"));
    }

    #[test]
    fn test_settings_defaults() {
        let settings =
            Settings::load_with_env(None, &Overrides::default(), Some(Map::new())).unwrap();
        assert_eq!(settings.roster, PathBuf::from("roster.json"));
        assert_eq!(settings.tab, Tab::Directors);
        assert_eq!(settings.focus_delay_ms, DEFAULT_FOCUS_DELAY_MS);
    }

    #[test]
    fn test_settings_layers() {
        let file = toml_file("roster = \"file.json\"\ntab = \"actors\"\nfocus_delay_ms = 250");
        let settings = Settings::load_with_env(
            Some(file.path()),
            &Overrides::default(),
            Some(env(&[("CINEGRID_FOCUS_DELAY_MS", "50")])),
        )
        .unwrap();
        assert_eq!(settings.roster, PathBuf::from("file.json"));
        assert_eq!(settings.tab, Tab::Actors);
        assert_eq!(settings.focus_delay_ms, 50);

        let overrides = Overrides {
            roster: Some(PathBuf::from("cli.json")),
            tab: Some("directors".to_string()),
            focus_delay_ms: None,
        };
        let settings =
            Settings::load_with_env(Some(file.path()), &overrides, Some(Map::new())).unwrap();
        assert_eq!(settings.roster, PathBuf::from("cli.json"));
        assert_eq!(settings.tab, Tab::Directors);
        assert_eq!(settings.focus_delay_ms, 250);
    }

    #[test]
    fn test_settings_unknown_tab() {
        let overrides = Overrides {
            tab: Some("writers".to_string()),
            ..Default::default()
        };
        let err = Settings::load_with_env(None, &overrides, Some(Map::new())).unwrap_err();
        assert!(err.to_string().contains("Unknown tab"));
    }
}
