//! Loader for scraper configuration with YAML + environment overlays.
//!
//! Sources are merged in the order they are added, with `DRAWPAGE__`-prefixed
//! environment variables applied last (`DRAWPAGE__ENGINE__HEADLESS=false`
//! sets `engine.headless`). String values may reference `${VAR}`; references
//! are expanded recursively up to a fixed depth. Finally the browser path
//! override from `CHROME_EXECUTABLE_PATH` is applied.
use config::{Config, ConfigError, Environment, File, FileFormat};
use drawpage_common::ScraperConfig;
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

/// Default location of the YAML config: `<config_dir>/drawpage/drawpage.yaml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("drawpage").join("drawpage.yaml"))
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => break,
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder over the `config` crate wiring.
pub struct DrawpageConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for DrawpageConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawpageConfigLoader {
    /// Start with no files; only defaults and the environment apply.
    ///
    /// ```
    /// use drawpage_config::DrawpageConfigLoader;
    ///
    /// let config = DrawpageConfigLoader::new()
    ///     .with_yaml_str("selector: '.result'")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.selector, ".result");
    /// assert_eq!(config.navigation.max_inflight, 2);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a required YAML/TOML/JSON file; the format is inferred from the suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is silently skipped when missing.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    ///
    /// ```
    /// use drawpage_config::DrawpageConfigLoader;
    ///
    /// let cfg = DrawpageConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// engine:
    ///   webdriver_url: "http://localhost:4444"
    ///   headless: false
    /// navigation:
    ///   timeout_ms: 1500
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.engine.webdriver_url.as_deref(), Some("http://localhost:4444"));
    /// assert!(!cfg.engine.headless);
    /// assert_eq!(cfg.navigation.timeout_ms, 1500);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, FileFormat::Yaml));
        self
    }

    /// Merge all sources and apply the process environment.
    pub fn load(self) -> Result<ScraperConfig, ConfigError> {
        self.load_with(|key| std::env::var(key).ok())
    }

    /// Like [`load`](Self::load) but reads the browser path override through `lookup`.
    pub fn load_with<F>(self, lookup: F) -> Result<ScraperConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix("DRAWPAGE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let mut typed: ScraperConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;
        typed.engine = typed.engine.with_env_overrides(lookup);

        if typed.selector.trim().is_empty() {
            return Err(ConfigError::Message("selector must not be empty".into()));
        }
        Ok(typed)
    }
}
