//! Common types and utilities shared across drawpage crates.
//!
//! This crate defines the scraper configuration, observability helpers, and
//! the shared error type used throughout the workspace. It stays
//! dependency-minimal so every crate can depend on it.
//!
//! # Overview
//!
//! - [`ScraperConfig`]: top-level configuration for one scrape
//! - [`EngineConfig`]: how the headless browser is launched
//! - [`NavigationConfig`]: navigation timeout and network-idle tuning
//! - [`observability`]: centralised tracing/logging initialisation
//! - [`DrawpageError`] and [`Result`]: shared error handling
//!
//! # Examples
//!
//! ```rust
//! use drawpage_common::{ScraperConfig, DEFAULT_MARKER_SELECTOR};
//!
//! let cfg = ScraperConfig::default();
//! assert_eq!(cfg.selector, DEFAULT_MARKER_SELECTOR);
//! assert_eq!(cfg.engine.executable_path, "/usr/bin/google-chrome-stable");
//! assert_eq!((cfg.engine.window_width, cfg.engine.window_height), (1920, 1080));
//! ```
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub mod observability;

/// CSS selector of the elements whose inner markup is extracted.
pub const DEFAULT_MARKER_SELECTOR: &str = ".B";

/// Browser executable used when neither configuration nor environment name one.
pub const DEFAULT_CHROME_PATH: &str = "/usr/bin/google-chrome-stable";

/// Environment variable overriding [`EngineConfig::executable_path`].
pub const CHROME_PATH_ENV: &str = "CHROME_EXECUTABLE_PATH";

/// Configuration for a single scrape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Selector for the marker elements.
    pub selector: String,
    /// Browser launch settings.
    pub engine: EngineConfig,
    /// Navigation and network-idle settings.
    pub navigation: NavigationConfig,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            selector: DEFAULT_MARKER_SELECTOR.to_string(),
            engine: EngineConfig::default(),
            navigation: NavigationConfig::default(),
        }
    }
}

/// How the rendering engine is launched and reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Path to the Chrome/Chromium executable.
    pub executable_path: String,
    /// Run without a visible window.
    pub headless: bool,
    pub window_width: u32,
    pub window_height: u32,
    /// Existing WebDriver endpoint. When `None`, a chromedriver process is
    /// spawned for each session from [`EngineConfig::chromedriver_path`].
    pub webdriver_url: Option<String>,
    pub chromedriver_path: String,
    /// How long a spawned chromedriver may take to report ready.
    pub startup_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            executable_path: DEFAULT_CHROME_PATH.to_string(),
            headless: true,
            window_width: 1920,
            window_height: 1080,
            webdriver_url: None,
            chromedriver_path: "chromedriver".to_string(),
            startup_timeout_ms: 10_000,
        }
    }
}

impl EngineConfig {
    /// Replace the executable path with the value of [`CHROME_PATH_ENV`]
    /// as reported by `lookup`, if present and non-empty.
    ///
    /// ```rust
    /// use drawpage_common::{EngineConfig, CHROME_PATH_ENV};
    ///
    /// let cfg = EngineConfig::default().with_env_overrides(|key| {
    ///     (key == CHROME_PATH_ENV).then(|| "/opt/chrome/chrome".to_string())
    /// });
    /// assert_eq!(cfg.executable_path, "/opt/chrome/chrome");
    /// ```
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(CHROME_PATH_ENV).filter(|p| !p.trim().is_empty()) {
            self.executable_path = path;
        }
        self
    }

    pub fn startup_timeout(&self) -> Duration {
        Duration::from_millis(self.startup_timeout_ms)
    }
}

/// Bounds on the navigation wait and the network-idle heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Upper bound for navigation plus the network-idle wait.
    pub timeout_ms: u64,
    /// Quiet period the network must hold before the page counts as idle.
    pub idle_window_ms: u64,
    /// Maximum in-flight requests still considered idle.
    pub max_inflight: u32,
    pub poll_interval_ms: u64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            idle_window_ms: 500,
            max_inflight: 2,
            poll_interval_ms: 100,
        }
    }
}

impl NavigationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn idle_window(&self) -> Duration {
        Duration::from_millis(self.idle_window_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

/// Error types used across the drawpage system.
///
/// Every variant is terminal: nothing in the workspace retries.
#[derive(thiserror::Error, Debug)]
pub enum DrawpageError {
    /// The browser session could not be started.
    #[error("Launch error: {0}")]
    Launch(String),

    /// Navigating to the target address failed.
    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    /// The page never reported an idle network.
    #[error("Network idle wait failed: {0}")]
    NetworkIdle(String),

    /// Evaluating the marker selector failed.
    #[error("Selector query `{selector}` failed: {reason}")]
    Query { selector: String, reason: String },

    /// Tearing the browser session down failed.
    #[error("Release error: {0}")]
    Release(String),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Operation exceeded the configured timeout.
    #[error("Timeout occurred after {0:?}")]
    Timeout(Duration),

    /// The caller cancelled the operation.
    #[error("Operation cancelled")]
    Cancelled,
}

/// Convenient alias for results that use [`DrawpageError`].
pub type Result<T> = std::result::Result<T, DrawpageError>;
