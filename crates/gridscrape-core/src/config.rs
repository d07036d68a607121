//! YAML configuration for a listing scrape.
//!
//! The file is read once at startup into an immutable [`ScrapeConfig`].
//! Components never see the whole document: the pipeline hands each one
//! the slice it needs ([`crate::Selectors`], [`PaginationSettings`], the
//! currency table) by reference.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::selectors::Selectors;
use crate::ConfigError;

#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeConfig {
    /// Site root every relative URL (category path, product links) is
    /// resolved against.
    pub base_url: Url,
    #[serde(default)]
    pub global: GlobalConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    pub products: ProductsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Level name such as `INFO`, `DEBUG` or `WARNING`; case-insensitive.
    pub logging_level: String,
    pub category: String,
    pub output_dir: PathBuf,
    pub output_format: OutputFormat,
    /// Emit [`crate::StructuredProduct`] records instead of raw ones.
    pub structured_products_data: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            logging_level: "INFO".to_string(),
            category: "laptops".to_string(),
            output_dir: PathBuf::from("output"),
            output_format: OutputFormat::Json,
            structured_products_data: true,
        }
    }
}

impl GlobalConfig {
    /// Maps `logging_level` onto a `tracing` filter directive.
    ///
    /// Unrecognized names fall back to `"info"`.
    #[must_use]
    pub fn log_directive(&self) -> &'static str {
        match self.logging_level.trim().to_ascii_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "warn" | "warning" => "warn",
            "error" | "critical" | "fatal" => "error",
            _ => "info",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Csv,
}

impl OutputFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    Chrome,
    Firefox,
}

impl std::fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BrowserKind::Chrome => write!(f, "chrome"),
            BrowserKind::Firefox => write!(f, "firefox"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub name: BrowserKind,
    pub webdriver_url: String,
    /// `[width, height]` in pixels.
    pub window_size: [u32; 2],
    /// Implicit per-command wait, in seconds.
    pub implicitly_wait: u64,
    pub headed: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            name: BrowserKind::Chrome,
            webdriver_url: "http://localhost:4444".to_string(),
            window_size: [1280, 720],
            implicitly_wait: 5,
            headed: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductsConfig {
    /// Listing path relative to `base_url`; the category key is appended as
    /// the final segment.
    pub category_url: String,
    #[serde(default = "default_wait_secs")]
    pub load_more_button_wait_time: u64,
    #[serde(default = "default_wait_secs")]
    pub load_cards_wait_time: u64,
    #[serde(default = "default_max_idle_clicks")]
    pub max_idle_clicks: u32,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_currency_rates")]
    pub currency_rates: BTreeMap<String, f64>,
    #[serde(default = "default_target_currency")]
    pub target_currency: String,
    #[serde(default)]
    pub selectors: Selectors,
    #[serde(default)]
    pub categories: BTreeMap<String, CategoryOverrides>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryOverrides {
    #[serde(default)]
    pub selectors: Selectors,
}

fn default_wait_secs() -> u64 {
    10
}

fn default_max_idle_clicks() -> u32 {
    3
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_currency_rates() -> BTreeMap<String, f64> {
    BTreeMap::from([("USD".to_string(), 1.0)])
}

fn default_target_currency() -> String {
    "USD".to_string()
}

/// Timing and budget knobs for the load-more loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationSettings {
    /// How long to wait for the load-more control to appear.
    pub button_wait: Duration,
    /// How long to wait for the card count to grow after a click.
    pub content_wait: Duration,
    pub max_idle_clicks: u32,
    pub poll_interval: Duration,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            button_wait: Duration::from_secs(default_wait_secs()),
            content_wait: Duration::from_secs(default_wait_secs()),
            max_idle_clicks: default_max_idle_clicks(),
            poll_interval: Duration::from_millis(default_poll_interval_ms()),
        }
    }
}

impl ProductsConfig {
    /// Base selectors overlaid with the overrides for `category`, if any.
    #[must_use]
    pub fn selectors_for(&self, category: &str) -> Selectors {
        match self.categories.get(category) {
            Some(overrides) => self.selectors.overlay(&overrides.selectors),
            None => self.selectors.clone(),
        }
    }

    #[must_use]
    pub fn pagination(&self) -> PaginationSettings {
        PaginationSettings {
            button_wait: Duration::from_secs(self.load_more_button_wait_time),
            content_wait: Duration::from_secs(self.load_cards_wait_time),
            max_idle_clicks: self.max_idle_clicks,
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }
}

/// Load and validate the scrape configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_config(path: &Path) -> Result<ScrapeConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_config(&content)
}

/// Parse and validate a scrape configuration from a YAML string.
///
/// Currency codes (the target and every rate-table key) are normalized to
/// upper case.
///
/// # Errors
///
/// Returns `ConfigError::Parse` for malformed YAML or a non-URL `base_url`,
/// and `ConfigError::Validation` for out-of-range values.
pub fn parse_config(content: &str) -> Result<ScrapeConfig, ConfigError> {
    let mut config: ScrapeConfig = serde_yaml::from_str(content)?;
    normalize_currencies(&mut config.products);
    validate_config(&config)?;
    Ok(config)
}

fn normalize_currencies(products: &mut ProductsConfig) {
    products.target_currency = products.target_currency.trim().to_ascii_uppercase();
    products.currency_rates = std::mem::take(&mut products.currency_rates)
        .into_iter()
        .map(|(code, rate)| (code.trim().to_ascii_uppercase(), rate))
        .collect();
}

fn validate_config(config: &ScrapeConfig) -> Result<(), ConfigError> {
    if config.base_url.cannot_be_a_base() {
        return Err(ConfigError::Validation(format!(
            "base_url '{}' must be an absolute http(s) URL",
            config.base_url
        )));
    }

    let products = &config.products;

    if products.category_url.trim().is_empty() {
        return Err(ConfigError::Validation(
            "products.category_url must be non-empty".to_string(),
        ));
    }

    let code = &products.target_currency;
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ConfigError::Validation(format!(
            "target_currency '{code}' must be a 3-letter currency code"
        )));
    }

    if let Some((code, rate)) = products
        .currency_rates
        .iter()
        .find(|(_, rate)| !rate.is_finite() || **rate <= 0.0)
    {
        return Err(ConfigError::Validation(format!(
            "currency rate for '{code}' must be a positive number, got {rate}"
        )));
    }

    if products.load_more_button_wait_time == 0 || products.load_cards_wait_time == 0 {
        return Err(ConfigError::Validation(
            "load_more_button_wait_time and load_cards_wait_time must be > 0".to_string(),
        ));
    }

    if products.max_idle_clicks == 0 {
        return Err(ConfigError::Validation(
            "max_idle_clicks must be > 0".to_string(),
        ));
    }

    if products.poll_interval_ms == 0 {
        return Err(ConfigError::Validation(
            "poll_interval_ms must be > 0".to_string(),
        ));
    }

    let [width, height] = config.browser.window_size;
    if width == 0 || height == 0 {
        return Err(ConfigError::Validation(format!(
            "browser.window_size must be positive, got [{width}, {height}]"
        )));
    }

    Ok(())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
