//! Merges CLI flags over the configuration file.

use std::path::PathBuf;

use gridscrape_core::{OutputFormat, ScrapeConfig};

use crate::Cli;

/// Effective settings for one run. CLI flags win over `global`/`browser`
/// config values, which win over built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RunSettings {
    pub category: String,
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    pub headless: bool,
}

impl RunSettings {
    pub(crate) fn resolve(cli: &Cli, config: &ScrapeConfig) -> Self {
        Self {
            category: cli
                .category
                .clone()
                .unwrap_or_else(|| config.global.category.clone()),
            output_dir: cli
                .output
                .clone()
                .unwrap_or_else(|| config.global.output_dir.clone()),
            format: cli.format.map_or(config.global.output_format, Into::into),
            headless: !(cli.headed || config.browser.headed),
        }
    }

    /// `<output_dir>/<category>_<kind>.<ext>`, where `kind` is `structured`
    /// or `raw`.
    pub(crate) fn output_path(&self, kind: &str) -> PathBuf {
        self.output_dir.join(format!(
            "{}_{kind}.{}",
            self.category,
            self.format.extension()
        ))
    }
}
