mod output;
mod run;
mod settings;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use gridscrape_core::OutputFormat;
use tracing_subscriber::EnvFilter;

use crate::settings::RunSettings;

#[derive(Debug, Parser)]
#[command(name = "gridscrape-cli")]
#[command(about = "Scrape a load-more product listing into JSON or CSV")]
struct Cli {
    /// YAML configuration file.
    #[arg(long, env = "GRIDSCRAPE_CONFIG", default_value = "config.yaml")]
    config: PathBuf,

    /// Category key appended to the listing path (overrides `global.category`).
    #[arg(long)]
    category: Option<String>,

    /// Output directory (overrides `global.output_dir`).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Output format (overrides `global.output_format`).
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Show the browser window instead of running headless.
    #[arg(long)]
    headed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Json,
    Csv,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Csv => OutputFormat::Csv,
        }
    }
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match gridscrape_core::load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            init_tracing("info");
            tracing::error!(
                config = %cli.config.display(),
                error = %e,
                "failed to load configuration"
            );
            return ExitCode::FAILURE;
        }
    };
    init_tracing(config.global.log_directive());

    let settings = RunSettings::resolve(&cli, &config);
    tracing::debug!(?settings, "resolved run settings");

    run::run(&settings, &config)
}

/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(fallback: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

#[cfg(test)]
mod tests;
