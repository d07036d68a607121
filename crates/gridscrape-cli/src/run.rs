//! One scrape run: open the browser, extract, save, always close.

use std::process::ExitCode;

use anyhow::Context;
use gridscrape_core::ScrapeConfig;
use gridscrape_scraper::{
    ListingPipeline, PageSession, RunContext, SessionError, SessionOptions, WebDriverSession,
};

use crate::output::save_products;
use crate::settings::RunSettings;

/// Runs extraction for `settings.category` and saves the result.
///
/// Session start-up failure exits early. Any failure after that is logged,
/// and the session is closed before returning either way.
pub(crate) fn run(settings: &RunSettings, config: &ScrapeConfig) -> ExitCode {
    let ctx = RunContext::new(settings.category.as_str());
    let options = SessionOptions::from_config(&config.browser, settings.headless);
    let session = match WebDriverSession::connect(&options, &ctx) {
        Ok(session) => session,
        Err(e) => {
            tracing::error!(
                run_id = %ctx.run_id,
                category = %ctx.category,
                operation = "connect",
                webdriver_url = %options.webdriver_url,
                error = %e,
                "failed to start browser session"
            );
            return ExitCode::FAILURE;
        }
    };

    let run_id = ctx.run_id;
    let report = run_session(session, WebDriverSession::close, config, settings, ctx);
    tracing::debug!(
        %run_id,
        category = %settings.category,
        operation = "finish",
        extracted = report.extracted,
        session_closed = report.session_closed,
        "run finished"
    );
    report.exit_code()
}

/// What happened to a run once its session was open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RunReport {
    pub extracted: bool,
    pub session_closed: bool,
}

impl RunReport {
    /// Failure when extraction or saving failed. A session that would not
    /// close cleanly is logged but does not fail the run.
    pub(crate) fn exit_code(self) -> ExitCode {
        if self.extracted {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

/// Extracts and saves over an open `session`, then hands it to `close`
/// whatever the outcome.
pub(crate) fn run_session<S, C>(
    mut session: S,
    close: C,
    config: &ScrapeConfig,
    settings: &RunSettings,
    ctx: RunContext,
) -> RunReport
where
    S: PageSession,
    C: FnOnce(S) -> Result<(), SessionError>,
{
    let run_id = ctx.run_id;
    let outcome = extract_and_save(&mut session, config, settings, ctx);

    let session_closed = match close(session) {
        Ok(()) => {
            tracing::info!(
                %run_id,
                category = %settings.category,
                operation = "close",
                "Browser session closed."
            );
            true
        }
        Err(e) => {
            tracing::warn!(
                %run_id,
                category = %settings.category,
                operation = "close",
                error = %e,
                "failed to close browser session"
            );
            false
        }
    };

    let extracted = match outcome {
        Ok(_) => true,
        Err(e) => {
            tracing::error!(
                %run_id,
                category = %settings.category,
                operation = "extract",
                "scrape failed: {e:#}"
            );
            false
        }
    };

    RunReport {
        extracted,
        session_closed,
    }
}

/// Extracts the listing and writes it to
/// [`RunSettings::output_path`]. Returns the number of products saved.
pub(crate) fn extract_and_save<S: PageSession + ?Sized>(
    session: &mut S,
    config: &ScrapeConfig,
    settings: &RunSettings,
    ctx: RunContext,
) -> anyhow::Result<usize> {
    let run_id = ctx.run_id;
    let products = ListingPipeline::new(session, config, ctx)
        .extract()
        .with_context(|| format!("failed to extract category '{}'", settings.category))?;

    let path = settings.output_path(products.kind());
    if save_products(&products, &path, settings.format)? {
        tracing::info!(
            %run_id,
            category = %settings.category,
            operation = "save",
            path = %path.display(),
            "Saved {} products to {}",
            products.len(),
            path.display()
        );
        Ok(products.len())
    } else {
        tracing::warn!(
            %run_id,
            category = %settings.category,
            operation = "save",
            "no products to save"
        );
        Ok(0)
    }
}
