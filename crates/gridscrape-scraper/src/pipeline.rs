//! Category listing extraction: navigate, paginate, snapshot, parse.

use std::time::Instant;

use gridscrape_core::{RawProduct, ScrapeConfig, SelectorKey, Selectors, StructuredProduct};
use scraper::{Html, Selector};
use url::Url;

use crate::card::CardParser;
use crate::click::ClickExecutor;
use crate::context::RunContext;
use crate::convert::CurrencyConverter;
use crate::error::ScraperError;
use crate::pagination::Paginator;
use crate::session::PageSession;

/// Products extracted from one listing, in page order.
#[derive(Debug, Clone, PartialEq)]
pub enum Products {
    Structured(Vec<StructuredProduct>),
    Raw(Vec<RawProduct>),
}

impl Products {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Products::Structured(items) => items.len(),
            Products::Raw(items) => items.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `"structured"` or `"raw"`; used in output file names.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Products::Structured(_) => "structured",
            Products::Raw(_) => "raw",
        }
    }
}

/// Resolves the listing URL for `category`: `category_path` joined onto
/// `base`, with the category key appended as the last path segment.
///
/// # Errors
///
/// Returns [`ScraperError::CategoryUrl`] if the joined path is not a valid
/// URL reference.
pub fn category_page_url(
    base: &Url,
    category_path: &str,
    category: &str,
) -> Result<Url, ScraperError> {
    let relative = format!(
        "{}/{}",
        category_path.trim().trim_end_matches('/'),
        category.trim_matches('/')
    );
    base.join(&relative)
        .map_err(|source| ScraperError::CategoryUrl {
            category: category.to_owned(),
            source,
        })
}

/// Parses every `product_card` node in `html`.
///
/// Rejected cards are logged and dropped. When `converter` is given, each
/// surviving card is converted into a [`StructuredProduct`].
///
/// # Errors
///
/// Returns [`ScraperError::MissingSelector`] or
/// [`ScraperError::InvalidSelector`] when `product_card` is unusable.
pub fn parse_listing_html(
    html: &str,
    selectors: &Selectors,
    base_url: &Url,
    converter: Option<&CurrencyConverter>,
    ctx: &RunContext,
) -> Result<Products, ScraperError> {
    let started = Instant::now();

    let card_css = selectors
        .lookup(SelectorKey::ProductCard)
        .ok_or(ScraperError::MissingSelector(SelectorKey::ProductCard))?;
    let card_selector = Selector::parse(card_css).map_err(|_| ScraperError::InvalidSelector {
        key: SelectorKey::ProductCard,
        selector: card_css.to_owned(),
    })?;

    let document = Html::parse_document(html);
    let parser = CardParser::new(selectors, base_url, ctx);

    let mut found = 0usize;
    let raw: Vec<RawProduct> = document
        .select(&card_selector)
        .inspect(|_| found += 1)
        .filter_map(|card| parser.parse(card))
        .collect();
    let parsed = raw.len();

    let products = match converter {
        Some(converter) => Products::Structured(
            raw.into_iter()
                .map(|product| converter.convert(product))
                .collect(),
        ),
        None => Products::Raw(raw),
    };

    tracing::info!(
        run_id = %ctx.run_id,
        category = %ctx.category,
        operation = "parse_listing",
        event = "products_parsed",
        found,
        parsed,
        rejected = found - parsed,
        elapsed_secs = started.elapsed().as_secs_f64(),
        kind = products.kind(),
        "parsed {parsed} of {found} product cards"
    );

    Ok(products)
}

/// Drives one category extraction over a live [`PageSession`].
pub struct ListingPipeline<'a, S: PageSession + ?Sized> {
    session: &'a mut S,
    config: &'a ScrapeConfig,
    selectors: Selectors,
    converter: Option<CurrencyConverter>,
    ctx: RunContext,
}

impl<'a, S: PageSession + ?Sized> ListingPipeline<'a, S> {
    /// Selectors are resolved for `ctx.category`. Structured output follows
    /// `global.structured_products_data`.
    pub fn new(session: &'a mut S, config: &'a ScrapeConfig, ctx: RunContext) -> Self {
        let selectors = config.products.selectors_for(&ctx.category);
        let missing = selectors.missing_keys();
        if !missing.is_empty() {
            let keys: Vec<&str> = missing.iter().map(|key| key.as_str()).collect();
            tracing::warn!(
                run_id = %ctx.run_id,
                category = %ctx.category,
                operation = "configure",
                missing = %keys.join(", "),
                "selectors not configured for this category"
            );
        }
        let converter = config
            .global
            .structured_products_data
            .then(|| CurrencyConverter::from_config(&config.products));
        Self {
            session,
            config,
            selectors,
            converter,
            ctx,
        }
    }

    /// Navigates to the category listing, loads every page of cards, and
    /// parses the final markup.
    ///
    /// Pagination problems end the click loop early but are not errors;
    /// whatever has loaded by then is parsed.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError`] if the category URL cannot be built, the
    /// session fails to navigate or return markup, or `product_card` is
    /// unusable.
    pub fn extract(&mut self) -> Result<Products, ScraperError> {
        let url = category_page_url(
            &self.config.base_url,
            &self.config.products.category_url,
            &self.ctx.category,
        )?;

        tracing::info!(
            run_id = %self.ctx.run_id,
            category = %self.ctx.category,
            operation = "navigate",
            url = %url,
            "opening category listing"
        );
        self.session
            .navigate(url.as_str())
            .map_err(|source| ScraperError::Session {
                operation: "navigate",
                source,
            })?;

        let settings = self.config.products.pagination();
        let executor = ClickExecutor::new(&mut *self.session, &self.selectors, settings, &self.ctx);
        Paginator::new(executor, &self.ctx, settings.max_idle_clicks).run_until_complete();

        let html = self
            .session
            .page_source()
            .map_err(|source| ScraperError::Session {
                operation: "page_source",
                source,
            })?;

        parse_listing_html(
            &html,
            &self.selectors,
            &self.config.base_url,
            self.converter.as_ref(),
            &self.ctx,
        )
    }
}
