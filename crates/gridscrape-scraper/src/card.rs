//! Per-card field extraction.
//!
//! [`CardParser::parse`] is total: a card missing its name, price, or link,
//! or carrying a value that does not parse, is logged with whatever fields
//! were read and dropped. One bad card never aborts the batch.

use chrono::Utc;
use gridscrape_core::{
    clean_review_count, RatingSource, RawProduct, RawProductInput, SelectorKey, Selectors,
};
use scraper::{ElementRef, Selector};
use url::Url;

use crate::context::RunContext;

/// Why a card was dropped, plus the partial fields available at the time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRejection {
    pub reason: &'static str,
    pub name: Option<String>,
    pub price: Option<String>,
    pub href: Option<String>,
    pub error: Option<String>,
}

/// Card selectors compiled once per batch. `None` means the key is not
/// configured or is not valid CSS.
#[derive(Debug)]
struct CardSelectors {
    name: Option<Selector>,
    price: Option<Selector>,
    rating: Option<Selector>,
    reviews: Option<Selector>,
    description: Option<Selector>,
    product_link: Option<Selector>,
}

pub struct CardParser<'a> {
    selectors: CardSelectors,
    base_url: &'a Url,
    ctx: &'a RunContext,
}

impl<'a> CardParser<'a> {
    pub fn new(selectors: &Selectors, base_url: &'a Url, ctx: &'a RunContext) -> Self {
        let compile = |key: SelectorKey| -> Option<Selector> {
            let css = selectors.lookup(key)?;
            match Selector::parse(css) {
                Ok(selector) => Some(selector),
                Err(e) => {
                    tracing::warn!(
                        run_id = %ctx.run_id,
                        category = %ctx.category,
                        operation = "parse_card",
                        key = %key,
                        selector = css,
                        error = %e,
                        "ignoring invalid CSS selector"
                    );
                    None
                }
            }
        };

        Self {
            selectors: CardSelectors {
                name: compile(SelectorKey::Name),
                price: compile(SelectorKey::Price),
                rating: compile(SelectorKey::Rating),
                reviews: compile(SelectorKey::Reviews),
                description: compile(SelectorKey::Description),
                product_link: compile(SelectorKey::ProductLink),
            },
            base_url,
            ctx,
        }
    }

    /// Parses one card. Rejections are logged and returned as `None`.
    #[must_use]
    pub fn parse(&self, card: ElementRef<'_>) -> Option<RawProduct> {
        match self.try_parse(card) {
            Ok(product) => Some(product),
            Err(rejection) => {
                tracing::warn!(
                    run_id = %self.ctx.run_id,
                    category = %self.ctx.category,
                    operation = "parse_card",
                    event = "card_rejected",
                    reason = rejection.reason,
                    name = rejection.name.as_deref(),
                    price = rejection.price.as_deref(),
                    href = rejection.href.as_deref(),
                    error = rejection.error.as_deref(),
                    "failed to parse product card: {}",
                    rejection.reason
                );
                None
            }
        }
    }

    /// Parses one card, returning the rejection instead of logging it.
    ///
    /// # Errors
    ///
    /// Returns a [`CardRejection`] when a required field is missing or a
    /// field value does not parse.
    pub fn try_parse(&self, card: ElementRef<'_>) -> Result<RawProduct, CardRejection> {
        let name = self.text(card, SelectorKey::Name, self.selectors.name.as_ref());
        let price = self.text(card, SelectorKey::Price, self.selectors.price.as_ref());
        let href = self.attr(
            card,
            SelectorKey::ProductLink,
            self.selectors.product_link.as_ref(),
            "href",
        );
        let rating = self
            .selectors
            .rating
            .as_ref()
            .map_or(0, |selector| card.select(selector).count());
        let reviews = self
            .text(card, SelectorKey::Reviews, self.selectors.reviews.as_ref())
            .unwrap_or_default();
        let description = self
            .text(
                card,
                SelectorKey::Description,
                self.selectors.description.as_ref(),
            )
            .unwrap_or_default();

        let reject = |reason: &'static str, error: Option<String>| CardRejection {
            reason,
            name: name.clone(),
            price: price.clone(),
            href: href.clone(),
            error,
        };

        let (Some(name_text), Some(price_text), Some(href_text)) = (
            name.as_deref().filter(|s| !s.is_empty()),
            price.as_deref().filter(|s| !s.is_empty()),
            href.as_deref().filter(|s| !s.trim().is_empty()),
        ) else {
            let reason = if name.as_deref().is_none_or(str::is_empty) {
                "missing product name"
            } else if price.as_deref().is_none_or(str::is_empty) {
                "missing product price"
            } else {
                "missing product URL"
            };
            return Err(reject(reason, None));
        };

        let reviews = clean_review_count(&reviews);
        let input = RawProductInput {
            name: name_text,
            price: price_text,
            rating: RatingSource::Indicators(rating),
            reviews: &reviews,
            description: &description,
            href: href_text,
        };

        RawProduct::new(input, self.base_url, Utc::now())
            .map_err(|e| reject("invalid field value", Some(e.to_string())))
    }

    /// Stripped text of the first match, or `None` when the selector is
    /// unusable or nothing matches.
    fn text(
        &self,
        card: ElementRef<'_>,
        key: SelectorKey,
        selector: Option<&Selector>,
    ) -> Option<String> {
        let Some(element) = selector.and_then(|s| card.select(s).next()) else {
            self.log_missing(key, None);
            return None;
        };
        Some(element.text().map(str::trim).collect())
    }

    fn attr(
        &self,
        card: ElementRef<'_>,
        key: SelectorKey,
        selector: Option<&Selector>,
        attr: &'static str,
    ) -> Option<String> {
        let Some(element) = selector.and_then(|s| card.select(s).next()) else {
            self.log_missing(key, Some(attr));
            return None;
        };
        element.value().attr(attr).map(str::to_owned)
    }

    fn log_missing(&self, key: SelectorKey, attr: Option<&'static str>) {
        tracing::debug!(
            run_id = %self.ctx.run_id,
            category = %self.ctx.category,
            operation = "parse_card",
            key = %key,
            attr,
            "selector '{key}' not found in card"
        );
    }
}
