//! Raw → structured product conversion.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use gridscrape_core::{ProductsConfig, RawProduct, StructuredProduct};

use crate::heuristics::infer_specs;

/// Converts listing prices into a target currency and attaches inferred
/// specs.
///
/// Rates are multipliers from the listing currency. A target with no entry
/// in the table converts at 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyConverter {
    rates: BTreeMap<String, f64>,
    target_currency: String,
}

impl Default for CurrencyConverter {
    fn default() -> Self {
        Self::new(BTreeMap::from([("USD".to_string(), 1.0)]), "USD")
    }
}

impl CurrencyConverter {
    /// Currency codes are compared case-insensitively.
    #[must_use]
    pub fn new(rates: BTreeMap<String, f64>, target_currency: &str) -> Self {
        Self {
            rates: rates
                .into_iter()
                .map(|(code, rate)| (code.to_ascii_uppercase(), rate))
                .collect(),
            target_currency: target_currency.trim().to_ascii_uppercase(),
        }
    }

    #[must_use]
    pub fn from_config(products: &ProductsConfig) -> Self {
        Self::new(products.currency_rates.clone(), &products.target_currency)
    }

    #[must_use]
    pub fn target_currency(&self) -> &str {
        &self.target_currency
    }

    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rates
            .get(&self.target_currency)
            .copied()
            .unwrap_or(1.0)
    }

    /// Converts `raw`, stamping the result with the current time.
    #[must_use]
    pub fn convert(&self, raw: RawProduct) -> StructuredProduct {
        self.convert_at(raw, Utc::now())
    }

    /// Converts `raw`, stamping the result with `now`. The raw record's
    /// scrape time is not carried over.
    #[must_use]
    pub fn convert_at(&self, raw: RawProduct, now: DateTime<Utc>) -> StructuredProduct {
        let price = round_cents(raw.price_usd * self.rate());
        let hints = infer_specs(&raw.description_raw, &raw.name);

        StructuredProduct {
            name: raw.name,
            price,
            currency: self.target_currency.clone(),
            rating: raw.rating,
            num_reviews: raw.num_reviews,
            description: raw.description_raw,
            url: raw.url,
            last_scraped: now,
            brand: hints.brand,
            screen_inches: hints.screen_inches,
            ram_gb: hints.ram_gb,
            storage_gb: hints.storage_gb,
            cpu: hints.cpu,
            os: hints.os,
        }
    }
}

/// Rounds to two decimals from the exact binary value, ties to even:
/// 0.125 → 0.12, and 2.675 (stored just below) → 2.67.
fn round_cents(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}
