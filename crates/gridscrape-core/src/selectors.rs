//! CSS selector lookup keyed by logical field names.
//!
//! The listing scraper never hardcodes markup: every element it reads or
//! clicks is resolved through a [`Selectors`] table loaded from config. A
//! category may override any subset of the base table (see
//! [`crate::ProductsConfig::selectors_for`]).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Logical names the scraper resolves to CSS selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectorKey {
    Name,
    Price,
    Rating,
    Reviews,
    Description,
    ProductLink,
    ProductCard,
    LoadMore,
}

impl SelectorKey {
    pub const ALL: [SelectorKey; 8] = [
        SelectorKey::Name,
        SelectorKey::Price,
        SelectorKey::Rating,
        SelectorKey::Reviews,
        SelectorKey::Description,
        SelectorKey::ProductLink,
        SelectorKey::ProductCard,
        SelectorKey::LoadMore,
    ];

    /// The key as it appears in the YAML `selectors` mapping.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SelectorKey::Name => "name",
            SelectorKey::Price => "price",
            SelectorKey::Rating => "rating",
            SelectorKey::Reviews => "reviews",
            SelectorKey::Description => "description",
            SelectorKey::ProductLink => "product_link",
            SelectorKey::ProductCard => "product_card",
            SelectorKey::LoadMore => "load_more",
        }
    }
}

impl std::fmt::Display for SelectorKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable selector table. Unknown keys are kept so overrides can be
/// merged without loss, but only [`SelectorKey`] names are ever looked up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selectors(BTreeMap<String, String>);

impl Selectors {
    /// Returns the selector configured for `key`, or `None` when the key is
    /// absent or configured as a blank string.
    #[must_use]
    pub fn lookup(&self, key: SelectorKey) -> Option<&str> {
        self.0
            .get(key.as_str())
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    /// Returns a new table with every entry of `overrides` replacing the
    /// matching entry of `self`.
    #[must_use]
    pub fn overlay(&self, overrides: &Selectors) -> Selectors {
        let mut merged = self.0.clone();
        for (key, value) in &overrides.0 {
            merged.insert(key.clone(), value.clone());
        }
        Selectors(merged)
    }

    /// Keys from [`SelectorKey::ALL`] that have no usable selector.
    #[must_use]
    pub fn missing_keys(&self) -> Vec<SelectorKey> {
        SelectorKey::ALL
            .into_iter()
            .filter(|key| self.lookup(*key).is_none())
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Selectors
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Selectors(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
