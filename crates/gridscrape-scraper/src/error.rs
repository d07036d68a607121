use gridscrape_core::SelectorKey;
use thiserror::Error;

use crate::session::SessionError;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("cannot build category URL for \"{category}\": {source}")]
    CategoryUrl {
        category: String,
        #[source]
        source: url::ParseError,
    },

    #[error("no selector configured for '{0}'")]
    MissingSelector(SelectorKey),

    #[error("invalid CSS selector for '{key}': {selector:?}")]
    InvalidSelector { key: SelectorKey, selector: String },

    #[error("browser session failed during {operation}: {source}")]
    Session {
        operation: &'static str,
        #[source]
        source: SessionError,
    },
}
