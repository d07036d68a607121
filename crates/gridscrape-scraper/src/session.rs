//! The page-automation seam.
//!
//! Everything the scraper does to a live page goes through [`PageSession`]:
//! navigate, snapshot markup, count elements, wait for an element, read
//! visibility, click. [`crate::WebDriverSession`] implements it over a real
//! browser; tests implement it over an in-memory page.
//!
//! All methods are blocking and take `&mut self`: one control thread drives
//! one session, so reads and clicks are strictly ordered.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to start WebDriver session at {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("no element matches {selector:?}")]
    NotFound { selector: String },

    #[error("timed out after {waited:?} waiting for {selector:?}")]
    Timeout { selector: String, waited: Duration },

    #[error("WebDriver command {command} failed: {reason}")]
    Command {
        command: &'static str,
        reason: String,
    },

    #[error("failed to start session runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// A navigable, interactive page. Selectors are CSS.
pub trait PageSession {
    /// Loads `url` in the current window.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the browser rejects the navigation.
    fn navigate(&mut self, url: &str) -> Result<(), SessionError>;

    /// Returns the current serialized DOM.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the markup cannot be read.
    fn page_source(&mut self) -> Result<String, SessionError>;

    /// Number of elements currently matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the count cannot be obtained.
    fn count(&mut self, selector: &str) -> Result<usize, SessionError>;

    /// Blocks until an element matching `selector` is present, or `timeout`
    /// elapses.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Timeout`] when nothing appeared in time.
    fn wait_for_element(&mut self, selector: &str, timeout: Duration) -> Result<(), SessionError>;

    /// Whether the first element matching `selector` is displayed. A missing
    /// element is reported as `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] for driver failures other than a miss.
    fn is_visible(&mut self, selector: &str) -> Result<bool, SessionError>;

    /// Clicks the first element matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] when nothing matches, or another
    /// [`SessionError`] when the click itself fails.
    fn click(&mut self, selector: &str) -> Result<(), SessionError>;
}
