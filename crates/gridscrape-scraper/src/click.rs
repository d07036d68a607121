//! Click-then-wait primitive for the load-more control.
//!
//! [`ClickExecutor`] owns nothing: it borrows the live session, the
//! selector table, and the run context, and turns one click attempt into a
//! [`ClickStatus`] the paginator can branch on.

use std::borrow::Cow;

use gridscrape_core::{PaginationSettings, SelectorKey, Selectors};

use crate::context::RunContext;
use crate::session::PageSession;
use crate::wait::poll_until;

/// Outcome of one click-and-wait attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickStatus {
    /// Clicked and the item count grew before the content timeout.
    Success,
    /// The control was present but not displayed; nothing was clicked.
    ButtonHidden,
    /// Clicked, but the item count did not grow in time.
    NoNewItems,
    /// The control never appeared, had no selector, or the click errored.
    Failure,
}

impl ClickStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ClickStatus::Success => "clicked_and_loaded",
            ClickStatus::ButtonHidden => "button_hidden",
            ClickStatus::NoNewItems => "no_new_items",
            ClickStatus::Failure => "failure",
        }
    }
}

impl std::fmt::Display for ClickStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Turns a configured control selector into CSS.
///
/// A bare class name such as `load-more` becomes `.load-more`; anything
/// containing CSS syntax is returned unchanged.
#[must_use]
pub fn control_locator(selector: &str) -> Cow<'_, str> {
    let is_bare_class = selector
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if is_bare_class && !selector.is_empty() {
        Cow::Owned(format!(".{selector}"))
    } else {
        Cow::Borrowed(selector)
    }
}

pub struct ClickExecutor<'a, S: PageSession + ?Sized> {
    session: &'a mut S,
    selectors: &'a Selectors,
    settings: PaginationSettings,
    ctx: &'a RunContext,
}

impl<'a, S: PageSession + ?Sized> ClickExecutor<'a, S> {
    pub fn new(
        session: &'a mut S,
        selectors: &'a Selectors,
        settings: PaginationSettings,
        ctx: &'a RunContext,
    ) -> Self {
        Self {
            session,
            selectors,
            settings,
            ctx,
        }
    }

    /// Counts the elements matching the selector configured for `key`.
    ///
    /// Returns `None` when the selector is not configured or the session
    /// cannot produce a count.
    pub fn count(&mut self, key: SelectorKey) -> Option<usize> {
        let Some(selector) = self.selectors.lookup(key) else {
            tracing::error!(
                run_id = %self.ctx.run_id,
                category = %self.ctx.category,
                operation = "count",
                event = "missing_selector",
                key = %key,
                "missing selector"
            );
            return None;
        };

        match self.session.count(selector) {
            Ok(count) => Some(count),
            Err(e) => {
                tracing::warn!(
                    run_id = %self.ctx.run_id,
                    category = %self.ctx.category,
                    operation = "count",
                    event = "count_failed",
                    key = %key,
                    error = %e,
                    "failed to count elements"
                );
                None
            }
        }
    }

    /// Clicks the control configured for `button`, then waits up to the
    /// content timeout for the `items` count to exceed `baseline`.
    pub fn try_click_and_wait(
        &mut self,
        button: SelectorKey,
        items: SelectorKey,
        baseline: usize,
    ) -> ClickStatus {
        let selectors = self.selectors;
        let ctx = self.ctx;

        let (Some(control), Some(item_selector)) = (selectors.lookup(button), selectors.lookup(items))
        else {
            tracing::error!(
                run_id = %ctx.run_id,
                category = %ctx.category,
                operation = "click",
                event = "missing_selector",
                button = %button,
                items = %items,
                "no selector for control or items"
            );
            return ClickStatus::Failure;
        };
        let control = control_locator(control);

        if let Err(e) = self
            .session
            .wait_for_element(&control, self.settings.button_wait)
        {
            tracing::warn!(
                run_id = %ctx.run_id,
                category = %ctx.category,
                operation = "click",
                event = "button_timeout",
                button = %button,
                error = %e,
                "control not found in time"
            );
            return ClickStatus::Failure;
        }

        match self.session.is_visible(&control) {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!(
                    run_id = %ctx.run_id,
                    category = %ctx.category,
                    operation = "click",
                    event = "button_hidden",
                    button = %button,
                    "control is not visible"
                );
                return ClickStatus::ButtonHidden;
            }
            Err(e) => {
                self.log_click_failure(button, &e);
                return ClickStatus::Failure;
            }
        }

        if let Err(e) = self.session.click(&control) {
            self.log_click_failure(button, &e);
            return ClickStatus::Failure;
        }

        let session = &mut *self.session;
        let grew = poll_until(
            self.settings.content_wait,
            self.settings.poll_interval,
            || {
                session
                    .count(item_selector)
                    .is_ok_and(|count| count > baseline)
            },
        );

        match grew {
            Some(elapsed) => {
                tracing::debug!(
                    run_id = %ctx.run_id,
                    category = %ctx.category,
                    operation = "click",
                    event = "click_success",
                    button = %button,
                    status = ClickStatus::Success.as_str(),
                    duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                    "click succeeded and new items loaded"
                );
                ClickStatus::Success
            }
            None => {
                tracing::info!(
                    run_id = %ctx.run_id,
                    category = %ctx.category,
                    operation = "click",
                    event = "no_state_change",
                    button = %button,
                    status = ClickStatus::NoNewItems.as_str(),
                    baseline,
                    "click timed out waiting for new items"
                );
                ClickStatus::NoNewItems
            }
        }
    }

    /// Whether the control configured for `key` is present and displayed.
    /// Any lookup or driver failure reads as "not visible".
    pub fn is_control_visible(&mut self, key: SelectorKey) -> bool {
        let Some(selector) = self.selectors.lookup(key) else {
            return false;
        };
        self.session
            .is_visible(&control_locator(selector))
            .unwrap_or(false)
    }

    fn log_click_failure(&self, button: SelectorKey, error: &dyn std::error::Error) {
        tracing::error!(
            run_id = %self.ctx.run_id,
            category = %self.ctx.category,
            operation = "click",
            event = "click_failed",
            button = %button,
            status = ClickStatus::Failure.as_str(),
            error = %error,
            "click failed"
        );
    }
}
