//! Load-more pagination.
//!
//! The listing grows in place each time the load-more control is clicked.
//! [`Paginator::run_until_complete`] keeps clicking until one of:
//!
//! - the control disappears (the listing is complete),
//! - `max_idle_clicks` consecutive clicks load nothing while the control
//!   stays visible (assume complete),
//! - the item count cannot be read, or the control cannot be found or
//!   clicked (stop early; the caller parses whatever has loaded).
//!
//! A click that loads nothing before the content timeout is normal slow
//! loading and only counts against the idle budget. There is no cap on
//! total clicks other than that budget.

use gridscrape_core::SelectorKey;

use crate::click::{ClickExecutor, ClickStatus};
use crate::context::RunContext;
use crate::session::PageSession;

/// Why the pagination loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationEnd {
    IdleBudgetExhausted,
    ControlGone,
    CountUnavailable,
    ClickFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationSummary {
    /// Clicks that loaded new items.
    pub clicks: u32,
    /// Consecutive idle rounds at the moment the loop stopped.
    pub idle_attempts: u32,
    pub end: PaginationEnd,
}

pub struct Paginator<'a, S: PageSession + ?Sized> {
    executor: ClickExecutor<'a, S>,
    ctx: &'a RunContext,
    max_idle_clicks: u32,
    items: SelectorKey,
    control: SelectorKey,
}

impl<'a, S: PageSession + ?Sized> Paginator<'a, S> {
    /// Paginates `product_card` items with the `load_more` control.
    pub fn new(executor: ClickExecutor<'a, S>, ctx: &'a RunContext, max_idle_clicks: u32) -> Self {
        Self {
            executor,
            ctx,
            max_idle_clicks,
            items: SelectorKey::ProductCard,
            control: SelectorKey::LoadMore,
        }
    }

    /// Clicks load-more until the listing is exhausted or a stop condition
    /// hits. Never fails: early stops are logged and reported in the summary.
    pub fn run_until_complete(&mut self) -> PaginationSummary {
        let mut clicks: u32 = 0;
        let mut idle_attempts: u32 = 0;

        let end = loop {
            if idle_attempts >= self.max_idle_clicks {
                break PaginationEnd::IdleBudgetExhausted;
            }

            let Some(baseline) = self.executor.count(self.items) else {
                tracing::error!(
                    run_id = %self.ctx.run_id,
                    category = %self.ctx.category,
                    operation = "paginate",
                    "cannot determine number of items"
                );
                break PaginationEnd::CountUnavailable;
            };

            match self
                .executor
                .try_click_and_wait(self.control, self.items, baseline)
            {
                ClickStatus::Success => {
                    clicks += 1;
                    idle_attempts = 0;
                    tracing::debug!(
                        run_id = %self.ctx.run_id,
                        category = %self.ctx.category,
                        operation = "paginate",
                        clicks,
                        "click #{clicks} loaded more items"
                    );
                }
                ClickStatus::NoNewItems | ClickStatus::ButtonHidden => {
                    if !self.executor.is_control_visible(self.control) {
                        tracing::info!(
                            run_id = %self.ctx.run_id,
                            category = %self.ctx.category,
                            operation = "paginate",
                            "no new items and load-more control is gone; ending pagination"
                        );
                        break PaginationEnd::ControlGone;
                    }
                    idle_attempts += 1;
                    tracing::debug!(
                        run_id = %self.ctx.run_id,
                        category = %self.ctx.category,
                        operation = "paginate",
                        idle_attempts,
                        max_idle_clicks = self.max_idle_clicks,
                        "no new items but control still visible"
                    );
                }
                ClickStatus::Failure => {
                    tracing::error!(
                        run_id = %self.ctx.run_id,
                        category = %self.ctx.category,
                        operation = "paginate",
                        "click failed; ending pagination"
                    );
                    break PaginationEnd::ClickFailed;
                }
            }
        };

        tracing::info!(
            run_id = %self.ctx.run_id,
            category = %self.ctx.category,
            operation = "paginate",
            event = "pagination_done",
            clicks,
            idle_attempts,
            end = ?end,
            "pagination done"
        );

        PaginationSummary {
            clicks,
            idle_attempts,
            end,
        }
    }
}
