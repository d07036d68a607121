//! In-memory [`PageSession`] used by the integration suites.
//!
//! `FakePage` models a listing that grows when its load-more control is
//! clicked. Each click pops the next batch size off `batches`; once the
//! batches run out, clicks load nothing.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::time::Duration;

use gridscrape_core::Selectors;
use gridscrape_scraper::{PageSession, SessionError};

pub const CONTROL: &str = ".load-more";

#[derive(Debug)]
pub struct FakePage {
    pub cards: usize,
    pub batches: VecDeque<usize>,
    pub button_present: bool,
    pub button_visible: bool,
    /// Hide the control as soon as the last batch has loaded.
    pub hide_when_exhausted: bool,
    pub fail_click: bool,
    pub fail_count: bool,
    /// 1-based card numbers rendered without a price.
    pub broken_cards: Vec<usize>,
    pub clicks: usize,
    pub navigated: Vec<String>,
}

impl FakePage {
    pub fn new(cards: usize, batches: &[usize]) -> Self {
        Self {
            cards,
            batches: batches.iter().copied().collect(),
            button_present: true,
            button_visible: true,
            hide_when_exhausted: false,
            fail_click: false,
            fail_count: false,
            broken_cards: Vec::new(),
            clicks: 0,
            navigated: Vec::new(),
        }
    }

    /// Hides the control once the batches run out (at once if there are
    /// none), so the loop ends without idle rounds.
    pub fn hiding_when_exhausted(mut self) -> Self {
        self.hide_when_exhausted = true;
        self.button_visible = !self.batches.is_empty();
        self
    }
}

impl PageSession for FakePage {
    fn navigate(&mut self, url: &str) -> Result<(), SessionError> {
        self.navigated.push(url.to_owned());
        Ok(())
    }

    fn page_source(&mut self) -> Result<String, SessionError> {
        let mut html = String::from("<html><body><div class=\"row\">");
        for i in 1..=self.cards {
            let price = if self.broken_cards.contains(&i) {
                String::new()
            } else {
                format!("${}.99", 100 + i)
            };
            html.push_str(&format!(
                r#"<div class="thumbnail">
                     <h4 class="price">{price}</h4>
                     <a class="title" href="/test-sites/e-commerce/more/product/{i}">Laptop {i}</a>
                     <p class="description">Acme Laptop {i}, 15.6", Core i5-8250U, 8GB, 256GB SSD, Windows 10 Home</p>
                     <div class="ratings">
                       <p class="review-count">{i} reviews</p>
                       <p><span class="ws-icon-star"></span><span class="ws-icon-star"></span></p>
                     </div>
                   </div>"#
            ));
        }
        html.push_str("</div>");
        if self.button_present {
            html.push_str(r#"<a class="load-more">More</a>"#);
        }
        html.push_str("</body></html>");
        Ok(html)
    }

    fn count(&mut self, selector: &str) -> Result<usize, SessionError> {
        if self.fail_count {
            return Err(SessionError::Command {
                command: "find_all",
                reason: "stale element reference".to_string(),
            });
        }
        if selector == CONTROL {
            return Ok(usize::from(self.button_present));
        }
        Ok(self.cards)
    }

    fn wait_for_element(&mut self, selector: &str, timeout: Duration) -> Result<(), SessionError> {
        if selector == CONTROL && !self.button_present {
            return Err(SessionError::Timeout {
                selector: selector.to_owned(),
                waited: timeout,
            });
        }
        Ok(())
    }

    fn is_visible(&mut self, selector: &str) -> Result<bool, SessionError> {
        Ok(selector == CONTROL && self.button_present && self.button_visible)
    }

    fn click(&mut self, selector: &str) -> Result<(), SessionError> {
        if selector != CONTROL || !self.button_present {
            return Err(SessionError::NotFound {
                selector: selector.to_owned(),
            });
        }
        if self.fail_click {
            return Err(SessionError::Command {
                command: "click",
                reason: "element click intercepted".to_string(),
            });
        }
        self.clicks += 1;
        if let Some(batch) = self.batches.pop_front() {
            self.cards += batch;
        }
        if self.batches.is_empty() && self.hide_when_exhausted {
            self.button_visible = false;
        }
        Ok(())
    }
}

/// Selector table matching the markup `FakePage` renders.
pub fn listing_selectors() -> Selectors {
    [
        ("product_card", "div.thumbnail"),
        ("name", "a.title"),
        ("price", "h4.price"),
        ("rating", "div.ratings span.ws-icon-star"),
        ("reviews", "div.ratings p.review-count"),
        ("description", "p.description"),
        ("product_link", "a.title"),
        ("load_more", "load-more"),
    ]
    .into_iter()
    .collect()
}
