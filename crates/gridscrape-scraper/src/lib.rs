pub mod card;
pub mod click;
pub mod context;
pub mod convert;
pub mod error;
pub mod heuristics;
pub mod pagination;
pub mod pipeline;
pub mod session;
pub mod wait;
pub mod webdriver;

pub use card::CardParser;
pub use click::{ClickExecutor, ClickStatus};
pub use context::RunContext;
pub use convert::CurrencyConverter;
pub use error::ScraperError;
pub use heuristics::{infer_specs, SpecHints};
pub use pagination::{PaginationEnd, PaginationSummary, Paginator};
pub use pipeline::{category_page_url, parse_listing_html, ListingPipeline, Products};
pub use session::{PageSession, SessionError};
pub use webdriver::{SessionOptions, WebDriverSession};
