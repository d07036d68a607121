use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Field-level failure while building a [`RawProduct`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProductError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid price format: {0:?}")]
    InvalidPrice(String),

    #[error("invalid review count format: {0:?}")]
    InvalidReviewCount(String),

    #[error("invalid product URL {href:?}: {reason}")]
    InvalidUrl { href: String, reason: String },
}

/// Where a card's rating value comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RatingSource<'a> {
    /// Number of matched rating-indicator elements (filled stars).
    Indicators(usize),
    /// A rating printed as a number (`"4.5"`) rather than drawn as icons.
    /// Parsed best-effort, `0.0` when unparseable. The listing parser only
    /// produces [`RatingSource::Indicators`]; this is for callers building
    /// records from other markup.
    Text(&'a str),
}

impl RatingSource<'_> {
    fn value(self) -> f64 {
        match self {
            #[allow(clippy::cast_precision_loss)] // star counts are tiny
            RatingSource::Indicators(count) => count as f64,
            RatingSource::Text(text) => text
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .unwrap_or(0.0),
        }
    }
}

/// Unvalidated card fields as read from the listing markup.
#[derive(Debug, Clone, Copy)]
pub struct RawProductInput<'a> {
    pub name: &'a str,
    pub price: &'a str,
    pub rating: RatingSource<'a>,
    /// Review count text, already reduced to digits by [`clean_review_count`].
    pub reviews: &'a str,
    pub description: &'a str,
    /// Product link as found in the card; may be relative.
    pub href: &'a str,
}

/// One listing card's extracted facts, before currency conversion and
/// spec inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawProduct {
    pub name: String,
    /// Listing price in the site's currency (USD on the reference site).
    pub price_usd: f64,
    pub rating: f64,
    pub num_reviews: u32,
    pub description_raw: String,
    /// Absolute product page URL.
    pub url: String,
    pub last_scraped: DateTime<Utc>,
}

impl RawProduct {
    /// Validates `input` and builds a record stamped with `scraped_at`.
    ///
    /// # Errors
    ///
    /// - [`ProductError::MissingField`] when name, price, or link is blank.
    /// - [`ProductError::InvalidPrice`] / [`ProductError::InvalidReviewCount`]
    ///   when a numeric field does not parse.
    /// - [`ProductError::InvalidUrl`] when the link cannot be resolved
    ///   against `base_url`.
    pub fn new(
        input: RawProductInput<'_>,
        base_url: &Url,
        scraped_at: DateTime<Utc>,
    ) -> Result<Self, ProductError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(ProductError::MissingField("name"));
        }
        if input.price.trim().is_empty() {
            return Err(ProductError::MissingField("price"));
        }
        let href = input.href.trim();
        if href.is_empty() {
            return Err(ProductError::MissingField("url"));
        }

        let price_usd = parse_price(input.price)?;
        let num_reviews = parse_review_count(input.reviews)?;
        let url = base_url
            .join(href)
            .map_err(|e| ProductError::InvalidUrl {
                href: href.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            name: name.to_owned(),
            price_usd,
            rating: input.rating.value(),
            num_reviews,
            description_raw: input.description.trim().to_owned(),
            url: url.into(),
            last_scraped: scraped_at,
        })
    }
}

/// A [`RawProduct`] with its price converted to the target currency and
/// hardware/software specs inferred from the free-text description.
///
/// Every inferred field is `None` when no pattern matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredProduct {
    pub name: String,
    pub price: f64,
    /// ISO 4217 code of `price`.
    pub currency: String,
    pub rating: f64,
    pub num_reviews: u32,
    pub description: String,
    pub url: String,
    /// Conversion time, not the time the card was scraped.
    pub last_scraped: DateTime<Utc>,

    pub brand: Option<String>,
    pub screen_inches: Option<f64>,
    pub ram_gb: Option<u32>,
    /// Total across every storage device mentioned, TB counted as 1024 GB.
    pub storage_gb: Option<u32>,
    pub cpu: Option<String>,
    pub os: Option<String>,
}

/// Parses a currency-formatted price such as `"$1,299.99"`.
///
/// Currency symbols, whitespace, and thousands separators are stripped;
/// whatever remains must be a finite decimal number.
///
/// # Errors
///
/// Returns [`ProductError::InvalidPrice`] when the residue is empty or not
/// numeric.
pub fn parse_price(text: &str) -> Result<f64, ProductError> {
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '$' | '€' | '£' | '¥' | ',') && !c.is_whitespace())
        .collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ProductError::InvalidPrice(text.to_owned()))
}

/// Parses a review count from its leading whitespace-delimited token.
///
/// `"14 reviews"` → 14, `"0"` → 0.
///
/// # Errors
///
/// Returns [`ProductError::InvalidReviewCount`] when the text has no
/// leading digit run that fits a `u32`.
pub fn parse_review_count(text: &str) -> Result<u32, ProductError> {
    let trimmed = text.trim();
    let candidate = match trimmed.split_whitespace().next() {
        Some(token) if token.bytes().all(|b| b.is_ascii_digit()) => token,
        _ => trimmed,
    };
    candidate
        .parse::<u32>()
        .map_err(|_| ProductError::InvalidReviewCount(text.to_owned()))
}

/// Keeps only the ASCII digits of a review label.
///
/// `"1,234 reviews"` → `"1234"`; text without digits → `"0"`.
#[must_use]
pub fn clean_review_count(text: &str) -> String {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        "0".to_string()
    } else {
        digits
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn base() -> Url {
        Url::parse("https://webscraper.io/").unwrap()
    }

    fn scraped_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn input<'a>() -> RawProductInput<'a> {
        RawProductInput {
            name: "Asus VivoBook X441NA-GA190",
            price: "$295.99",
            rating: RatingSource::Indicators(3),
            reviews: "14",
            description: "Asus VivoBook X441NA-GA190 Chocolate Black, 14\", Celeron N3450",
            href: "/test-sites/e-commerce/more/product/60",
        }
    }

    // -----------------------------------------------------------------------
    // RawProduct::new
    // -----------------------------------------------------------------------

    #[test]
    fn builds_product_from_valid_fields() {
        let product = RawProduct::new(input(), &base(), scraped_at()).unwrap();
        assert_eq!(product.name, "Asus VivoBook X441NA-GA190");
        assert!((product.price_usd - 295.99).abs() < f64::EPSILON);
        assert!((product.rating - 3.0).abs() < f64::EPSILON);
        assert_eq!(product.num_reviews, 14);
        assert_eq!(
            product.url,
            "https://webscraper.io/test-sites/e-commerce/more/product/60"
        );
        assert_eq!(product.last_scraped, scraped_at());
    }

    #[test]
    fn rejects_blank_name() {
        let mut fields = input();
        fields.name = "   ";
        let err = RawProduct::new(fields, &base(), scraped_at()).unwrap_err();
        assert_eq!(err, ProductError::MissingField("name"));
    }

    #[test]
    fn rejects_blank_price() {
        let mut fields = input();
        fields.price = "";
        let err = RawProduct::new(fields, &base(), scraped_at()).unwrap_err();
        assert_eq!(err, ProductError::MissingField("price"));
    }

    #[test]
    fn rejects_blank_link() {
        let mut fields = input();
        fields.href = "";
        let err = RawProduct::new(fields, &base(), scraped_at()).unwrap_err();
        assert_eq!(err, ProductError::MissingField("url"));
    }

    #[test]
    fn rejects_non_numeric_price() {
        let mut fields = input();
        fields.price = "Call for price";
        let err = RawProduct::new(fields, &base(), scraped_at()).unwrap_err();
        assert!(matches!(err, ProductError::InvalidPrice(_)));
    }

    #[test]
    fn rejects_overflowing_review_count() {
        let mut fields = input();
        fields.reviews = "99999999999999999999";
        let err = RawProduct::new(fields, &base(), scraped_at()).unwrap_err();
        assert!(matches!(err, ProductError::InvalidReviewCount(_)));
    }

    #[test]
    fn keeps_absolute_links_unchanged() {
        let mut fields = input();
        fields.href = "https://cdn.example.com/p/1";
        let product = RawProduct::new(fields, &base(), scraped_at()).unwrap();
        assert_eq!(product.url, "https://cdn.example.com/p/1");
    }

    #[test]
    fn text_rating_falls_back_to_zero() {
        let mut fields = input();
        fields.rating = RatingSource::Text("four stars");
        let product = RawProduct::new(fields, &base(), scraped_at()).unwrap();
        assert!(product.rating.abs() < f64::EPSILON);

        fields.rating = RatingSource::Text(" 4.5 ");
        let product = RawProduct::new(fields, &base(), scraped_at()).unwrap();
        assert!((product.rating - 4.5).abs() < f64::EPSILON);
    }

    // -----------------------------------------------------------------------
    // Field parsers
    // -----------------------------------------------------------------------

    #[test]
    fn parse_price_strips_symbols_and_separators() {
        assert!((parse_price("$1,299.99").unwrap() - 1299.99).abs() < f64::EPSILON);
        assert!((parse_price(" 416.99 ").unwrap() - 416.99).abs() < f64::EPSILON);
        assert!((parse_price("€ 20").unwrap() - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn parse_price_rejects_residue() {
        assert!(parse_price("$").is_err());
        assert!(parse_price("12.99 USD").is_err());
        assert!(parse_price("inf").is_err());
    }

    #[test]
    fn parse_review_count_takes_leading_token() {
        assert_eq!(parse_review_count("14 reviews").unwrap(), 14);
        assert_eq!(parse_review_count("0").unwrap(), 0);
        assert!(parse_review_count("reviews").is_err());
    }

    #[test]
    fn clean_review_count_keeps_digits_only() {
        assert_eq!(clean_review_count("1,234 reviews"), "1234");
        assert_eq!(clean_review_count("1234"), "1234");
        assert_eq!(clean_review_count(""), "0");
        assert_eq!(clean_review_count("no reviews yet"), "0");
    }

    #[test]
    fn structured_product_serializes_none_as_null() {
        let product = StructuredProduct {
            name: "X".to_string(),
            price: 1.0,
            currency: "USD".to_string(),
            rating: 0.0,
            num_reviews: 0,
            description: String::new(),
            url: "https://example.com/".to_string(),
            last_scraped: scraped_at(),
            brand: None,
            screen_inches: None,
            ram_gb: None,
            storage_gb: None,
            cpu: None,
            os: None,
        };
        let json = serde_json::to_value(&product).unwrap();
        assert!(json["brand"].is_null());
        assert_eq!(json["last_scraped"], "2024-05-01T12:00:00Z");
    }
}
