use std::time::Duration;

use super::*;
use crate::SelectorKey;

const MINIMAL: &str = r#"
base_url: "https://webscraper.io/"
products:
  category_url: "test-sites/e-commerce/more/computers"
"#;

const FULL: &str = r#"
base_url: "https://webscraper.io/"
global:
  logging_level: DEBUG
  category: tablets
  output_dir: out
  output_format: csv
  structured_products_data: false
browser:
  name: firefox
  webdriver_url: "http://127.0.0.1:9515"
  window_size: [1920, 1080]
  implicitly_wait: 2
  headed: true
products:
  category_url: "test-sites/e-commerce/more/computers/"
  load_more_button_wait_time: 4
  load_cards_wait_time: 6
  max_idle_clicks: 5
  poll_interval_ms: 100
  currency_rates:
    usd: 1.0
    eur: 0.92
  target_currency: eur
  selectors:
    product_card: "div.thumbnail"
    name: "a.title"
    price: "h4.price"
    load_more: "ecomerce-items-scroll-more"
  categories:
    tablets:
      selectors:
        product_card: "div.tablet-card"
"#;

#[test]
fn minimal_config_applies_defaults() {
    let cfg = parse_config(MINIMAL).unwrap();
    assert_eq!(cfg.base_url.as_str(), "https://webscraper.io/");
    assert_eq!(cfg.global.category, "laptops");
    assert_eq!(cfg.global.output_format, OutputFormat::Json);
    assert!(cfg.global.structured_products_data);
    assert_eq!(cfg.browser.name, BrowserKind::Chrome);
    assert_eq!(cfg.browser.window_size, [1280, 720]);
    assert_eq!(cfg.browser.implicitly_wait, 5);
    assert!(!cfg.browser.headed);
    assert_eq!(cfg.products.target_currency, "USD");
    assert_eq!(cfg.products.currency_rates.get("USD"), Some(&1.0));
    assert_eq!(cfg.products.pagination(), PaginationSettings::default());
}

#[test]
fn full_config_reads_every_section() {
    let cfg = parse_config(FULL).unwrap();
    assert_eq!(cfg.global.logging_level, "DEBUG");
    assert_eq!(cfg.global.category, "tablets");
    assert_eq!(cfg.global.output_dir, PathBuf::from("out"));
    assert_eq!(cfg.global.output_format, OutputFormat::Csv);
    assert!(!cfg.global.structured_products_data);
    assert_eq!(cfg.browser.name, BrowserKind::Firefox);
    assert_eq!(cfg.browser.webdriver_url, "http://127.0.0.1:9515");
    assert_eq!(cfg.browser.window_size, [1920, 1080]);
    assert!(cfg.browser.headed);

    let pagination = cfg.products.pagination();
    assert_eq!(pagination.button_wait, Duration::from_secs(4));
    assert_eq!(pagination.content_wait, Duration::from_secs(6));
    assert_eq!(pagination.max_idle_clicks, 5);
    assert_eq!(pagination.poll_interval, Duration::from_millis(100));
}

#[test]
fn currency_codes_are_upper_cased() {
    let cfg = parse_config(FULL).unwrap();
    assert_eq!(cfg.products.target_currency, "EUR");
    assert_eq!(cfg.products.currency_rates.get("EUR"), Some(&0.92));
    assert!(!cfg.products.currency_rates.contains_key("eur"));
}

#[test]
fn category_overrides_replace_base_selectors() {
    let cfg = parse_config(FULL).unwrap();

    let tablets = cfg.products.selectors_for("tablets");
    assert_eq!(tablets.lookup(SelectorKey::ProductCard), Some("div.tablet-card"));
    assert_eq!(tablets.lookup(SelectorKey::Name), Some("a.title"));

    let laptops = cfg.products.selectors_for("laptops");
    assert_eq!(laptops.lookup(SelectorKey::ProductCard), Some("div.thumbnail"));
}

#[test]
fn rejects_relative_base_url() {
    let yaml = r#"
base_url: "webscraper.io"
products:
  category_url: "x"
"#;
    let err = parse_config(yaml).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)), "got: {err:?}");
}

#[test]
fn rejects_non_base_url() {
    let yaml = r#"
base_url: "mailto:shop@example.com"
products:
  category_url: "x"
"#;
    let err = parse_config(yaml).unwrap_err();
    assert!(err.to_string().contains("absolute"), "got: {err}");
}

#[test]
fn rejects_bad_target_currency() {
    let yaml = r#"
base_url: "https://example.com/"
products:
  category_url: "x"
  target_currency: "EURO"
"#;
    let err = parse_config(yaml).unwrap_err();
    assert!(err.to_string().contains("3-letter"), "got: {err}");
}

#[test]
fn rejects_zero_wait_time() {
    let yaml = r#"
base_url: "https://example.com/"
products:
  category_url: "x"
  load_cards_wait_time: 0
"#;
    let err = parse_config(yaml).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)), "got: {err:?}");
}

#[test]
fn rejects_zero_idle_budget() {
    let yaml = r#"
base_url: "https://example.com/"
products:
  category_url: "x"
  max_idle_clicks: 0
"#;
    let err = parse_config(yaml).unwrap_err();
    assert!(err.to_string().contains("max_idle_clicks"), "got: {err}");
}

#[test]
fn rejects_negative_currency_rate() {
    let yaml = r#"
base_url: "https://example.com/"
products:
  category_url: "x"
  currency_rates: { GBP: -1.0 }
"#;
    let err = parse_config(yaml).unwrap_err();
    assert!(err.to_string().contains("GBP"), "got: {err}");
}

#[test]
fn rejects_empty_window_dimension() {
    let yaml = r#"
base_url: "https://example.com/"
browser:
  window_size: [0, 720]
products:
  category_url: "x"
"#;
    let err = parse_config(yaml).unwrap_err();
    assert!(err.to_string().contains("window_size"), "got: {err}");
}

#[test]
fn missing_products_section_is_a_parse_error() {
    let err = parse_config("base_url: \"https://example.com/\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)), "got: {err:?}");
}

#[test]
fn load_config_reports_missing_file() {
    let err = load_config(Path::new("/definitely/not/here/config.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::FileIo { .. }), "got: {err:?}");
}

#[test]
fn log_directive_maps_level_names() {
    let mut global = GlobalConfig::default();
    for (level, expected) in [
        ("INFO", "info"),
        ("debug", "debug"),
        ("WARNING", "warn"),
        ("CRITICAL", "error"),
        ("verbose", "info"),
    ] {
        global.logging_level = level.to_string();
        assert_eq!(global.log_directive(), expected, "level {level}");
    }
}

#[test]
fn output_format_extension() {
    assert_eq!(OutputFormat::Json.extension(), "json");
    assert_eq!(OutputFormat::Csv.to_string(), "csv");
}
