//! Spec inference from free-text product descriptions.
//!
//! Listing cards carry a one-line description such as
//! `Asus VivoBook 15.6", Core i5-8250U, 8GB, 256GB SSD, Windows 10 Home`.
//! These pattern matchers pull structured fields out of that line. They
//! are heuristics: a field is `None` whenever its pattern does not match,
//! never a placeholder.

use std::sync::LazyLock;

use regex::Regex;

/// Fields inferred from a product's name and description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecHints {
    pub brand: Option<String>,
    pub screen_inches: Option<f64>,
    pub ram_gb: Option<u32>,
    pub storage_gb: Option<u32>,
    pub cpu: Option<String>,
    pub os: Option<String>,
}

/// `14"`, `15.6″`
static SCREEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(\d{1,2}(?:\.\d+)?)\s*["″]"#).expect("valid screen regex"));

/// `8GB`, `8 GB RAM`, `4GB DDR4`
static RAM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*gb\s*(?:ram|ddr\d*l?)?").expect("valid ram regex")
});

/// `256GB SSD`, `1TB HDD`, `32GB eMMC`; the qualifier group also captures
/// RAM words so memory sizes can be excluded from the storage total.
static STORAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*(gb|tb)(?:\s*(ssd|hdd|emmc|sshd?|ram|ddr\d*l?))?")
        .expect("valid storage regex")
});

static CPU_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:intel|amd|apple|core\s*i\d|i\d|celeron|pentium|ryzen|snapdragon)[^,]*",
    )
    .expect("valid cpu regex")
});

/// Ordered: the first pattern that matches anywhere in the text wins.
static OS_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Windows 10 Home, Windows 10 Pro + Office
        r"(?i)windows\s+\d+(?:\s+\w+)*(?:\s*\+\s*\w+.*)?",
        // Win7 Pro 64bit
        r"(?i)win\d?\s*pro\s*\d*bit",
        r"(?i)freedos",
        r"(?i)endless\s+os",
        r"(?i)no\s+os",
        r"(?i)macos",
        r"(?i)linux",
        r"(?i)dos\b",
        r"(?i)android",
        r"(?i)ios",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("valid os regex"))
    .collect()
});

/// Runs every matcher. `brand` comes from `name`; everything else from
/// `description`.
#[must_use]
pub fn infer_specs(description: &str, name: &str) -> SpecHints {
    SpecHints {
        brand: extract_brand(name),
        screen_inches: extract_screen_inches(description),
        ram_gb: extract_ram_gb(description),
        storage_gb: extract_storage_gb(description),
        cpu: extract_cpu(description),
        os: extract_os(description),
    }
}

/// First whitespace-delimited token of the product name.
#[must_use]
pub fn extract_brand(name: &str) -> Option<String> {
    name.split_whitespace().next().map(str::to_owned)
}

#[must_use]
pub fn extract_screen_inches(text: &str) -> Option<f64> {
    SCREEN_RE
        .captures(text)
        .and_then(|caps| caps[1].parse::<f64>().ok())
}

#[must_use]
pub fn extract_ram_gb(text: &str) -> Option<u32> {
    RAM_RE
        .captures(text)
        .and_then(|caps| caps[1].parse::<u32>().ok())
}

/// Sums every storage size mentioned, counting TB as 1024 GB.
///
/// Sizes qualified as RAM (`8GB RAM`, `4GB DDR4`) are skipped. A zero total
/// is reported as `None`.
#[must_use]
pub fn extract_storage_gb(text: &str) -> Option<u32> {
    let mut total: u64 = 0;
    for caps in STORAGE_RE.captures_iter(text) {
        let is_memory = caps.get(3).is_some_and(|q| {
            let q = q.as_str().to_ascii_lowercase();
            q == "ram" || q.starts_with("ddr")
        });
        if is_memory {
            continue;
        }
        let Ok(value) = caps[1].parse::<u64>() else {
            continue;
        };
        let gb = if caps[2].eq_ignore_ascii_case("tb") {
            value.saturating_mul(1024)
        } else {
            value
        };
        total = total.saturating_add(gb);
    }
    u32::try_from(total).ok().filter(|gb| *gb > 0)
}

/// Vendor or family keyword plus everything up to the next comma.
#[must_use]
pub fn extract_cpu(text: &str) -> Option<String> {
    CPU_RE
        .find(text)
        .map(|m| m.as_str().trim().to_owned())
        .filter(|cpu| !cpu.is_empty())
}

#[must_use]
pub fn extract_os(text: &str) -> Option<String> {
    OS_PATTERNS
        .iter()
        .find_map(|re| re.find(text))
        .map(|m| m.as_str().trim().to_owned())
}

#[cfg(test)]
#[path = "heuristics_test.rs"]
mod tests;
