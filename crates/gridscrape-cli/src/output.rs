//! JSON and CSV writers for extracted products.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use gridscrape_core::OutputFormat;
use gridscrape_scraper::Products;
use serde::Serialize;

/// Writes `products` to `path` in `format`. Returns `false` when there was
/// nothing to write.
pub(crate) fn save_products(
    products: &Products,
    path: &Path,
    format: OutputFormat,
) -> anyhow::Result<bool> {
    match (products, format) {
        (Products::Structured(items), OutputFormat::Json) => write_json(items, path),
        (Products::Structured(items), OutputFormat::Csv) => write_csv(items, path),
        (Products::Raw(items), OutputFormat::Json) => write_json(items, path),
        (Products::Raw(items), OutputFormat::Csv) => write_csv(items, path),
    }
}

/// Pretty-printed JSON array. An empty slice writes nothing and returns
/// `Ok(false)`.
pub(crate) fn write_json<T: Serialize>(items: &[T], path: &Path) -> anyhow::Result<bool> {
    if items.is_empty() {
        return Ok(false);
    }
    let mut writer = BufWriter::new(create_file(path)?);
    serde_json::to_writer_pretty(&mut writer, items)
        .with_context(|| format!("failed to serialize JSON to {}", path.display()))?;
    writer
        .write_all(b"\n")
        .and_then(|()| writer.flush())
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(true)
}

/// CSV with a header row taken from the record's field names. `None`
/// fields become empty cells. An empty slice writes nothing and returns
/// `Ok(false)`.
pub(crate) fn write_csv<T: Serialize>(items: &[T], path: &Path) -> anyhow::Result<bool> {
    if items.is_empty() {
        return Ok(false);
    }
    let mut writer = csv::Writer::from_writer(create_file(path)?);
    for item in items {
        writer
            .serialize(item)
            .with_context(|| format!("failed to write CSV row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(true)
}

fn create_file(path: &Path) -> anyhow::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    File::create(path).with_context(|| format!("failed to create {}", path.display()))
}

#[cfg(test)]
#[path = "output_test.rs"]
mod tests;
