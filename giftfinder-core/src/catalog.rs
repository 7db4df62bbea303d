//! Product catalog loading and normalization
//!
//! The catalog CSV is read once per process and every row is normalized
//! up front: the first image URL is extracted from the pipe-delimited
//! link field, the price is stripped of currency markers and converted,
//! and missing descriptions become empty strings. A malformed file fails
//! the whole load; there is no partial catalog.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GiftError, Result};

/// Default source-to-EUR conversion rate (INR per EUR)
pub const DEFAULT_CONVERSION_RATE: f64 = 105.0;

const COL_NAME: &str = "product_name";
const COL_DESCRIPTION: &str = "about_product";
const COL_IMAGE: &str = "img_link";
const COL_PRICE: &str = "discounted_price";

/// Catalog loading configuration
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Units of the source currency per EUR
    pub conversion_rate: f64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            conversion_rate: DEFAULT_CONVERSION_RATE,
        }
    }
}

/// A single normalized catalog row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Row position in the source file (0-based, header excluded)
    pub index: usize,
    /// Product name
    pub name: String,
    /// Product description; empty when the source field is missing
    pub description: String,
    /// First image URL from the pipe-delimited source field
    pub image_url: String,
    /// Discounted price in the source currency
    pub price_inr: f64,
    /// Price converted to EUR, rounded to two decimals
    pub price_eur: f64,
}

/// Ordered product catalog, read-only after loading
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// Load a catalog CSV with the default conversion rate
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_config(path, &CatalogConfig::default())
    }

    /// Load and normalize a catalog CSV
    ///
    /// Fails if a required column is absent or any price cannot be
    /// parsed as a decimal after stripping currency markers.
    pub fn load_with_config(path: impl AsRef<Path>, config: &CatalogConfig) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path)?;

        let headers = reader.headers()?.clone();
        let columns = ColumnIndexes::resolve(&headers)?;

        let mut items = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record?;
            items.push(parse_row(index, &record, &columns, config)?);
        }

        log::info!(
            "Loaded {} catalog items from {}",
            items.len(),
            path.display()
        );
        Ok(Self { items })
    }

    /// Build a catalog from already-normalized items
    pub fn from_items(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }

    /// Number of items in the catalog
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog holds no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item at the given row position
    pub fn get(&self, index: usize) -> Option<&CatalogItem> {
        self.items.get(index)
    }

    /// Iterate items in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &CatalogItem> {
        self.items.iter()
    }

    /// All items in catalog order
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Count of items priced at or under the given EUR budget
    pub fn affordable_count(&self, max_price: f64) -> usize {
        self.items
            .iter()
            .filter(|item| item.price_eur <= max_price)
            .count()
    }
}

/// Resolved positions of the required columns
struct ColumnIndexes {
    name: usize,
    description: usize,
    image: usize,
    price: usize,
}

impl ColumnIndexes {
    fn resolve(headers: &csv::StringRecord) -> Result<Self> {
        let find = |column: &str| {
            headers.iter().position(|h| h == column).ok_or_else(|| {
                GiftError::data_format(format!(
                    "missing required column '{}' (found: {})",
                    column,
                    headers.iter().collect::<Vec<_>>().join(", ")
                ))
            })
        };

        Ok(Self {
            name: find(COL_NAME)?,
            description: find(COL_DESCRIPTION)?,
            image: find(COL_IMAGE)?,
            price: find(COL_PRICE)?,
        })
    }
}

fn parse_row(
    index: usize,
    record: &csv::StringRecord,
    columns: &ColumnIndexes,
    config: &CatalogConfig,
) -> Result<CatalogItem> {
    let name = record.get(columns.name).unwrap_or("").to_string();
    let description = record.get(columns.description).unwrap_or("").to_string();
    let image_url = first_image_url(record.get(columns.image).unwrap_or(""));

    let raw_price = record.get(columns.price).unwrap_or("");
    let price_inr = parse_price(raw_price).ok_or_else(|| {
        GiftError::data_format(format!(
            "row {}: cannot parse price '{}' as a decimal",
            index + 2, // 1-based line number including the header
            raw_price
        ))
    })?;
    let price_eur = round2(price_inr / config.conversion_rate);

    Ok(CatalogItem {
        index,
        name,
        description,
        image_url,
        price_inr,
        price_eur,
    })
}

/// Substring before the first `|`; the source field packs several URLs
/// into one cell
fn first_image_url(raw: &str) -> String {
    raw.split('|').next().unwrap_or(raw).to_string()
}

/// Parse a price cell such as `₹1,099` or `$49.99`
///
/// Strips comma grouping separators and any leading currency marker,
/// then parses the rest as a decimal. Trailing garbage fails the parse.
fn parse_price(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let no_grouping: String = trimmed.chars().filter(|c| *c != ',').collect();
    let numeric =
        no_grouping.trim_start_matches(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'));
    numeric.parse::<f64>().ok()
}

/// Round to two decimals, half away from zero
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
