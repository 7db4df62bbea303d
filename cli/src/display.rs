//! Terminal rendering of ranked results
//!
//! Rendering never fails the result set over one bad asset: an unusable
//! image link degrades to the placeholder and the rest of the card
//! stays intact.

use std::io::{self, Write};

use serde::Serialize;
use thiserror::Error;

use giftfinder_core::{CatalogItem, GiftMatch};

/// Substitute image shown when an item's link is unusable
pub const PLACEHOLDER_IMAGE: &str =
    "https://upload.wikimedia.org/wikipedia/commons/thumb/e/e0/Git-logo.svg/1024px-Git-logo.svg.png";

/// Characters of the product name shown on a card
const NAME_CHARS: usize = 50;
/// Characters of the description excerpt
const EXCERPT_CHARS: usize = 300;
/// Match percentage at or above which a result is flagged as strong
const STRONG_MATCH_PERCENT: i32 = 50;

/// Why an item's image link cannot be displayed
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DisplayAssetError {
    #[error("item has no image link")]
    MissingLink,
    #[error("image link is not an http(s) URL: {0}")]
    UnsupportedScheme(String),
}

/// A displayable image reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHandle(pub String);

/// Resolve an item's image link into a displayable handle
///
/// The fallback rule lives in the caller: on error, render
/// [`PLACEHOLDER_IMAGE`] instead and keep the rest of the card.
pub fn resolve_image(item: &CatalogItem) -> Result<ImageHandle, DisplayAssetError> {
    let url = item.image_url.trim();
    if url.is_empty() {
        return Err(DisplayAssetError::MissingLink);
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(DisplayAssetError::UnsupportedScheme(url.to_string()));
    }
    Ok(ImageHandle(url.to_string()))
}

fn image_or_placeholder(item: &CatalogItem) -> String {
    match resolve_image(item) {
        Ok(ImageHandle(url)) => url,
        Err(e) => {
            tracing::debug!("image fallback for '{}': {}", item.name, e);
            PLACEHOLDER_IMAGE.to_string()
        }
    }
}

/// Integer match percentage shown next to each result
pub fn match_percent(score: f32) -> i32 {
    (score * 100.0) as i32
}

/// First `max_chars` characters, with an ellipsis when truncated
///
/// Counted in characters so multibyte names never split mid-glyph.
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}

/// Render the ranked result list as cards
pub fn render_results(
    out: &mut impl Write,
    results: &[GiftMatch<'_>],
    affordable: usize,
) -> io::Result<()> {
    writeln!(out, "{} products available within this budget", affordable)?;

    if results.is_empty() {
        writeln!(
            out,
            "Sorry, nothing relevant fits this budget. Try raising it or rephrasing."
        )?;
        return Ok(());
    }

    writeln!(out, "Found {} relevant gifts!", results.len())?;
    for (position, gift) in results.iter().enumerate() {
        let percent = match_percent(gift.score);
        let marker = if percent >= STRONG_MATCH_PERCENT { "*" } else { " " };

        writeln!(out)?;
        writeln!(
            out,
            "{:>2}.{} [{:>3}% match] {}",
            position + 1,
            marker,
            percent,
            truncate(&gift.item.name, NAME_CHARS)
        )?;
        writeln!(out, "      Price: {:.2} EUR", gift.item.price_eur)?;
        if !gift.item.description.is_empty() {
            writeln!(out, "      {}", truncate(&gift.item.description, EXCERPT_CHARS))?;
        }
        writeln!(out, "      {}", image_or_placeholder(gift.item))?;
    }
    Ok(())
}

/// One row of `--json` output
#[derive(Debug, Serialize)]
pub struct JsonResult {
    pub rank: usize,
    pub name: String,
    pub score: f32,
    pub match_percent: i32,
    pub price_eur: f64,
    pub image_url: String,
}

/// Render results as a JSON array for scripting
pub fn render_json(out: &mut impl Write, results: &[GiftMatch<'_>]) -> io::Result<()> {
    let rows: Vec<JsonResult> = results
        .iter()
        .enumerate()
        .map(|(position, gift)| JsonResult {
            rank: position + 1,
            name: gift.item.name.clone(),
            score: gift.score,
            match_percent: match_percent(gift.score),
            price_eur: gift.item.price_eur,
            image_url: image_or_placeholder(gift.item),
        })
        .collect();

    let json = serde_json::to_string_pretty(&rows).map_err(io::Error::from)?;
    writeln!(out, "{}", json)
}
