//! Listing extraction from rendered results markup.
//!
//! Each matched listing row is read independently: a sub-field that is
//! missing or unreadable yields `None` for that field only and never
//! affects sibling fields or sibling rows. Items that fail the
//! completeness rule (title, price and location all present) are
//! dropped and counted instead of emitted.

use crate::error::{Result, ScrapeError};
use chrono::Utc;
use ilan_core::{FieldSelectors, ListingRecord};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Result of extracting one page's listings.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Complete records, in document order
    pub records: Vec<ListingRecord>,
    /// Number of items dropped as incomplete
    pub incomplete: u64,
}

/// Parsed selector set, built once per run from the configured table.
pub(crate) struct CompiledSelectors {
    container: Selector,
    title: Selector,
    price: Selector,
    location: Selector,
    date: Selector,
    link: Selector,
    image: Selector,
}

impl CompiledSelectors {
    pub(crate) fn compile(selectors: &FieldSelectors) -> Result<Self> {
        Ok(Self {
            container: parse_selector("listing_container", &selectors.listing_container)?,
            title: parse_selector("title", &selectors.title)?,
            price: parse_selector("price", &selectors.price)?,
            location: parse_selector("location", &selectors.location)?,
            date: parse_selector("date", &selectors.date)?,
            link: parse_selector("link", &selectors.link)?,
            image: parse_selector("image", &selectors.image)?,
        })
    }
}

fn parse_selector(field: &'static str, selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ScrapeError::Selector {
        field,
        reason: e.to_string(),
    })
}

/// Extract listing records from one page of rendered markup.
///
/// `base_url` resolves relative listing links to absolute URLs.
pub fn extract_listings(
    html: &str,
    selectors: &FieldSelectors,
    base_url: &Url,
) -> Result<Extraction> {
    let compiled = CompiledSelectors::compile(selectors)?;
    Ok(extract_with_compiled(html, &compiled, base_url))
}

pub(crate) fn extract_with_compiled(
    html: &str,
    selectors: &CompiledSelectors,
    base_url: &Url,
) -> Extraction {
    let document = Html::parse_document(html);
    let mut extraction = Extraction::default();

    for item in document.select(&selectors.container) {
        let record = read_item(&item, selectors, base_url);
        if record.is_complete() {
            extraction.records.push(record);
        } else {
            tracing::debug!("Dropping incomplete listing: {:?}", record.title);
            extraction.incomplete += 1;
        }
    }

    extraction
}

/// Read the six sub-fields of one listing row.
fn read_item(item: &ElementRef, selectors: &CompiledSelectors, base_url: &Url) -> ListingRecord {
    let link = select_attr(item, &selectors.link, "href")
        .and_then(|href| resolve_link(base_url, &href));

    ListingRecord {
        title: select_text(item, &selectors.title),
        price: select_text(item, &selectors.price),
        location: select_text(item, &selectors.location),
        date: select_text(item, &selectors.date),
        url: link,
        image_url: select_attr(item, &selectors.image, "src"),
        scraped_at: Utc::now(),
    }
}

/// First matching element's text, trimmed; empty text reads as absent.
fn select_text(item: &ElementRef, selector: &Selector) -> Option<String> {
    item.select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn select_attr(item: &ElementRef, selector: &Selector, attr: &str) -> Option<String> {
    item.select(selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(ToString::to_string)
}

/// Resolve a possibly-relative listing link against the site base URL.
fn resolve_link(base_url: &Url, href: &str) -> Option<String> {
    match base_url.join(href) {
        Ok(absolute) => Some(absolute.to_string()),
        Err(e) => {
            tracing::debug!("Cannot resolve listing link {:?}: {}", href, e);
            None
        }
    }
}
