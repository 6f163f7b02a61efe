//! Shared types used across the ilan scraper crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single classified listing extracted from a results page.
///
/// Every field except `scraped_at` is optional because individual
/// sub-fields can be missing from the rendered markup without
/// invalidating the sibling fields of the same item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    /// Listing title text
    pub title: Option<String>,
    /// Price text as displayed on the site (e.g. "12.500 TL")
    pub price: Option<String>,
    /// Location text (e.g. "Kadıköy, Göztepe")
    pub location: Option<String>,
    /// Listing date text as displayed
    pub date: Option<String>,
    /// Absolute URL of the listing detail page
    pub url: Option<String>,
    /// Thumbnail image URL
    pub image_url: Option<String>,
    /// When this record was extracted
    pub scraped_at: DateTime<Utc>,
}

impl ListingRecord {
    /// A record qualifies for output only if title, price and location
    /// are all present and non-empty after trimming.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        fn present(field: Option<&String>) -> bool {
            field.is_some_and(|s| !s.trim().is_empty())
        }

        present(self.title.as_ref())
            && present(self.price.as_ref())
            && present(self.location.as_ref())
    }
}

/// Request to fetch one results page.
///
/// Constructed by the scheduler from a page range; immutable for the
/// lifetime of the unit of work it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Base listing URL, without pagination parameter
    pub base_url: String,
    /// 1-based page index
    pub page_index: u32,
}

impl PageRequest {
    /// Create a request for one page of the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>, page_index: u32) -> Self {
        Self {
            base_url: base_url.into(),
            page_index,
        }
    }

    /// Build the full page URL by appending the page-number query
    /// parameter to the base URL.
    #[must_use]
    pub fn page_url(&self) -> String {
        let separator = if self.base_url.contains('?') { '&' } else { '?' };
        format!("{}{}page={}", self.base_url, separator, self.page_index)
    }
}

/// Point-in-time copy of the run statistics counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Number of pages fetched and extracted successfully
    pub pages_scraped: u64,
    /// Number of records in the final result set
    pub listings_found: u64,
    /// Number of items that passed the completeness rule
    pub successful_extractions: u64,
    /// Number of items dropped as incomplete or unreadable
    pub failed_extractions: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, price: &str, location: &str) -> ListingRecord {
        ListingRecord {
            title: Some(title.to_string()),
            price: Some(price.to_string()),
            location: Some(location.to_string()),
            date: None,
            url: None,
            image_url: None,
            scraped_at: Utc::now(),
        }
    }

    #[test]
    fn test_complete_record() {
        assert!(record("Flat B", "1000 TL", "Besiktas").is_complete());
    }

    #[test]
    fn test_empty_price_is_incomplete() {
        assert!(!record("Flat A", "", "Kadikoy").is_complete());
    }

    #[test]
    fn test_whitespace_only_field_is_incomplete() {
        assert!(!record("Flat A", "   ", "Kadikoy").is_complete());
    }

    #[test]
    fn test_missing_title_is_incomplete() {
        let mut rec = record("x", "1000 TL", "Kadikoy");
        rec.title = None;
        assert!(!rec.is_complete());
    }

    #[test]
    fn test_page_url_without_query() {
        let req = PageRequest::new("https://www.sahibinden.com/kiralik-daire", 3);
        assert_eq!(
            req.page_url(),
            "https://www.sahibinden.com/kiralik-daire?page=3"
        );
    }

    #[test]
    fn test_page_url_with_existing_query() {
        let req = PageRequest::new("https://www.sahibinden.com/kiralik-daire?a101=true", 2);
        assert_eq!(
            req.page_url(),
            "https://www.sahibinden.com/kiralik-daire?a101=true&page=2"
        );
    }

    #[test]
    fn test_record_serialization_round_trip() {
        let rec = record("Flat B", "1000 TL", "Besiktas");
        let json = serde_json::to_string(&rec).expect("serialize record");
        let parsed: ListingRecord = serde_json::from_str(&json).expect("parse record");
        assert_eq!(parsed, rec);
    }
}
