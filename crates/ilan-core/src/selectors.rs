//! CSS selector table for listing extraction.
//!
//! The scraper core is selector-agnostic: it only knows the logical
//! field names defined here. The concrete selector strings are
//! configuration and can be replaced wholesale when the site markup
//! changes.

use serde::{Deserialize, Serialize};

/// Mapping from logical field name to CSS selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSelectors {
    /// Selector matching one listing row in the results table
    pub listing_container: String,
    /// Title text within a listing row
    pub title: String,
    /// Price text within a listing row
    pub price: String,
    /// Location text within a listing row
    pub location: String,
    /// Date text within a listing row
    pub date: String,
    /// Anchor element carrying the listing detail link
    pub link: String,
    /// Thumbnail image element
    pub image: String,
}

impl Default for FieldSelectors {
    fn default() -> Self {
        Self {
            listing_container: "tr.searchResultsItem".to_string(),
            title: ".classifiedTitle".to_string(),
            price: ".searchResultsPriceValue".to_string(),
            location: ".searchResultsLocationValue".to_string(),
            date: ".searchResultsDateValue".to_string(),
            link: "a.classifiedTitle".to_string(),
            image: "img.lazyload".to_string(),
        }
    }
}
