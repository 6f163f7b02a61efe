//! Category and search URL construction.
//!
//! sahibinden.com addresses category listings as
//! `https://www.sahibinden.com/<category-slug>[/<location>]` with
//! pagination and filters carried in the query string. Location names
//! frequently contain Turkish characters and must be percent-encoded.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Characters left unencoded in location path segments (RFC 3986
/// unreserved set).
const LOCATION_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Listing categories with their site URL slugs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    KiralikDaire,
    SatilikDaire,
    KiralikVilla,
    SatilikVilla,
    KiralikIsyeri,
    SatilikIsyeri,
}

impl Category {
    /// URL slug for this category.
    #[must_use]
    pub fn slug(&self) -> &'static str {
        match self {
            Self::KiralikDaire => "kiralik-daire",
            Self::SatilikDaire => "satilik-daire",
            Self::KiralikVilla => "kiralik-villa",
            Self::SatilikVilla => "satilik-villa",
            Self::KiralikIsyeri => "kiralik-isyeri",
            Self::SatilikIsyeri => "satilik-isyeri",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Percent-encode a location name for use as a URL path segment.
///
/// Lowercased first, matching how the site addresses locations
/// (`Göztepe` becomes `g%C3%B6ztepe`).
#[must_use]
pub fn encode_location(location: &str) -> String {
    let lowered = location.to_lowercase();
    utf8_percent_encode(&lowered, LOCATION_ENCODE_SET).to_string()
}

/// Build a category URL with an optional location path segment.
#[must_use]
pub fn build_category_url(base_url: &str, category: Category, location: Option<&str>) -> String {
    let base = base_url.trim_end_matches('/');
    match location {
        Some(loc) if !loc.is_empty() => {
            format!("{}/{}/{}", base, category.slug(), encode_location(loc))
        }
        _ => format!("{}/{}", base, category.slug()),
    }
}

/// Build a paginated category URL with optional query filters.
///
/// Filters are appended in the order given; the page parameter comes
/// last.
#[must_use]
pub fn build_paginated_url(
    base_url: &str,
    category: Category,
    location: Option<&str>,
    filters: &[(&str, &str)],
    page: u32,
) -> String {
    let mut url = build_category_url(base_url, category, location);
    let mut separator = '?';

    for (key, value) in filters {
        url.push(separator);
        url.push_str(key);
        url.push('=');
        url.push_str(&utf8_percent_encode(value, LOCATION_ENCODE_SET).to_string());
        separator = '&';
    }

    url.push(separator);
    url.push_str("page=");
    url.push_str(&page.to_string());
    url
}
