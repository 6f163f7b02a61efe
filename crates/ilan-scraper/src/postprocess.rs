//! Post-processing of extracted listing records.
//!
//! Applied by the caller after a run: field normalization (currency
//! symbol, whitespace, location casing), URL-based deduplication and
//! price-range filtering. All helpers leave the input records
//! otherwise untouched.

use ilan_core::ListingRecord;

/// Normalize a raw price string: trim, collapse internal whitespace
/// and replace the lira sign with "TL".
#[must_use]
pub fn clean_price(price: &str) -> String {
    let replaced = price.replace('₺', "TL");
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize a raw location string: trim, collapse internal whitespace
/// and title-case each word ("kadıköy, göztepe" becomes
/// "Kadıköy, Göztepe").
#[must_use]
pub fn clean_location(location: &str) -> String {
    location
        .split_whitespace()
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Parse the numeric value out of a displayed price.
///
/// Turkish number formatting: dots are thousands separators, a comma
/// is the decimal separator ("1.250.000 TL" is 1250000, "12,5 TL" is
/// 12.5). Returns `None` when the string carries no leading number.
#[must_use]
pub fn parse_price(price: &str) -> Option<f64> {
    let numeric: String = price
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();
    if numeric.is_empty() {
        return None;
    }

    let normalized = if numeric.contains(',') {
        numeric.replace('.', "").replace(',', ".")
    } else {
        numeric.replace('.', "")
    };
    normalized.parse().ok()
}

/// Normalize the price and location fields of every record in place.
pub fn clean_records(records: &mut [ListingRecord]) {
    for record in records {
        if let Some(price) = &record.price {
            record.price = Some(clean_price(price));
        }
        if let Some(location) = &record.location {
            record.location = Some(clean_location(location));
        }
    }
}

/// Drop records whose listing URL was already seen, keeping the first
/// occurrence. Records without a URL are always kept.
#[must_use]
pub fn remove_duplicates(records: Vec<ListingRecord>) -> Vec<ListingRecord> {
    let mut seen_urls = std::collections::HashSet::new();
    records
        .into_iter()
        .filter(|record| match &record.url {
            Some(url) => seen_urls.insert(url.clone()),
            None => true,
        })
        .collect()
}

/// Keep records whose parsed price falls inside the given bounds.
///
/// Either bound may be absent. Records whose price cannot be parsed
/// are dropped, since they cannot be placed inside or outside the
/// range.
#[must_use]
pub fn filter_by_price_range(
    records: Vec<ListingRecord>,
    min_price: Option<f64>,
    max_price: Option<f64>,
) -> Vec<ListingRecord> {
    records
        .into_iter()
        .filter(|record| {
            let Some(price) = record.price.as_deref().and_then(parse_price) else {
                return false;
            };
            if min_price.is_some_and(|min| price < min) {
                return false;
            }
            if max_price.is_some_and(|max| price > max) {
                return false;
            }
            true
        })
        .collect()
}
