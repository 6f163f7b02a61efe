//! Example: scrape a few pages of apartment listings and export them.
//!
//! Requires a local Chrome/Chromium install. Configuration comes from
//! the default config file plus `SAHIBI_*` environment variables, e.g.
//! `SAHIBI_HEADLESS=false SAHIBI_MAX_PAGES=2 cargo run --example scrape-listings`.

use ilan_core::{build_category_url, Category, ScraperConfig};
use ilan_export::{export_records, timestamped_path, ExportFormat};
use ilan_scraper::{clean_records, remove_duplicates, scrape_site};
use std::path::Path;
use std::str::FromStr;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = ScraperConfig::load_with_env()?;
    let page_count = config.scraping.default_max_pages;

    let url = build_category_url(&config.site.base_url, Category::KiralikDaire, Some("kadıköy"));
    println!("Scraping {} pages of {}\n", page_count, url);

    let report = scrape_site(&config, &url, page_count).await?;

    println!("Pages scraped:          {}", report.stats.pages_scraped);
    println!("Listings found:         {}", report.stats.listings_found);
    println!("Incomplete (dropped):   {}", report.stats.failed_extractions);
    if !report.failed_pages.is_empty() {
        println!("Failed pages:           {:?}", report.failed_pages);
    }

    let mut records = report.records;
    clean_records(&mut records);
    let records = remove_duplicates(records);

    for record in records.iter().take(5) {
        println!(
            "\n  • {}\n    {} — {}",
            record.title.as_deref().unwrap_or("(untitled)"),
            record.price.as_deref().unwrap_or("?"),
            record.location.as_deref().unwrap_or("?"),
        );
    }

    let format = ExportFormat::from_str(&config.export.default_format)?;
    let path = timestamped_path(Path::new(&config.export.directory), format);
    export_records(&records, &path, format)?;
    println!("\nExported {} records to {}", records.len(), path.display());

    Ok(())
}
