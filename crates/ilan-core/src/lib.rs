//! Ilan Core - Foundation crate for the ilan listing scraper.
//!
//! This crate provides the shared types, configuration management and
//! CSS selector table that the browser, scraper and export crates
//! depend on.
//!
//! # Modules
//!
//! - [`error`] - Configuration error types using thiserror
//! - [`config`] - TOML-based configuration with `SAHIBI_*` env overrides
//! - [`selectors`] - Logical field name to CSS selector mapping
//! - [`types`] - Shared types (`ListingRecord`, `PageRequest`, `StatsSnapshot`)
//! - [`url_builder`] - Category/listing URL construction with Turkish
//!   character encoding

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
#[allow(missing_docs)]
pub mod selectors;
pub mod types;
#[allow(missing_docs)]
pub mod url_builder;

// Re-export commonly used types
pub use config::{
    BrowserSettings, ExportSettings, ScraperConfig, ScrapingSettings, SiteSettings,
    TimingSettings,
};
pub use error::{ConfigError, ConfigResult};
pub use selectors::FieldSelectors;
pub use types::{ListingRecord, PageRequest, StatsSnapshot};
pub use url_builder::{build_category_url, build_paginated_url, Category};
