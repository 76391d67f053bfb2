//! Prometheus metrics exporter for CoinMarketCap ticker data.
//!
//! Every scrape of `/metrics` fetches the ticker API (or a local fixture
//! file), decodes the payload and renders it in the Prometheus text
//! exposition format. Nothing is cached between scrapes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐
//! │   DataSource    │────>│     Scraper     │────>│   HTTP Server   │
//! │ (API / fixture) │     │ (parse, render) │     │   (/metrics)    │
//! └─────────────────┘     └─────────────────┘     └─────────────────┘
//! ```
//!
//! # Usage
//!
//! ```bash
//! coinmarketcap-exporter --config config.json5
//! TEST_MODE=1 coinmarketcap-exporter   # serve ./test.json instead
//! ```
//!
//! # Configuration
//!
//! See [`config::ExporterConfig`] for configuration options.

pub mod config;
pub mod error;
pub mod exposition;
pub mod http;
pub mod numeric;
pub mod scrape;
pub mod source;
pub mod ticker;

pub use config::ExporterConfig;
pub use error::{FetchError, ScrapeError};
pub use http::HttpServer;
pub use scrape::{ScrapeResult, Scraper, SharedScraper};
pub use source::DataSource;
pub use ticker::{CoinRecord, CoinSnapshot};
