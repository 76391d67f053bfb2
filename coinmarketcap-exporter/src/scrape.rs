//! Per-request scrape pipeline: fetch, parse, convert, render.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::ScrapeError;
use crate::exposition::{COIN_METRIC_COUNT, COIN_METRICS, UP_METRIC, write_line};
use crate::numeric::{DEFAULT_PRECISION, format_float};
use crate::source::DataSource;
use crate::ticker::{self, CoinSnapshot};

/// Outcome of one scrape.
///
/// `up` is true only when fetch, parse and numeric conversion all
/// succeeded. Coins keep the order the upstream returned them in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapeResult {
    pub up: bool,
    pub coins: Vec<CoinSnapshot>,
}

impl ScrapeResult {
    /// An available result carrying `coins`.
    pub fn available(coins: Vec<CoinSnapshot>) -> Self {
        Self { up: true, coins }
    }

    /// An unavailable result with no coins.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Render the result in Prometheus exposition format.
    pub fn render(&self) -> String {
        let mut output = String::with_capacity(32 + self.coins.len() * COIN_METRIC_COUNT * 96);

        write_line(&mut output, UP_METRIC, &[], if self.up { "1" } else { "0" });

        for coin in &self.coins {
            let labels = [
                ("id", coin.id.as_str()),
                ("name", coin.name.as_str()),
                ("symbol", coin.symbol.as_str()),
            ];
            for (name, value) in COIN_METRICS.iter().zip(coin_values(coin)) {
                write_line(&mut output, name, &labels, &value);
            }
        }

        output
    }
}

/// Formatted values in `COIN_METRICS` order.
fn coin_values(coin: &CoinSnapshot) -> [String; COIN_METRIC_COUNT] {
    let f = |v: f64| format_float(v, DEFAULT_PRECISION);
    [
        coin.rank.to_string(),
        f(coin.price_usd),
        f(coin.price_btc),
        f(coin.price_eur),
        f(coin.volume_usd_24h),
        f(coin.volume_eur_24h),
        f(coin.market_cap_usd),
        f(coin.market_cap_eur),
        f(coin.available_supply),
        f(coin.total_supply),
        f(coin.percent_change_1h),
        f(coin.percent_change_24h),
        f(coin.percent_change_7d),
        coin.last_updated.to_string(),
    ]
}

/// Runs the scrape pipeline against a fixed data source.
///
/// Holds no mutable state; concurrent scrapes are independent.
#[derive(Debug)]
pub struct Scraper {
    source: DataSource,
}

impl Scraper {
    pub fn new(source: DataSource) -> Self {
        Self { source }
    }

    /// Run one scrape. Failures are logged and reported as unavailable.
    pub async fn scrape(&self) -> ScrapeResult {
        let result = match self.try_scrape().await {
            Ok(coins) => ScrapeResult::available(coins),
            Err(e) => {
                warn!(error = %e, "Scrape failed");
                ScrapeResult::unavailable()
            }
        };

        debug!(up = result.up, coins = result.coins.len(), "Scrape complete");
        result
    }

    /// Fetch, decode and convert, stopping at the first failure.
    pub async fn try_scrape(&self) -> Result<Vec<CoinSnapshot>, ScrapeError> {
        let payload = self.source.fetch().await?;
        let records = ticker::parse(&payload)?;
        records.iter().map(|r| r.to_snapshot()).collect()
    }
}

/// Create a shareable scraper handle.
pub type SharedScraper = Arc<Scraper>;
