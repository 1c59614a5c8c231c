pub mod paper;

pub use paper::{NeutralIndicators, PaperExchange};

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{IndicatorSnapshot, Side};

/// Order placement and account queries. Timeouts and retries are the
/// implementation's concern; each call is an atomic request with a
/// success/failure outcome.
#[async_trait]
pub trait Exchange: Send + Sync {
    async fn current_price(&mut self, symbol: &str) -> Result<f64>;
    /// Returns the broker order id on success.
    async fn place_market_order(&mut self, symbol: &str, side: Side, amount: f64)
        -> Result<String>;
    async fn account_equity(&mut self) -> Result<f64>;
}

/// Source of categorical indicator readings. A data shortage yields an
/// all-neutral snapshot, which casts no votes.
#[async_trait]
pub trait IndicatorSource: Send + Sync {
    async fn snapshot(&mut self, symbol: &str) -> Result<IndicatorSnapshot>;
}
