use anyhow::{bail, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::info;

use crate::exchange::{Exchange, IndicatorSource};
use crate::models::{IndicatorSnapshot, Side};

/// In-process fill engine for paper trading. Every market order fills
/// immediately at the last known price and gets a synthetic order id.
pub struct PaperExchange {
    balance: f64,
    prices: HashMap<String, f64>,
    order_seq: u64,
}

impl PaperExchange {
    pub fn new(initial_balance: f64) -> Self {
        Self {
            balance: initial_balance,
            prices: HashMap::new(),
            order_seq: 0,
        }
    }

    pub fn set_price(&mut self, symbol: &str, price: f64) {
        self.prices.insert(symbol.to_string(), price);
    }
}

#[async_trait]
impl Exchange for PaperExchange {
    async fn current_price(&mut self, symbol: &str) -> Result<f64> {
        match self.prices.get(symbol) {
            Some(&price) => Ok(price),
            None => bail!("no price available for {symbol}"),
        }
    }

    async fn place_market_order(
        &mut self,
        symbol: &str,
        side: Side,
        amount: f64,
    ) -> Result<String> {
        if amount <= 0.0 {
            bail!("cannot place order for non-positive amount {amount}");
        }
        self.order_seq += 1;
        let order_id = format!("paper-{}", self.order_seq);
        info!("Paper fill: {} {} {:.6} [{}]", side, symbol, amount, order_id);
        Ok(order_id)
    }

    async fn account_equity(&mut self) -> Result<f64> {
        Ok(self.balance)
    }
}

/// Indicator source used when no technical-analysis feed is wired up.
/// All-neutral snapshots cast no votes, so the bot idles safely.
pub struct NeutralIndicators;

#[async_trait]
impl IndicatorSource for NeutralIndicators {
    async fn snapshot(&mut self, _symbol: &str) -> Result<IndicatorSnapshot> {
        Ok(IndicatorSnapshot::default())
    }
}
