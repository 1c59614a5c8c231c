use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::Side;

pub type SharedConfig = Arc<RwLock<Config>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Trading universe
    pub symbols: Vec<String>,

    // Paper trading
    pub paper_trade: bool,
    pub investment_amount: f64,

    // Risk
    /// Fraction of equity risked per trade, in percent.
    pub risk_percentage: f64,
    pub stop_loss_percentage: f64,
    pub target_profit_percentage: f64,
    /// Hard cap on capital committed to one position, percent of equity.
    pub position_size_percentage: f64,
    pub max_open_positions: usize,
    pub max_daily_trades: u32,
    /// Daily loss floor, percent of equity (positive number).
    pub max_daily_loss: f64,
    pub min_order_value: f64,

    // Signals
    /// Confidence a verdict must clear before the bot acts on it.
    pub min_confidence: f64,

    // Scheduling
    pub cycle_interval_secs: u64,

    // Persistence & logging
    pub data_dir: String,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let env = |key: &str, default: &str| -> String {
            std::env::var(key).unwrap_or_else(|_| default.to_string())
        };

        let symbols: Vec<String> = env(
            "SYMBOLS",
            "BTC/USDC,ETH/USDC,BNB/USDC,SOL/USDC,XRP/USDC,ADA/USDC",
        )
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

        Config {
            symbols,
            paper_trade: env("PAPER_TRADE", "true").to_lowercase() == "true",
            investment_amount: env("INVESTMENT_AMOUNT", "1000").parse().unwrap_or(1000.0),
            risk_percentage: env("RISK_PERCENTAGE", "2").parse().unwrap_or(2.0),
            stop_loss_percentage: env("STOP_LOSS_PERCENTAGE", "5").parse().unwrap_or(5.0),
            target_profit_percentage: env("TARGET_PROFIT_PERCENTAGE", "30")
                .parse()
                .unwrap_or(30.0),
            position_size_percentage: env("POSITION_SIZE_PERCENTAGE", "20")
                .parse()
                .unwrap_or(20.0),
            max_open_positions: env("MAX_OPEN_POSITIONS", "3").parse().unwrap_or(3),
            max_daily_trades: env("MAX_DAILY_TRADES", "10").parse().unwrap_or(10),
            max_daily_loss: env("MAX_DAILY_LOSS", "5").parse().unwrap_or(5.0),
            min_order_value: env("MIN_ORDER_VALUE", "10").parse().unwrap_or(10.0),
            min_confidence: env("MIN_CONFIDENCE", "40").parse().unwrap_or(40.0),
            cycle_interval_secs: env("CYCLE_INTERVAL_SECS", "300").parse().unwrap_or(300),
            data_dir: env("DATA_DIR", "data"),
            log_level: env("LOG_LEVEL", "INFO"),
        }
    }

    /// Stop-loss price for an entry at `price` on `side`.
    pub fn stop_loss_for(&self, side: Side, price: f64) -> f64 {
        match side {
            Side::Buy => price * (1.0 - self.stop_loss_percentage / 100.0),
            Side::Sell => price * (1.0 + self.stop_loss_percentage / 100.0),
        }
    }

    /// Take-profit price for an entry at `price` on `side`.
    pub fn take_profit_for(&self, side: Side, price: f64) -> f64 {
        match side {
            Side::Buy => price * (1.0 + self.target_profit_percentage / 100.0),
            Side::Sell => price * (1.0 - self.target_profit_percentage / 100.0),
        }
    }

    pub fn shared(self) -> SharedConfig {
        Arc::new(RwLock::new(self))
    }
}
