use std::path::PathBuf;

use spot_trading_bot::config::Config;
use spot_trading_bot::models::{IndicatorSnapshot, Reading};
use spot_trading_bot::persistence::StateStore;

/// Per-test data directory so persisted state never leaks between tests.
pub fn test_data_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("spot_bot_integ_{}_{}", std::process::id(), name));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

pub fn test_store(name: &str) -> StateStore {
    StateStore::new(test_data_dir(name))
}

pub fn test_config(name: &str) -> Config {
    Config {
        symbols: vec!["BTC/USDC".to_string(), "ETH/USDC".to_string()],
        paper_trade: true,
        investment_amount: 1000.0,
        risk_percentage: 2.0,
        stop_loss_percentage: 5.0,
        target_profit_percentage: 30.0,
        position_size_percentage: 20.0,
        max_open_positions: 3,
        max_daily_trades: 10,
        max_daily_loss: 5.0,
        min_order_value: 10.0,
        min_confidence: 40.0,
        cycle_interval_secs: 1,
        data_dir: test_data_dir(name).to_string_lossy().to_string(),
        log_level: "ERROR".to_string(),
    }
}

/// Four of five indicators agreeing on buy.
pub fn bullish_snapshot() -> IndicatorSnapshot {
    IndicatorSnapshot {
        rsi: Reading::Oversold,
        ema: Reading::Bullish,
        macd: Reading::Bullish,
        bb: Reading::ExpectedBounce,
        stoch: Reading::Neutral,
    }
}

/// Four of five indicators agreeing on sell.
pub fn bearish_snapshot() -> IndicatorSnapshot {
    IndicatorSnapshot {
        rsi: Reading::Overbought,
        ema: Reading::Bearish,
        macd: Reading::Bearish,
        bb: Reading::Overbought,
        stoch: Reading::Neutral,
    }
}
