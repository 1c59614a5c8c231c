use std::path::PathBuf;

use crate::config::Config;
use crate::models::{IndicatorSnapshot, Reading, Side};
use crate::persistence::StateStore;
use crate::trading::PositionLedger;

/// A per-test data directory so persisted state never leaks between tests.
pub fn unique_test_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("spot_bot_test_{}_{}", std::process::id(), name))
}

pub fn test_store(name: &str) -> StateStore {
    let dir = unique_test_dir(name);
    let _ = std::fs::remove_dir_all(&dir);
    StateStore::new(dir)
}

pub fn test_ledger(name: &str) -> PositionLedger {
    PositionLedger::load(test_store(name))
}

pub fn open_test_position(ledger: &mut PositionLedger, symbol: &str, side: Side, entry: f64) {
    let (sl, tp) = match side {
        Side::Buy => (entry * 0.95, entry * 1.30),
        Side::Sell => (entry * 1.05, entry * 0.70),
    };
    ledger
        .open_position(symbol, side, 1.0, entry, sl, tp, format!("test-{symbol}"))
        .unwrap();
}

pub fn make_snapshot(
    rsi: Reading,
    ema: Reading,
    macd: Reading,
    bb: Reading,
    stoch: Reading,
) -> IndicatorSnapshot {
    IndicatorSnapshot {
        rsi,
        ema,
        macd,
        bb,
        stoch,
    }
}

/// A Config suitable for testing: paper mode, small universe, temp data dir.
pub fn default_test_config() -> Config {
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
        data_dir: unique_test_dir("default_cfg").to_string_lossy().to_string(),
        log_level: "ERROR".to_string(),
    }
}
