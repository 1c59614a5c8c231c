use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{ExitReason, PositionStatus, Side};

/// An open spot position. Exactly one may exist per symbol at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub side: Side,
    pub amount: f64,
    pub entry_price: f64,
    pub current_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub order_id: String,
    pub entry_time: DateTime<Utc>,
    #[serde(default)]
    pub unrealized_pnl: f64,
    pub status: PositionStatus,
}

impl Position {
    /// Mark-to-market PnL at `price` for this position's side and size.
    pub fn pnl_at(&self, price: f64) -> f64 {
        match self.side {
            Side::Buy => (price - self.entry_price) * self.amount,
            Side::Sell => (self.entry_price - price) * self.amount,
        }
    }
}

/// Immutable record written once a position closes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosedTrade {
    pub symbol: String,
    pub side: Side,
    pub entry_price: f64,
    pub exit_price: f64,
    pub amount: f64,
    pub realized_pnl: f64,
    pub pnl_percentage: f64,
    pub exit_reason: ExitReason,
    pub duration_secs: i64,
    pub timestamp: DateTime<Utc>,
}

/// Daily rollup persisted alongside the trade history. `daily_pnl` and
/// `daily_trades` reset whenever `last_reset` falls behind the calendar;
/// `total_pnl` is never reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyMetrics {
    #[serde(default)]
    pub daily_pnl: f64,
    #[serde(default)]
    pub total_pnl: f64,
    #[serde(default)]
    pub daily_trades: u32,
    #[serde(default)]
    pub last_reset: String,
}

impl Default for DailyMetrics {
    fn default() -> Self {
        Self {
            daily_pnl: 0.0,
            total_pnl: 0.0,
            daily_trades: 0,
            last_reset: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    pub account_balance: f64,
    pub total_unrealized_pnl: f64,
    pub total_value: f64,
    pub daily_pnl: f64,
    pub total_pnl: f64,
    pub daily_return: f64,
    pub total_return: f64,
    pub open_positions: usize,
    pub daily_trades: u32,
}
