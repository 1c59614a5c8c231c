use thiserror::Error;

use crate::config::Config;
use crate::models::Side;
use crate::trading::ledger::PositionLedger;

/// Reasons a proposed trade is refused, in the order they are checked.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TradeRejection {
    #[error("maximum open positions reached ({0})")]
    MaxOpenPositions(usize),
    #[error("a position is already open for {0}")]
    PositionExists(String),
    #[error("daily trade limit reached ({0})")]
    DailyTradeLimit(u32),
    #[error("daily loss limit reached ({limit_pct}% of equity)")]
    DailyLossLimit { limit_pct: f64 },
    #[error("order value ${value:.2} below minimum ${min:.2}")]
    OrderTooSmall { value: f64, min: f64 },
    #[error("position size computed as zero (degenerate stop)")]
    ZeroSize,
}

/// Validate a proposed (symbol, side, amount, price) against the risk rules.
///
/// Checks short-circuit in a fixed priority order; the first failure is the
/// reported reason. Exits run through the same gate, except the caller has
/// already established that an open position exists.
pub fn validate(
    cfg: &Config,
    ledger: &PositionLedger,
    equity: f64,
    symbol: &str,
    _side: Side,
    amount: f64,
    price: f64,
) -> Result<(), TradeRejection> {
    if ledger.open_count() >= cfg.max_open_positions {
        return Err(TradeRejection::MaxOpenPositions(cfg.max_open_positions));
    }

    if ledger.has_position(symbol) {
        return Err(TradeRejection::PositionExists(symbol.to_string()));
    }

    if ledger.metrics().daily_trades() >= cfg.max_daily_trades {
        return Err(TradeRejection::DailyTradeLimit(cfg.max_daily_trades));
    }

    // Daily loss floor, expressed as a percentage of current equity.
    if equity > 0.0 {
        let daily_return = ledger.metrics().daily_pnl() / equity * 100.0;
        if daily_return <= -cfg.max_daily_loss {
            return Err(TradeRejection::DailyLossLimit {
                limit_pct: cfg.max_daily_loss,
            });
        }
    }

    let order_value = amount * price;
    if order_value < cfg.min_order_value {
        return Err(TradeRejection::OrderTooSmall {
            value: order_value,
            min: cfg.min_order_value,
        });
    }

    Ok(())
}
