use chrono::{DateTime, Utc};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{error, info};

use crate::config::Config;
use crate::models::{ClosedTrade, ExitReason, Position, PositionStatus, Side};
use crate::persistence::StateStore;
use crate::trading::exits::check_exit;
use crate::trading::gate::{self, TradeRejection};
use crate::trading::metrics::MetricsTracker;
use crate::trading::sizer::position_size;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("no open position for {0}")]
    PositionNotFound(String),
    #[error("a position is already open for {0}")]
    PositionExists(String),
}

/// Authoritative in-memory set of open positions plus the closed-trade
/// history, backed by the crash-safe [`StateStore`].
///
/// The ledger never speculatively commits a transition: callers invoke
/// `open_position`/`close_position` only after the exchange has confirmed
/// the corresponding order.
pub struct PositionLedger {
    positions: HashMap<String, Position>,
    history: Vec<ClosedTrade>,
    metrics: MetricsTracker,
    store: StateStore,
    /// When set, used instead of Utc::now() for timestamps (backtesting).
    pub sim_time: Option<DateTime<Utc>>,
}

impl PositionLedger {
    pub fn load(store: StateStore) -> Self {
        let mut positions = store.load_positions();
        // A persisted entry that is not open is stale state from an
        // interrupted close; drop it rather than resurrect it.
        positions.retain(|symbol, p| {
            if p.status != PositionStatus::Open {
                info!("Dropping stale non-open position for {}", symbol);
                return false;
            }
            true
        });

        let history = store.load_trades();
        let metrics = MetricsTracker::load(store.clone());

        Self {
            positions,
            history,
            metrics,
            store,
            sim_time: None,
        }
    }

    fn now(&self) -> DateTime<Utc> {
        self.sim_time.unwrap_or_else(Utc::now)
    }

    pub fn open_count(&self) -> usize {
        self.positions.len()
    }

    pub fn has_position(&self, symbol: &str) -> bool {
        self.positions.contains_key(symbol)
    }

    pub fn position(&self, symbol: &str) -> Option<&Position> {
        self.positions.get(symbol)
    }

    pub fn open_symbols(&self) -> Vec<String> {
        self.positions.keys().cloned().collect()
    }

    pub fn history(&self) -> &[ClosedTrade] {
        &self.history
    }

    pub fn metrics(&self) -> &MetricsTracker {
        &self.metrics
    }

    pub fn metrics_mut(&mut self) -> &mut MetricsTracker {
        &mut self.metrics
    }

    /// Sum of mark-to-market PnL across all open positions.
    pub fn total_unrealized_pnl(&self) -> f64 {
        self.positions.values().map(|p| p.unrealized_pnl).sum()
    }

    /// Size and validate a candidate entry. Returns the accepted amount.
    pub fn propose_entry(
        &self,
        cfg: &Config,
        symbol: &str,
        side: Side,
        equity: f64,
        price: f64,
    ) -> Result<f64, TradeRejection> {
        let stop = cfg.stop_loss_for(side, price);
        let amount = position_size(
            equity,
            cfg.risk_percentage,
            price,
            stop,
            cfg.position_size_percentage,
        );
        if amount <= 0.0 {
            return Err(TradeRejection::ZeroSize);
        }
        gate::validate(cfg, self, equity, symbol, side, amount, price)?;
        Ok(amount)
    }

    /// none -> open. Caller supplies the confirmed broker order id.
    #[allow(clippy::too_many_arguments)]
    pub fn open_position(
        &mut self,
        symbol: &str,
        side: Side,
        amount: f64,
        entry_price: f64,
        stop_loss: f64,
        take_profit: f64,
        order_id: String,
    ) -> Result<&Position, LedgerError> {
        if self.positions.contains_key(symbol) {
            return Err(LedgerError::PositionExists(symbol.to_string()));
        }

        let position = Position {
            symbol: symbol.to_string(),
            side,
            amount,
            entry_price,
            current_price: entry_price,
            stop_loss,
            take_profit,
            order_id,
            entry_time: self.now(),
            unrealized_pnl: 0.0,
            status: PositionStatus::Open,
        };

        info!(
            "Position opened: {} {} {:.6} @ {:.4} (sl {:.4} / tp {:.4})",
            symbol, side, amount, entry_price, stop_loss, take_profit
        );

        self.positions.insert(symbol.to_string(), position);
        self.persist_positions();
        Ok(&self.positions[symbol])
    }

    /// open -> open price update; recomputes unrealized PnL.
    pub fn update_price(&mut self, symbol: &str, current_price: f64) -> Result<(), LedgerError> {
        let position = self
            .positions
            .get_mut(symbol)
            .ok_or_else(|| LedgerError::PositionNotFound(symbol.to_string()))?;
        position.current_price = current_price;
        position.unrealized_pnl = position.pnl_at(current_price);
        self.persist_positions();
        Ok(())
    }

    /// Price update plus exit-threshold check. Reports at most one action and
    /// does not itself change lifecycle state.
    pub fn on_price_tick(
        &mut self,
        symbol: &str,
        current_price: f64,
    ) -> Result<Option<ExitReason>, LedgerError> {
        self.update_price(symbol, current_price)?;
        let position = &self.positions[symbol];
        Ok(check_exit(position, current_price))
    }

    /// open -> closed. Computes realized PnL, appends the trade record
    /// (newest first, deduplicated by timestamp), updates metrics, persists.
    pub fn close_position(
        &mut self,
        symbol: &str,
        exit_price: f64,
        reason: ExitReason,
    ) -> Result<ClosedTrade, LedgerError> {
        let position = self
            .positions
            .remove(symbol)
            .ok_or_else(|| LedgerError::PositionNotFound(symbol.to_string()))?;

        let realized_pnl = position.pnl_at(exit_price);
        let entry_value = position.entry_price * position.amount;
        let pnl_percentage = if entry_value > 0.0 {
            realized_pnl / entry_value * 100.0
        } else {
            0.0
        };
        let now = self.now();

        let record = ClosedTrade {
            symbol: position.symbol.clone(),
            side: position.side,
            entry_price: position.entry_price,
            exit_price,
            amount: position.amount,
            realized_pnl,
            pnl_percentage,
            exit_reason: reason,
            duration_secs: (now - position.entry_time).num_seconds(),
            timestamp: now,
        };

        info!(
            "Position closed: {} ({}) PnL {:+.2} | {:.4} -> {:.4}",
            symbol, reason, realized_pnl, position.entry_price, exit_price
        );

        if !self.history.iter().any(|t| t.timestamp == record.timestamp) {
            self.history.insert(0, record.clone());
        }

        self.metrics.record_close(realized_pnl);
        self.persist_positions();
        if let Err(e) = self.store.save_trades(&self.history) {
            error!("Failed to persist trade history: {:#}", e);
        }

        Ok(record)
    }

    fn persist_positions(&self) {
        if let Err(e) = self.store.save_positions(&self.positions) {
            error!("Failed to persist open positions: {:#}", e);
        }
    }
}
