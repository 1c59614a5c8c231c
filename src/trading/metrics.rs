use chrono::{NaiveDate, Utc};
use tracing::{error, info};

use crate::models::{DailyMetrics, PortfolioMetrics};
use crate::persistence::StateStore;

/// Accumulates realized PnL into daily and total figures.
///
/// The daily bucket resets whenever the persisted `last_reset` date falls
/// behind the current calendar date; `total_pnl` is never reset. Every
/// mutation is persisted immediately so the monitoring process stays current.
pub struct MetricsTracker {
    metrics: DailyMetrics,
    store: StateStore,
    /// When set, used instead of today's date (backtesting and tests).
    pub sim_date: Option<NaiveDate>,
}

impl MetricsTracker {
    pub fn load(store: StateStore) -> Self {
        let metrics = store.load_metrics();
        let mut tracker = Self {
            metrics,
            store,
            sim_date: None,
        };
        tracker.roll_day();
        tracker
    }

    fn today(&self) -> String {
        self.sim_date
            .unwrap_or_else(|| Utc::now().date_naive())
            .format("%Y-%m-%d")
            .to_string()
    }

    /// Zero the daily bucket if the calendar has moved on since the last
    /// persisted reset.
    pub fn roll_day(&mut self) {
        let today = self.today();
        if self.metrics.last_reset != today {
            if !self.metrics.last_reset.is_empty() {
                info!(
                    "Daily metrics reset ({} -> {})",
                    self.metrics.last_reset, today
                );
            }
            self.metrics.daily_pnl = 0.0;
            self.metrics.daily_trades = 0;
            self.metrics.last_reset = today;
            self.persist();
        }
    }

    pub fn record_close(&mut self, realized_pnl: f64) {
        self.roll_day();
        self.metrics.daily_pnl += realized_pnl;
        self.metrics.total_pnl += realized_pnl;
        self.metrics.daily_trades += 1;
        self.persist();
    }

    pub fn daily_pnl(&self) -> f64 {
        self.metrics.daily_pnl
    }

    pub fn total_pnl(&self) -> f64 {
        self.metrics.total_pnl
    }

    pub fn daily_trades(&self) -> u32 {
        self.metrics.daily_trades
    }

    pub fn portfolio_metrics(
        &self,
        account_balance: f64,
        total_unrealized_pnl: f64,
        open_positions: usize,
    ) -> PortfolioMetrics {
        let pct = |pnl: f64| {
            if account_balance > 0.0 {
                pnl / account_balance * 100.0
            } else {
                0.0
            }
        };

        PortfolioMetrics {
            account_balance,
            total_unrealized_pnl,
            total_value: account_balance + total_unrealized_pnl,
            daily_pnl: self.metrics.daily_pnl,
            total_pnl: self.metrics.total_pnl,
            daily_return: pct(self.metrics.daily_pnl),
            total_return: pct(self.metrics.total_pnl),
            open_positions,
            daily_trades: self.metrics.daily_trades,
        }
    }

    fn persist(&self) {
        if let Err(e) = self.store.save_metrics(&self.metrics) {
            error!("Failed to persist daily metrics: {:#}", e);
        }
    }
}
