use anyhow::Result;
use tracing::{debug, error, info, warn};

use spot_trading_bot::config::{Config, SharedConfig};
use spot_trading_bot::exchange::{Exchange, IndicatorSource};
use spot_trading_bot::models::{ExitReason, Side};
use spot_trading_bot::persistence::StateStore;
use spot_trading_bot::signals;
use spot_trading_bot::trading::PositionLedger;

pub struct TradingBot {
    config: SharedConfig,
    market: Box<dyn Exchange>,
    indicators: Box<dyn IndicatorSource>,
    ledger: PositionLedger,
}

impl TradingBot {
    pub async fn new(
        config: SharedConfig,
        market: Box<dyn Exchange>,
        indicators: Box<dyn IndicatorSource>,
    ) -> Self {
        let cfg = config.read().await;

        info!("{}", "=".repeat(60));
        info!("Spot trading bot starting up");
        info!(
            "Mode: {}",
            if cfg.paper_trade {
                "PAPER TRADING"
            } else {
                "LIVE TRADING"
            }
        );
        info!("Symbols: {}", cfg.symbols.join(", "));
        info!(
            "Risk: {}% per trade | stop {}% | target {}% | max {} positions",
            cfg.risk_percentage,
            cfg.stop_loss_percentage,
            cfg.target_profit_percentage,
            cfg.max_open_positions
        );
        info!("{}", "=".repeat(60));

        let store = StateStore::new(cfg.data_dir.as_str());
        let ledger = PositionLedger::load(store);
        if ledger.open_count() > 0 {
            info!(
                "Recovered {} open position(s): {}",
                ledger.open_count(),
                ledger.open_symbols().join(", ")
            );
        }

        drop(cfg);

        Self {
            config,
            market,
            indicators,
            ledger,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        info!("Bot is now running. Press Ctrl+C to stop.");
        self.print_status().await;

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    self.shutdown().await;
                    return Ok(());
                }
                _ = self.tick() => {}
            }
        }
    }

    async fn tick(&mut self) {
        self.run_cycle().await;
        let interval = self.config.read().await.cycle_interval_secs;
        tokio::time::sleep(tokio::time::Duration::from_secs(interval)).await;
    }

    /// One full decision/exit cycle across all configured symbols.
    pub async fn run_cycle(&mut self) {
        let cfg = self.config.read().await.clone();
        self.ledger.metrics_mut().roll_day();

        let equity = match self.market.account_equity().await {
            Ok(e) => e,
            Err(e) => {
                error!("Equity fetch failed, skipping cycle: {:#}", e);
                return;
            }
        };

        // The daily loss floor blocks new entries only; open positions are
        // still monitored and may exit.
        let entries_blocked =
            equity > 0.0 && self.ledger.metrics().daily_pnl() / equity * 100.0 <= -cfg.max_daily_loss;
        if entries_blocked {
            warn!(
                "Daily loss limit reached ({:.2}%); new entries suspended",
                cfg.max_daily_loss
            );
        }

        for symbol in &cfg.symbols {
            if let Err(e) = self
                .analyze_symbol(symbol, equity, entries_blocked, &cfg)
                .await
            {
                error!("Error analyzing {}: {:#}", symbol, e);
            }
        }

        self.monitor_positions().await;
    }

    async fn analyze_symbol(
        &mut self,
        symbol: &str,
        equity: f64,
        entries_blocked: bool,
        cfg: &Config,
    ) -> Result<()> {
        let snapshot = self.indicators.snapshot(symbol).await?;
        let signal = signals::aggregate(&snapshot);
        debug!(
            "{}: verdict={} confidence={:.1}% [rsi={} ema={} macd={} bb={} stoch={}]",
            symbol,
            signal.verdict,
            signal.confidence,
            snapshot.rsi,
            snapshot.ema,
            snapshot.macd,
            snapshot.bb,
            snapshot.stoch
        );

        let side = match signal.verdict.to_side() {
            Some(s) => s,
            None => return Ok(()),
        };
        if signal.confidence < cfg.min_confidence {
            return Ok(());
        }

        let price = self.market.current_price(symbol).await?;

        // An opposite directional signal above the action threshold flattens
        // the open position.
        if let Some(pos) = self.ledger.position(symbol) {
            if pos.side == side {
                return Ok(());
            }
            let (close_side, amount) = (pos.side.closing_side(), pos.amount);
            info!(
                "Opposite signal for {} ({} @ {:.1}%), closing position",
                symbol, signal.verdict, signal.confidence
            );
            self.market
                .place_market_order(symbol, close_side, amount)
                .await?;
            if let Err(e) = self
                .ledger
                .close_position(symbol, price, ExitReason::OppositeSignal)
            {
                error!("Close after opposite signal failed for {}: {}", symbol, e);
            }
            return Ok(());
        }

        // Spot universe: fresh entries are always buys.
        if side == Side::Sell {
            return Ok(());
        }
        if entries_blocked {
            debug!("Entry signal for {} ignored, entries suspended", symbol);
            return Ok(());
        }

        match self
            .ledger
            .propose_entry(cfg, symbol, Side::Buy, equity, price)
        {
            Ok(amount) => {
                info!(
                    "ENTRY SIGNAL: {} buy {:.6} @ {:.4} (confidence {:.1}%)",
                    symbol, amount, price, signal.confidence
                );
                // The ledger only commits after the order is confirmed.
                let order_id = self
                    .market
                    .place_market_order(symbol, Side::Buy, amount)
                    .await?;
                let stop = cfg.stop_loss_for(Side::Buy, price);
                let target = cfg.take_profit_for(Side::Buy, price);
                if let Err(e) = self
                    .ledger
                    .open_position(symbol, Side::Buy, amount, price, stop, target, order_id)
                {
                    error!("Ledger refused confirmed entry for {}: {}", symbol, e);
                }
            }
            Err(reason) => {
                info!("Entry for {} rejected: {}", symbol, reason);
            }
        }

        Ok(())
    }

    /// Walk open positions, update marks, and execute stop/target exits.
    async fn monitor_positions(&mut self) {
        for symbol in self.ledger.open_symbols() {
            let price = match self.market.current_price(&symbol).await {
                Ok(p) => p,
                Err(e) => {
                    error!("Price check failed for {}: {:#}", symbol, e);
                    continue;
                }
            };

            let action = match self.ledger.on_price_tick(&symbol, price) {
                Ok(a) => a,
                Err(e) => {
                    error!("Tick failed for {}: {}", symbol, e);
                    continue;
                }
            };
            let Some(reason) = action else { continue };

            let Some(pos) = self.ledger.position(&symbol) else {
                continue;
            };
            let (close_side, amount) = (pos.side.closing_side(), pos.amount);

            match self
                .market
                .place_market_order(&symbol, close_side, amount)
                .await
            {
                Ok(_) => {
                    if let Err(e) = self.ledger.close_position(&symbol, price, reason) {
                        error!("Close failed for {}: {}", symbol, e);
                    }
                }
                Err(e) => {
                    // Position stays open; the next cycle sees it again.
                    error!("Exit order failed for {} ({}): {:#}", symbol, reason, e);
                }
            }
        }
    }

    async fn shutdown(&mut self) {
        info!("Shutting down...");

        for symbol in self.ledger.open_symbols() {
            let price = match self.market.current_price(&symbol).await {
                Ok(p) => p,
                Err(e) => {
                    error!("Cannot price {} for shutdown close: {:#}", symbol, e);
                    continue;
                }
            };
            let Some(pos) = self.ledger.position(&symbol) else {
                continue;
            };
            let (close_side, amount) = (pos.side.closing_side(), pos.amount);
            match self
                .market
                .place_market_order(&symbol, close_side, amount)
                .await
            {
                Ok(_) => {
                    if let Err(e) =
                        self.ledger
                            .close_position(&symbol, price, ExitReason::Shutdown)
                    {
                        error!("Shutdown close failed for {}: {}", symbol, e);
                    }
                }
                Err(e) => error!("Shutdown exit order failed for {}: {:#}", symbol, e),
            }
        }

        self.print_status().await;
        info!("Bot stopped.");
    }

    async fn print_status(&mut self) {
        let equity = self.market.account_equity().await.unwrap_or(0.0);
        let pm = self.ledger.metrics().portfolio_metrics(
            equity,
            self.ledger.total_unrealized_pnl(),
            self.ledger.open_count(),
        );

        info!("Balance: ${:.2} | Total value: ${:.2}", pm.account_balance, pm.total_value);
        info!(
            "Daily PnL: ${:+.2} ({:+.2}%) | Total PnL: ${:+.2} ({:+.2}%)",
            pm.daily_pnl, pm.daily_return, pm.total_pnl, pm.total_return
        );
        info!(
            "Open positions: {} | Trades today: {}",
            pm.open_positions, pm.daily_trades
        );
    }
}
