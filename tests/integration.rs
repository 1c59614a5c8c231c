mod common;

use spot_trading_bot::exchange::{Exchange, PaperExchange};
use spot_trading_bot::models::{ExitReason, Side, Verdict};
use spot_trading_bot::signals;
use spot_trading_bot::trading::{PositionLedger, TradeRejection};

use crate::common::{bearish_snapshot, bullish_snapshot, test_config, test_store};

/// Drive the whole decision path by hand: indicators vote, the signal clears
/// the confidence bar, the entry is sized and gated, the paper order fills,
/// and a later price tick walks the position out at its profit target.
#[tokio::test]
async fn full_pipeline_paper_trading() {
    let cfg = test_config("pipeline");
    let mut market = PaperExchange::new(cfg.investment_amount);
    market.set_price("BTC/USDC", 100.0);
    let mut ledger = PositionLedger::load(test_store("pipeline"));

    let signal = signals::aggregate(&bullish_snapshot());
    assert_eq!(signal.verdict, Verdict::Buy);
    assert!(signal.confidence >= cfg.min_confidence);

    let equity = market.account_equity().await.unwrap();
    let price = market.current_price("BTC/USDC").await.unwrap();

    // equity 1000, risk 2%, stop 5% below 100 => raw 4, exposure cap => 2
    let amount = ledger
        .propose_entry(&cfg, "BTC/USDC", Side::Buy, equity, price)
        .unwrap();
    assert!((amount - 2.0).abs() < 1e-9);

    let order_id = market
        .place_market_order("BTC/USDC", Side::Buy, amount)
        .await
        .unwrap();
    ledger
        .open_position(
            "BTC/USDC",
            Side::Buy,
            amount,
            price,
            cfg.stop_loss_for(Side::Buy, price),
            cfg.take_profit_for(Side::Buy, price),
            order_id,
        )
        .unwrap();
    assert_eq!(ledger.open_count(), 1);

    // In-band move: mark updates, no exit
    market.set_price("BTC/USDC", 110.0);
    let p = market.current_price("BTC/USDC").await.unwrap();
    assert_eq!(ledger.on_price_tick("BTC/USDC", p).unwrap(), None);
    assert!((ledger.total_unrealized_pnl() - 20.0).abs() < 1e-9);

    // Target is 30% above entry
    market.set_price("BTC/USDC", 131.0);
    let p = market.current_price("BTC/USDC").await.unwrap();
    assert_eq!(
        ledger.on_price_tick("BTC/USDC", p).unwrap(),
        Some(ExitReason::TakeProfit)
    );

    let pos = ledger.position("BTC/USDC").unwrap();
    market
        .place_market_order("BTC/USDC", pos.side.closing_side(), pos.amount)
        .await
        .unwrap();
    let record = ledger
        .close_position("BTC/USDC", p, ExitReason::TakeProfit)
        .unwrap();

    assert!((record.realized_pnl - 62.0).abs() < 1e-9);
    assert_eq!(ledger.open_count(), 0);
    assert_eq!(ledger.history().len(), 1);
    assert_eq!(ledger.metrics().daily_trades(), 1);
    assert!((ledger.metrics().daily_pnl() - 62.0).abs() < 1e-9);
}

/// Past the daily loss floor new entries are refused, but an open position
/// must still be allowed to exit.
#[tokio::test]
async fn daily_loss_floor_blocks_entries_not_exits() {
    let cfg = test_config("loss_floor");
    let mut market = PaperExchange::new(cfg.investment_amount);
    market.set_price("BTC/USDC", 100.0);
    market.set_price("ETH/USDC", 50.0);
    let mut ledger = PositionLedger::load(test_store("loss_floor"));

    ledger
        .open_position("BTC/USDC", Side::Buy, 2.0, 100.0, 95.0, 130.0, "p1".into())
        .unwrap();

    // -6% of 1000 equity against a 5% floor
    ledger.metrics_mut().record_close(-60.0);

    let rejection = ledger
        .propose_entry(&cfg, "ETH/USDC", Side::Buy, 1000.0, 50.0)
        .unwrap_err();
    assert!(matches!(rejection, TradeRejection::DailyLossLimit { .. }));

    // The existing position still stops out and closes
    market.set_price("BTC/USDC", 94.0);
    let p = market.current_price("BTC/USDC").await.unwrap();
    assert_eq!(
        ledger.on_price_tick("BTC/USDC", p).unwrap(),
        Some(ExitReason::StopLoss)
    );
    let record = ledger
        .close_position("BTC/USDC", p, ExitReason::StopLoss)
        .unwrap();
    assert!(record.realized_pnl < 0.0);
    assert_eq!(ledger.open_count(), 0);
}

/// An opposite directional signal over an open long flattens it.
#[tokio::test]
async fn opposite_signal_flattens_open_long() {
    let cfg = test_config("opposite");
    let mut market = PaperExchange::new(cfg.investment_amount);
    market.set_price("BTC/USDC", 100.0);
    let mut ledger = PositionLedger::load(test_store("opposite"));

    ledger
        .open_position("BTC/USDC", Side::Buy, 2.0, 100.0, 95.0, 130.0, "p1".into())
        .unwrap();

    let signal = signals::aggregate(&bearish_snapshot());
    assert_eq!(signal.verdict, Verdict::Sell);
    assert!(signal.confidence >= cfg.min_confidence);

    let pos = ledger.position("BTC/USDC").unwrap();
    assert_ne!(Some(pos.side), signal.verdict.to_side());

    market.set_price("BTC/USDC", 104.0);
    let p = market.current_price("BTC/USDC").await.unwrap();
    market
        .place_market_order("BTC/USDC", pos.side.closing_side(), pos.amount)
        .await
        .unwrap();
    let record = ledger
        .close_position("BTC/USDC", p, ExitReason::OppositeSignal)
        .unwrap();

    assert_eq!(record.exit_reason, ExitReason::OppositeSignal);
    assert!((record.realized_pnl - 8.0).abs() < 1e-9);
    assert_eq!(ledger.open_count(), 0);
}

/// A restart reloads open positions, history, and lifetime PnL from disk.
#[tokio::test]
async fn restart_recovers_persisted_state() {
    let store = test_store("restart");

    {
        let mut ledger = PositionLedger::load(store.clone());
        ledger
            .open_position("ETH/USDC", Side::Buy, 1.0, 50.0, 47.5, 65.0, "p1".into())
            .unwrap();
        ledger
            .open_position("BTC/USDC", Side::Buy, 2.0, 100.0, 95.0, 130.0, "p2".into())
            .unwrap();
        ledger.on_price_tick("BTC/USDC", 102.0).unwrap();
        ledger
            .close_position("ETH/USDC", 55.0, ExitReason::Manual)
            .unwrap();
    }

    let ledger = PositionLedger::load(store);
    assert_eq!(ledger.open_count(), 1);
    let pos = ledger.position("BTC/USDC").unwrap();
    assert_eq!(pos.current_price, 102.0);
    assert_eq!(ledger.history().len(), 1);
    assert_eq!(ledger.history()[0].symbol, "ETH/USDC");
    assert!((ledger.metrics().total_pnl() - 5.0).abs() < 1e-9);
    assert_eq!(ledger.metrics().daily_trades(), 1);
}
