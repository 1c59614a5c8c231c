/// Size a trade so that a stop-out loses at most `risk_pct` percent of
/// equity, independently capped so no single position commits more than
/// `cap_pct` percent of equity at the entry price.
///
/// A degenerate stop (entry == stop) sizes to zero, which refuses the trade.
pub fn position_size(
    equity: f64,
    risk_pct: f64,
    entry_price: f64,
    stop_loss_price: f64,
    cap_pct: f64,
) -> f64 {
    let risk_amount = equity * (risk_pct / 100.0);
    let price_diff = (entry_price - stop_loss_price).abs();
    if price_diff == 0.0 || entry_price <= 0.0 {
        return 0.0;
    }

    let raw_size = risk_amount / price_diff;

    let max_value = equity * (cap_pct / 100.0);
    let max_size = max_value / entry_price;

    raw_size.min(max_size)
}
