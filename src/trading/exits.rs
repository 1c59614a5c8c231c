use crate::models::{ExitReason, Position, Side};

/// Check an open position against its stop-loss and take-profit thresholds.
///
/// Stop-loss is checked first; at most one reason is reported per call. The
/// two cannot fire together because stop < entry < target by construction.
pub fn check_exit(position: &Position, current_price: f64) -> Option<ExitReason> {
    match position.side {
        Side::Buy => {
            if current_price <= position.stop_loss {
                Some(ExitReason::StopLoss)
            } else if current_price >= position.take_profit {
                Some(ExitReason::TakeProfit)
            } else {
                None
            }
        }
        Side::Sell => {
            if current_price >= position.stop_loss {
                Some(ExitReason::StopLoss)
            } else if current_price <= position.take_profit {
                Some(ExitReason::TakeProfit)
            } else {
                None
            }
        }
    }
}
