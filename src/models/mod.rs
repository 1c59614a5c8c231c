pub mod position;
pub mod side;
pub mod signal;

pub use position::{ClosedTrade, DailyMetrics, PortfolioMetrics, Position};
pub use side::{ExitReason, PositionStatus, Reading, Side, Verdict};
pub use signal::{IndicatorSnapshot, SignalResult};
