pub mod exits;
pub mod gate;
pub mod ledger;
pub mod metrics;
pub mod sizer;

pub use gate::TradeRejection;
pub use ledger::{LedgerError, PositionLedger};
pub use metrics::MetricsTracker;
