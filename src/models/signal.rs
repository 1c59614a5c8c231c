use serde::{Deserialize, Serialize};

use crate::models::{Reading, Verdict};

/// One categorical reading per tracked indicator. Produced by the
/// technical-analysis collaborator; an all-neutral snapshot is what a data
/// shortage (too few price bars) yields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    #[serde(default)]
    pub rsi: Reading,
    #[serde(default)]
    pub ema: Reading,
    #[serde(default)]
    pub macd: Reading,
    #[serde(default)]
    pub bb: Reading,
    #[serde(default)]
    pub stoch: Reading,
}

/// Outcome of one aggregation pass. Recomputed every cycle, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalResult {
    pub verdict: Verdict,
    /// Agreement among voting indicators, 0..=100.
    pub confidence: f64,
    pub indicators: IndicatorSnapshot,
}
