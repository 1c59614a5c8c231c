use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }

    /// The order side that flattens a position opened on this side.
    pub fn closing_side(&self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Buy,
    Sell,
    None,
}

impl Verdict {
    pub fn to_side(self) -> Option<Side> {
        match self {
            Verdict::Buy => Some(Side::Buy),
            Verdict::Sell => Some(Side::Sell),
            Verdict::None => None,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Buy => write!(f, "buy"),
            Verdict::Sell => write!(f, "sell"),
            Verdict::None => write!(f, "none"),
        }
    }
}

/// Categorical indicator reading supplied by the technical-analysis layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reading {
    Bullish,
    Bearish,
    Neutral,
    Oversold,
    Overbought,
    ExpectedBounce,
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Bullish => write!(f, "bullish"),
            Reading::Bearish => write!(f, "bearish"),
            Reading::Neutral => write!(f, "neutral"),
            Reading::Oversold => write!(f, "oversold"),
            Reading::Overbought => write!(f, "overbought"),
            Reading::ExpectedBounce => write!(f, "expected_bounce"),
        }
    }
}

impl Default for Reading {
    fn default() -> Self {
        Reading::Neutral
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionStatus {
    Open,
    Closed,
}

impl fmt::Display for PositionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionStatus::Open => write!(f, "open"),
            PositionStatus::Closed => write!(f, "closed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    StopLoss,
    TakeProfit,
    OppositeSignal,
    Manual,
    Shutdown,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::StopLoss => write!(f, "stop_loss"),
            ExitReason::TakeProfit => write!(f, "take_profit"),
            ExitReason::OppositeSignal => write!(f, "opposite_signal"),
            ExitReason::Manual => write!(f, "manual"),
            ExitReason::Shutdown => write!(f, "shutdown"),
        }
    }
}
