use crate::models::{IndicatorSnapshot, Reading, SignalResult, Side, Verdict};

/// A directional verdict needs at least this many agreeing votes so that no
/// single indicator can trigger a trade on its own.
const MIN_VOTES: u32 = 2;

fn rsi_vote(reading: Reading) -> Option<Side> {
    match reading {
        Reading::Oversold => Some(Side::Buy),
        Reading::Overbought => Some(Side::Sell),
        _ => None,
    }
}

fn trend_vote(reading: Reading) -> Option<Side> {
    match reading {
        Reading::Bullish => Some(Side::Buy),
        Reading::Bearish => Some(Side::Sell),
        _ => None,
    }
}

fn bb_vote(reading: Reading) -> Option<Side> {
    match reading {
        Reading::ExpectedBounce => Some(Side::Buy),
        Reading::Overbought => Some(Side::Sell),
        _ => None,
    }
}

fn stoch_vote(reading: Reading) -> Option<Side> {
    match reading {
        Reading::Oversold => Some(Side::Buy),
        Reading::Overbought => Some(Side::Sell),
        _ => None,
    }
}

/// Combine one snapshot of indicator readings into a directional signal.
///
/// Each indicator casts at most one vote; confidence is the winning side's
/// share of cast votes. A verdict is only issued on a strict majority of at
/// least [`MIN_VOTES`].
pub fn aggregate(snapshot: &IndicatorSnapshot) -> SignalResult {
    let votes = [
        rsi_vote(snapshot.rsi),
        trend_vote(snapshot.ema),
        trend_vote(snapshot.macd),
        bb_vote(snapshot.bb),
        stoch_vote(snapshot.stoch),
    ];

    let buys = votes.iter().filter(|v| **v == Some(Side::Buy)).count() as u32;
    let sells = votes.iter().filter(|v| **v == Some(Side::Sell)).count() as u32;
    let total = buys + sells;

    if total == 0 {
        return SignalResult {
            verdict: Verdict::None,
            confidence: 0.0,
            indicators: *snapshot,
        };
    }

    let confidence = (buys.max(sells) as f64 / total as f64 * 100.0).min(100.0);

    let verdict = if buys > sells && buys >= MIN_VOTES {
        Verdict::Buy
    } else if sells > buys && sells >= MIN_VOTES {
        Verdict::Sell
    } else {
        Verdict::None
    };

    SignalResult {
        verdict,
        confidence: if verdict == Verdict::None { 0.0 } else { confidence },
        indicators: *snapshot,
    }
}
