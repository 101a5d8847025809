//! Per-outcome price statistics across bookmakers.

use serde::{Deserialize, Serialize};

use super::round_dp;
use crate::types::{Outcome, Quote, Triple};

/// Average, best, worst, and spread of the quoted prices, per outcome.
///
/// An outcome nobody quotes reports `0` everywhere.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregateStats {
    pub average: Triple<f64>,
    pub best: Triple<f64>,
    pub worst: Triple<f64>,
    pub spread: Triple<f64>,
    /// Number of bookmakers quoting the home side.
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Summary {
    average: f64,
    best: f64,
    worst: f64,
    spread: f64,
}

/// Split quotes into one price column per outcome, skipping gaps.
pub fn price_columns(quotes: &[Quote]) -> Triple<Vec<f64>> {
    Triple::from_fn(|outcome| quotes.iter().filter_map(|q| q.price(outcome)).collect())
}

/// Compute stats over already-sanitised quotes.
pub fn compute(quotes: &[Quote]) -> AggregateStats {
    let columns = price_columns(quotes);
    let summaries = Triple::from_fn(|outcome| summarise(columns.get(outcome)));

    AggregateStats {
        average: summaries.map(|s| s.average),
        best: summaries.map(|s| s.best),
        worst: summaries.map(|s| s.worst),
        spread: summaries.map(|s| s.spread),
        count: columns.get(Outcome::Home).len(),
    }
}

fn summarise(prices: &[f64]) -> Summary {
    if prices.is_empty() {
        return Summary::default();
    }

    let best = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let worst = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let mean = prices.iter().sum::<f64>() / prices.len() as f64;

    // Rounding may push the mean past an unrounded extreme.
    let average = round_dp(mean, 2).clamp(worst, best);

    Summary {
        average,
        best,
        worst,
        spread: round_dp(best - worst, 2),
    }
}
