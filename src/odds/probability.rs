//! Implied probabilities, overround, and de-margined fair odds.
//!
//! Raw implied probability is `100 / price`. Bookmakers price in a margin,
//! so raw probabilities over the three outcomes sum to more than 100; the
//! excess is the overround. Rescaling the raw values to sum to 100 gives
//! the fair (adjusted) probabilities and, inverted, the fair odds.

use serde::{Deserialize, Serialize};

use super::round_dp;
use crate::types::Triple;

/// Split used when no outcome has a price.
pub const NEUTRAL_SPLIT: Triple<f64> = Triple {
    home: 33.0,
    draw: 34.0,
    away: 33.0,
};

/// Probabilities derived from the average prices. All values are percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpliedProbabilities {
    pub raw: Triple<f64>,
    pub adjusted: Triple<f64>,
    pub overround: f64,
    /// `None` (JSON `null`) where the adjusted probability is zero.
    pub fair_odds: Triple<Option<f64>>,
}

/// Raw implied probability of a decimal price, `0` for a non-positive price.
pub fn implied_probability(price: f64) -> f64 {
    if price > 0.0 {
        100.0 / price
    } else {
        0.0
    }
}

/// Derive raw, adjusted, and fair values from average prices.
pub fn implied_probabilities(average: &Triple<f64>) -> ImpliedProbabilities {
    let raw = average.map(implied_probability);
    let total = raw.sum();
    let overround = total - 100.0;

    let adjusted = if total > 0.0 {
        raw.map(|p| round_dp(p / total * 100.0, 1))
    } else {
        NEUTRAL_SPLIT
    };

    let fair_odds = adjusted.map(|p| if p > 0.0 { Some(round_dp(100.0 / p, 2)) } else { None });

    ImpliedProbabilities {
        raw: raw.map(|p| round_dp(p, 1)),
        adjusted,
        overround: round_dp(overround, 2),
        fair_odds,
    }
}
