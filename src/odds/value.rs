//! Value-bet detection.
//!
//! Compares each bookmaker's price against the market's de-margined
//! consensus and flags prices whose implied probability sits below the
//! fair probability by more than the configured threshold.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::probability::implied_probability;
use super::round_dp;
use crate::types::{Outcome, Quote, Triple};

/// A bookmaker price that beats the fair consensus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueBet {
    /// Bookmaker display name.
    pub bookmaker: String,
    pub bookmaker_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub outcome: Outcome,
    pub odds: f64,
    /// `fair_prob - implied_prob`, in percentage points.
    pub value_percentage: f64,
    pub implied_prob: f64,
    pub fair_prob: f64,
}

/// Scans quotes for prices above fair value.
#[derive(Debug, Clone)]
pub struct ValueDetector {
    threshold: f64,
}

impl ValueDetector {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Find all value bets, best first. Ties keep quote order.
    pub fn find_value_bets(&self, quotes: &[Quote], fair: &Triple<f64>) -> Vec<ValueBet> {
        let mut bets: Vec<ValueBet> = quotes
            .iter()
            .flat_map(|quote| {
                Outcome::ALL
                    .into_iter()
                    .filter_map(move |outcome| self.detect(quote, outcome, *fair.get(outcome)))
            })
            .collect();

        bets.sort_by(|a, b| b.value_percentage.total_cmp(&a.value_percentage));
        bets
    }

    /// Check a single (quote, outcome) pair.
    fn detect(&self, quote: &Quote, outcome: Outcome, fair_prob: f64) -> Option<ValueBet> {
        let price = quote.price(outcome)?;
        if !(price.is_finite() && price > 0.0) {
            return None;
        }

        let implied = implied_probability(price);
        let value = fair_prob - implied;
        if value <= self.threshold {
            return None;
        }

        debug!(
            bookmaker = %quote.bookmaker_key,
            %outcome,
            odds = price,
            value = %format!("{value:.1}pp"),
            "Value bet detected"
        );

        Some(ValueBet {
            bookmaker: quote.bookmaker_name.clone(),
            bookmaker_key: quote.bookmaker_key.clone(),
            icon: quote.icon.clone(),
            outcome,
            odds: price,
            value_percentage: round_dp(value, 1),
            implied_prob: round_dp(implied, 1),
            fair_prob,
        })
    }
}
