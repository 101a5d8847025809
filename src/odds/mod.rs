//! Odds engine: aggregation, de-margining and value-bet detection.
//!
//! Merges quotes from many bookmakers for a single fixture into summary
//! statistics, removes the bookmaker margin to obtain fair probabilities,
//! and flags prices that beat the fair consensus.

pub mod analysis;
pub mod probability;
pub mod stats;
pub mod value;

use chrono::{DateTime, Utc};
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{BookmakerRef, Fixture, Outcome, Quote, Triple};
use probability::ImpliedProbabilities;
use stats::AggregateStats;
use value::{ValueBet, ValueDetector};

// ---------------------------------------------------------------------------
// Configuration (defaults, overridden by config.toml at runtime)
// ---------------------------------------------------------------------------

/// Tunables for the aggregator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Minimum value, in percentage points, for a price to be flagged.
    pub value_threshold: f64,
    /// Prices below this (or non-finite) are treated as not quoted.
    pub min_price: f64,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            value_threshold: 3.0,
            min_price: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// The best price for one outcome and the first bookmaker offering it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestPrice {
    pub value: f64,
    pub bookmaker: Option<BookmakerRef>,
}

/// Everything derived from one fixture's quotes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub stats: AggregateStats,
    pub implied_probabilities: ImpliedProbabilities,
    pub value_bets: Vec<ValueBet>,
    pub best_odds: Triple<BestPrice>,
    pub worst_odds: Triple<f64>,
}

/// A fixture after aggregation, as served on the odds board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureOdds {
    pub id: String,
    pub sport_key: String,
    pub sport_title: String,
    pub commence_time: Option<DateTime<Utc>>,
    pub home_team: String,
    pub away_team: String,
    pub bookmakers: Vec<Quote>,
    #[serde(flatten)]
    pub result: AggregateResult,
    pub analysis: Vec<String>,
}

// ---------------------------------------------------------------------------
// Aggregator
// ---------------------------------------------------------------------------

/// Stateless aggregator. Cheap to share across requests.
#[derive(Debug, Clone)]
pub struct OddsAggregator {
    config: AggregatorConfig,
    detector: ValueDetector,
}

impl Default for OddsAggregator {
    fn default() -> Self {
        Self::new(AggregatorConfig::default())
    }
}

impl OddsAggregator {
    pub fn new(config: AggregatorConfig) -> Self {
        let detector = ValueDetector::new(config.value_threshold);
        Self { config, detector }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Aggregate one fixture's quotes.
    ///
    /// Never fails: missing outcomes contribute nothing, and an empty
    /// quote list yields zeroed stats, the neutral 33/34/33 split, and
    /// no value bets.
    pub fn aggregate(&self, quotes: &[Quote]) -> AggregateResult {
        let quotes = self.sanitize(quotes);

        let stats = stats::compute(&quotes);
        let implied = probability::implied_probabilities(&stats.average);
        let value_bets = self.detector.find_value_bets(&quotes, &implied.adjusted);

        let best_odds = Triple::from_fn(|outcome| {
            let value = *stats.best.get(outcome);
            BestPrice {
                value,
                bookmaker: find_bookmaker(&quotes, outcome, value),
            }
        });

        debug!(
            quotes = quotes.len(),
            overround = implied.overround,
            value_bets = value_bets.len(),
            "Aggregated quotes"
        );

        AggregateResult {
            worst_odds: stats.worst,
            stats,
            implied_probabilities: implied,
            value_bets,
            best_odds,
        }
    }

    /// Aggregate a fixture and attach the narrative analysis, preferring
    /// reasons the feed already supplied.
    pub fn price_fixture(&self, fixture: Fixture) -> FixtureOdds {
        let result = self.aggregate(&fixture.quotes);
        let analysis = if fixture.analysis.is_empty() {
            analysis::analyse(&result.stats)
        } else {
            fixture.analysis
        };
        let bookmakers = self.sanitize(&fixture.quotes);

        FixtureOdds {
            id: fixture.id,
            sport_key: fixture.sport_key,
            sport_title: fixture.sport_title,
            commence_time: fixture.commence_time,
            home_team: fixture.home_team,
            away_team: fixture.away_team,
            bookmakers,
            result,
            analysis,
        }
    }

    /// Drop prices that are not finite or below `min_price`, then drop
    /// quotes left with no prices at all.
    pub fn sanitize(&self, quotes: &[Quote]) -> Vec<Quote> {
        quotes
            .iter()
            .filter_map(|quote| {
                let mut cleaned = quote.clone();
                for outcome in Outcome::ALL {
                    let slot = cleaned.odds.get_mut(outcome);
                    if let Some(price) = *slot {
                        if !price.is_finite() || price < self.config.min_price {
                            debug!(
                                bookmaker = %quote.bookmaker_key,
                                %outcome,
                                price,
                                "Discarding invalid price"
                            );
                            *slot = None;
                        }
                    }
                }
                if cleaned.priced_outcomes() == 0 {
                    debug!(bookmaker = %quote.bookmaker_key, "Dropping quote with no usable prices");
                    None
                } else {
                    Some(cleaned)
                }
            })
            .collect()
    }
}

/// First bookmaker (input order) whose price for `outcome` equals `value`.
fn find_bookmaker(quotes: &[Quote], outcome: Outcome, value: f64) -> Option<BookmakerRef> {
    quotes
        .iter()
        .find(|q| q.price(outcome) == Some(value))
        .map(Quote::bookmaker_ref)
}

/// Round half away from zero to `dp` decimal places.
///
/// Goes through `Decimal` so values like 2.675 round on their decimal
/// representation rather than their binary one.
pub(crate) fn round_dp(value: f64, dp: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
