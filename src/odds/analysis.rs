//! Plain-language reading of a fixture's market.

use super::probability::implied_probability;
use super::stats::AggregateStats;
use crate::types::Triple;

/// Average draw price above which the draw is called out as unlikely.
const HIGH_DRAW_PRICE: f64 = 3.5;

/// De-margined probabilities of the average prices as whole percents.
///
/// Rounded once from the exact ratio, not from the 1 dp published split.
fn whole_percents(average: &Triple<f64>) -> Triple<f64> {
    let raw = average.map(implied_probability);
    let total = raw.sum();
    raw.map(|p| if total > 0.0 { (p / total * 100.0).round() } else { 0.0 })
}

/// Build short explanatory reasons from the market's average prices.
pub fn analyse(stats: &AggregateStats) -> Vec<String> {
    if stats.average.home == 0.0 && stats.average.draw == 0.0 && stats.average.away == 0.0 {
        return vec!["No bookmaker prices available for this fixture".to_string()];
    }

    let Triple { home, draw, away } = whole_percents(&stats.average);

    let mut reasons = Vec::new();

    if home > 50.0 {
        reasons.push(format!("Home side has a {home:.0}% chance according to the bookmakers"));
        reasons.push(format!(
            "Average price of @{:.2} marks a clear home favourite",
            stats.average.home
        ));
    } else if away > 50.0 {
        reasons.push(format!("Away side is favoured with a {away:.0}% chance"));
        reasons.push(format!(
            "Even on the road, an average of @{:.2} shows market confidence",
            stats.average.away
        ));
    } else {
        reasons.push(format!("Balanced game: home {home:.0}% vs away {away:.0}%"));
        reasons.push(format!("Draw at {draw:.0}% may be worth a look"));
    }

    if stats.average.draw > HIGH_DRAW_PRICE {
        reasons.push(format!(
            "High draw price (@{:.2}): both sides are expected to play for the win",
            stats.average.draw
        ));
    }

    reasons
}
