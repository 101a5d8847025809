//! End-to-end aggregation through the public API.
//!
//! Exercises the aggregator the way the server does: feed fixtures in,
//! priced boards out, including serialisation.

use oddsroom::feeds::demo::DemoSource;
use oddsroom::feeds::estimated::EstimatedSource;
use oddsroom::odds::value::ValueDetector;
use oddsroom::odds::{AggregatorConfig, OddsAggregator};
use oddsroom::types::{Outcome, Prices, Quote, Triple};

use crate::mock_feed::MockFeed;

fn approx(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

#[test]
fn test_four_bookmakers_market() {
    let quotes = vec![
        Quote::new("bet365", "Bet365", 2.10, 3.40, 3.50),
        Quote::new("betfair", "Betfair", 2.15, 3.35, 3.45),
        Quote::new("1xbet", "1xBet", 2.12, 3.38, 3.52),
        Quote::new("pinnacle", "Pinnacle", 2.18, 3.42, 3.48),
    ];
    let result = OddsAggregator::default().aggregate(&quotes);

    assert!(approx(result.stats.average.home, 2.14, 0.005));
    assert_eq!(result.best_odds.home.value, 2.18);
    assert_eq!(result.worst_odds.home, 2.10);
    assert!(result.implied_probabilities.overround > 0.0);
    assert!(approx(result.implied_probabilities.adjusted.sum(), 100.0, 0.1 + 1e-9));

    for outcome in Outcome::ALL {
        let avg = *result.stats.average.get(outcome);
        assert!(*result.stats.worst.get(outcome) <= avg);
        assert!(avg <= *result.stats.best.get(outcome));
    }
}

#[test]
fn test_soft_price_against_market() {
    // Home priced at 3.00 when the market has it at 55%.
    let quotes = vec![Quote::new("soft", "Soft", 3.00, 4.00, 5.00)];
    let fair = Triple::new(55.0, 25.0, 20.0);
    let bets = ValueDetector::new(3.0).find_value_bets(&quotes, &fair);

    assert_eq!(bets.len(), 1);
    assert_eq!(bets[0].outcome, Outcome::Home);
    assert_eq!(bets[0].implied_prob, 33.3);
    assert!(approx(bets[0].value_percentage, 21.7, 1e-9));
}

#[test]
fn test_empty_market_is_neutral() {
    let result = OddsAggregator::default().aggregate(&[]);
    let adjusted = result.implied_probabilities.adjusted;
    assert_eq!((adjusted.home, adjusted.draw, adjusted.away), (33.0, 34.0, 33.0));
    assert!(result.value_bets.is_empty());
    assert_eq!(result.stats.count, 0);
}

#[test]
fn test_partial_quotes_and_invalid_prices() {
    let quotes = vec![
        Quote::with_prices("homeonly", "Home Only", Triple::new(Some(2.0), None, None)),
        Quote::with_prices("broken", "Broken", Triple::new(Some(f64::NAN), Some(0.5), None)),
        Quote::new("full", "Full", 2.2, 3.3, 3.1),
    ];
    let agg = OddsAggregator::default();
    let result = agg.aggregate(&quotes);

    // "broken" has no usable price left and is dropped entirely.
    assert_eq!(agg.sanitize(&quotes).len(), 2);
    assert_eq!(result.stats.count, 2);
    assert_eq!(result.stats.best.draw, 3.3);
    assert!(approx(result.implied_probabilities.adjusted.sum(), 100.0, 0.1 + 1e-9));

    let json = serde_json::to_string(&result).unwrap();
    assert!(!json.contains("NaN"));
    assert!(!json.contains("inf"));
}

#[test]
fn test_value_bets_match_threshold_rule() {
    let agg = OddsAggregator::new(AggregatorConfig {
        value_threshold: 3.0,
        ..AggregatorConfig::default()
    });
    for fixture in MockFeed::default_fixtures() {
        let result = agg.aggregate(&fixture.quotes);
        let adjusted = result.implied_probabilities.adjusted;

        let mut expected = 0;
        for quote in &fixture.quotes {
            for outcome in Outcome::ALL {
                if let Some(price) = quote.price(outcome) {
                    if *adjusted.get(outcome) - 100.0 / price > 3.0 {
                        expected += 1;
                    }
                }
            }
        }
        assert_eq!(result.value_bets.len(), expected, "{fixture}");
        assert!(result
            .value_bets
            .windows(2)
            .all(|w| w[0].value_percentage >= w[1].value_percentage));
    }
}

#[test]
fn test_soft_book_is_flagged() {
    let fixtures = MockFeed::default_fixtures();
    let result = OddsAggregator::default().aggregate(&fixtures[0].quotes);

    assert_eq!(result.value_bets.len(), 1);
    let bet = &result.value_bets[0];
    assert_eq!(bet.bookmaker_key, "softbook");
    assert_eq!(bet.outcome, Outcome::Home);
    assert_eq!(bet.odds, 2.40);
    assert_eq!(result.best_odds.home.bookmaker.as_ref().unwrap().key, "softbook");
}

#[test]
fn test_offline_boards_price_cleanly() {
    let agg = OddsAggregator::default();
    let fixtures = DemoSource::new()
        .fixtures()
        .into_iter()
        .chain(EstimatedSource::default().fixtures(None));

    for fixture in fixtures {
        let priced = agg.price_fixture(fixture);
        assert!(approx(priced.result.implied_probabilities.adjusted.sum(), 100.0, 0.1 + 1e-9));
        assert!(!priced.analysis.is_empty());

        let json = serde_json::to_value(&priced).unwrap();
        assert!(json["stats"]["average"]["home"].is_number());
        assert!(json["value_bets"].is_array());
    }
}

#[test]
fn test_fair_odds_null_for_zero_probability() {
    let quotes = vec![Quote::with_prices(
        "h",
        "H",
        Prices::new(Some(1.5), None, None),
    )];
    let result = OddsAggregator::default().aggregate(&quotes);
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(result.implied_probabilities.adjusted.home, 100.0);
    assert!(json["implied_probabilities"]["fair_odds"]["draw"].is_null());
    assert_eq!(json["implied_probabilities"]["fair_odds"]["home"], 1.0);
}
