//! Demo fixtures for the premium board.
//!
//! Served when no vendor key is configured or the vendor call fails.
//! Prices are fixed so the board stays stable between requests.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};

use super::bookmakers;
use super::{FeedBatch, OddsQuery, OddsSource};
use crate::types::{Fixture, Quote};

const SOURCE_NAME: &str = "demo";

struct DemoMatch {
    home: &'static str,
    away: &'static str,
    /// (bookmaker key, home, draw, away)
    prices: [(&'static str, f64, f64, f64); 4],
}

const DEMO_MATCHES: &[DemoMatch] = &[
    DemoMatch {
        home: "Flamengo",
        away: "Palmeiras",
        prices: [
            ("bet365", 2.10, 3.40, 3.50),
            ("betfair", 2.15, 3.35, 3.45),
            ("1xbet", 2.12, 3.38, 3.52),
            ("pinnacle", 2.18, 3.42, 3.48),
        ],
    },
    DemoMatch {
        home: "Corinthians",
        away: "São Paulo",
        prices: [
            ("bet365", 2.45, 3.25, 2.90),
            ("betfair", 2.50, 3.20, 2.85),
            ("1xbet", 2.48, 3.22, 2.88),
            ("pinnacle", 2.52, 3.28, 2.92),
        ],
    },
    DemoMatch {
        home: "Atlético-MG",
        away: "Cruzeiro",
        prices: [
            ("bet365", 1.85, 3.60, 4.20),
            ("betfair", 1.88, 3.55, 4.15),
            ("1xbet", 1.87, 3.58, 4.18),
            ("pinnacle", 1.90, 3.62, 4.25),
        ],
    },
];

/// Offline source returning the fixed demo fixtures.
#[derive(Debug, Default, Clone)]
pub struct DemoSource;

impl DemoSource {
    pub fn new() -> Self {
        Self
    }

    /// Build the demo fixtures with kickoffs relative to now.
    pub fn fixtures(&self) -> Vec<Fixture> {
        let now = Utc::now();
        DEMO_MATCHES
            .iter()
            .enumerate()
            .map(|(i, m)| Fixture {
                id: format!("demo_{i}"),
                sport_key: "soccer_brazil_campeonato".to_string(),
                sport_title: "Brasileirão Série A".to_string(),
                commence_time: Some(now + Duration::days(i as i64 + 1)),
                home_team: m.home.to_string(),
                away_team: m.away.to_string(),
                quotes: m.prices.iter().map(|&(key, h, d, a)| demo_quote(key, h, d, a)).collect(),
                analysis: Vec::new(),
            })
            .collect()
    }
}

fn demo_quote(key: &str, home: f64, draw: f64, away: f64) -> Quote {
    let name = bookmakers::by_key(key).map(|b| b.name).unwrap_or(key);
    Quote::new(key, name, home, draw, away).with_icon(bookmakers::icon_for(key))
}

#[async_trait]
impl OddsSource for DemoSource {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn fetch(&self, _query: &OddsQuery) -> Result<FeedBatch> {
        Ok(FeedBatch {
            fixtures: self.fixtures(),
            remaining_requests: None,
        })
    }
}
