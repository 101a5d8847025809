//! Mock odds feed for integration testing.
//!
//! Provides a deterministic `OddsSource` that returns known fixtures,
//! counts calls, and can be forced to fail with a given `OddsError`.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use oddsroom::feeds::{FeedBatch, OddsQuery, OddsSource};
use oddsroom::types::{Fixture, OddsError, Quote};

/// A scripted feed. Clones share call counts and the forced error.
#[derive(Clone)]
pub struct MockFeed {
    fixtures: Vec<Fixture>,
    calls: Arc<AtomicUsize>,
    force_error: Arc<Mutex<Option<OddsError>>>,
    /// Last query seen, for asserting parameter pass-through.
    last_query: Arc<Mutex<Option<OddsQuery>>>,
}

impl MockFeed {
    pub fn new() -> Self {
        Self::with_fixtures(Self::default_fixtures())
    }

    pub fn with_fixtures(fixtures: Vec<Fixture>) -> Self {
        Self {
            fixtures,
            calls: Arc::new(AtomicUsize::new(0)),
            force_error: Arc::new(Mutex::new(None)),
            last_query: Arc::new(Mutex::new(None)),
        }
    }

    /// Fail subsequent fetches with `err`. Consumed by the next call.
    pub fn fail_next(&self, err: OddsError) {
        *self.force_error.lock().unwrap() = Some(err);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<OddsQuery> {
        self.last_query.lock().unwrap().clone()
    }

    /// Two fixtures with known prices: one with a soft home price that
    /// stands out against the market, one ordinary.
    pub fn default_fixtures() -> Vec<Fixture> {
        let kickoff = Utc::now() + Duration::days(2);
        vec![
            Fixture {
                id: "mock_1".into(),
                sport_key: "soccer_epl".into(),
                sport_title: "EPL".into(),
                commence_time: Some(kickoff),
                home_team: "Arsenal".into(),
                away_team: "Chelsea".into(),
                quotes: vec![
                    Quote::new("bet365", "Bet365", 1.80, 3.60, 4.50),
                    Quote::new("pinnacle", "Pinnacle", 1.82, 3.55, 4.40),
                    Quote::new("softbook", "Soft Book", 2.40, 3.50, 4.30),
                ],
                analysis: Vec::new(),
            },
            Fixture {
                id: "mock_2".into(),
                sport_key: "soccer_epl".into(),
                sport_title: "EPL".into(),
                commence_time: Some(kickoff + Duration::hours(3)),
                home_team: "Everton".into(),
                away_team: "Fulham".into(),
                quotes: vec![
                    Quote::new("bet365", "Bet365", 2.60, 3.20, 2.80),
                    Quote::new("pinnacle", "Pinnacle", 2.62, 3.25, 2.82),
                ],
                analysis: Vec::new(),
            },
        ]
    }
}

#[async_trait]
impl OddsSource for MockFeed {
    fn name(&self) -> &'static str {
        "mock-feed"
    }

    async fn fetch(&self, query: &OddsQuery) -> Result<FeedBatch> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(query.clone());

        if let Some(err) = self.force_error.lock().unwrap().take() {
            return Err(err.into());
        }
        Ok(FeedBatch {
            fixtures: self.fixtures.clone(),
            remaining_requests: Some("499".into()),
        })
    }
}
