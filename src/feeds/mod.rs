//! Odds feeds.
//!
//! Defines the `OddsSource` trait and provides implementations for:
//! - The Odds API: multi-bookmaker decimal prices (premium board)
//! - API-Football: free-tier bookmaker odds (free board)
//! - Demo fixtures: fixed sample prices when no vendor is reachable
//! - Estimated odds: prices derived from league-table positions

pub mod api_football;
pub mod bookmakers;
pub mod demo;
pub mod estimated;
pub mod leagues;
pub mod the_odds_api;

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

use crate::types::Fixture;

/// Request parameters shared by all feeds. Feeds ignore what they
/// don't support.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
pub struct OddsQuery {
    /// League code (`PL`, `BSA`, ...) or a vendor-native id.
    pub league: Option<String>,
    /// Bookmaker region(s), e.g. `br` or `eu,uk`.
    pub region: Option<String>,
    /// Comma-separated bookmaker keys to restrict to.
    pub bookmakers: Option<String>,
    /// A single vendor fixture id.
    pub fixture: Option<String>,
}

impl OddsQuery {
    pub fn league(league: &str) -> Self {
        Self {
            league: Some(league.to_string()),
            ..Self::default()
        }
    }

    /// Stable cache key for this query.
    pub fn cache_key(&self) -> String {
        let part = |v: &Option<String>| v.as_deref().unwrap_or("").to_string();
        format!(
            "league={}|region={}|bookmakers={}|fixture={}",
            part(&self.league),
            part(&self.region),
            part(&self.bookmakers),
            part(&self.fixture),
        )
    }
}

/// Fixtures returned by one feed call.
#[derive(Debug, Clone, Default)]
pub struct FeedBatch {
    pub fixtures: Vec<Fixture>,
    /// Vendor-reported remaining request quota, when exposed.
    pub remaining_requests: Option<String>,
}

/// Abstraction over odds vendors and offline fallbacks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OddsSource: Send + Sync {
    /// Feed name for logging and response metadata.
    fn name(&self) -> &'static str;

    /// Fetch fixtures with their bookmaker quotes.
    async fn fetch(&self, query: &OddsQuery) -> Result<FeedBatch>;
}
