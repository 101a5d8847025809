//! The Odds API integration.
//!
//! Multi-bookmaker decimal prices for the premium odds board.
//!
//! API docs: https://the-odds-api.com/liveapi/guides/v4/
//! Base URL: https://api.the-odds-api.com/v4/
//! Auth: `apiKey` query param. Quota reported in `x-requests-remaining`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use super::bookmakers;
use super::leagues;
use super::{FeedBatch, OddsQuery, OddsSource};
use crate::types::{Fixture, OddsError, Prices, Quote};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

pub const DEFAULT_BASE_URL: &str = "https://api.the-odds-api.com";
const SOURCE_NAME: &str = "the-odds-api";

/// Three-way market key.
const H2H_MARKET: &str = "h2h";
const DRAW_OUTCOME: &str = "Draw";

// ---------------------------------------------------------------------------
// API response types (The Odds API JSON → Rust)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct OddsApiEvent {
    id: String,
    #[serde(default)]
    sport_key: String,
    #[serde(default)]
    sport_title: String,
    #[serde(default)]
    commence_time: Option<DateTime<Utc>>,
    home_team: String,
    away_team: String,
    #[serde(default)]
    bookmakers: Vec<OddsApiBookmaker>,
}

#[derive(Debug, Deserialize)]
struct OddsApiBookmaker {
    key: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    last_update: Option<DateTime<Utc>>,
    #[serde(default)]
    markets: Vec<OddsApiMarket>,
}

#[derive(Debug, Deserialize)]
struct OddsApiMarket {
    key: String,
    #[serde(default)]
    outcomes: Vec<OddsApiOutcome>,
}

#[derive(Debug, Deserialize)]
struct OddsApiOutcome {
    name: String,
    #[serde(default)]
    price: Option<f64>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// The Odds API client.
pub struct TheOddsApiClient {
    http: Client,
    api_key: SecretString,
    base_url: String,
    default_region: String,
}

impl TheOddsApiClient {
    pub fn new(api_key: SecretString, default_region: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent("ODDSROOM/0.1.0")
            .build()
            .context("Failed to build HTTP client for The Odds API")?;

        Ok(Self {
            http,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            default_region: default_region.to_string(),
        })
    }

    /// Point the client at a different host (staging, local stub).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn build_url(&self, query: &OddsQuery) -> String {
        let sport = leagues::odds_api_sport_key(query.league.as_deref());
        let region = query.region.as_deref().unwrap_or(&self.default_region);

        let mut url = format!(
            "{}/v4/sports/{sport}/odds/?apiKey={}&regions={}&markets={H2H_MARKET}&oddsFormat=decimal",
            self.base_url,
            urlencoding::encode(self.api_key.expose_secret()),
            urlencoding::encode(region),
        );
        if let Some(books) = query.bookmakers.as_deref().filter(|b| !b.is_empty()) {
            url.push_str(&format!("&bookmakers={}", urlencoding::encode(books)));
        }
        url
    }
}

#[async_trait]
impl OddsSource for TheOddsApiClient {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn fetch(&self, query: &OddsQuery) -> Result<FeedBatch> {
        let url = self.build_url(query);
        debug!(league = ?query.league, region = ?query.region, "Fetching The Odds API board");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .context("The Odds API request failed")?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(OddsError::Unauthorized {
                source_name: SOURCE_NAME.to_string(),
                status: status.as_u16(),
            }
            .into());
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(OddsError::Upstream {
                source_name: SOURCE_NAME.to_string(),
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let remaining_requests = resp
            .headers()
            .get("x-requests-remaining")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let events: Vec<OddsApiEvent> = resp.json().await.map_err(|e| OddsError::Decode {
            source_name: SOURCE_NAME.to_string(),
            message: e.to_string(),
        })?;

        let fixtures: Vec<Fixture> = events.into_iter().map(normalize_event).collect();

        info!(
            fixtures = fixtures.len(),
            remaining = remaining_requests.as_deref().unwrap_or("?"),
            "The Odds API board fetched"
        );

        Ok(FeedBatch {
            fixtures,
            remaining_requests,
        })
    }
}

// ---------------------------------------------------------------------------
// Normalisation
// ---------------------------------------------------------------------------

/// Convert one event into a fixture, keeping bookmakers that price `h2h`.
pub(crate) fn normalize_event(event: OddsApiEvent) -> Fixture {
    let quotes = event
        .bookmakers
        .iter()
        .filter_map(|bm| normalize_bookmaker(bm, &event.home_team, &event.away_team))
        .collect();

    Fixture {
        id: event.id,
        sport_key: event.sport_key,
        sport_title: event.sport_title,
        commence_time: event.commence_time,
        home_team: event.home_team,
        away_team: event.away_team,
        quotes,
        analysis: Vec::new(),
    }
}

fn normalize_bookmaker(bm: &OddsApiBookmaker, home_team: &str, away_team: &str) -> Option<Quote> {
    let market = bm.markets.iter().find(|m| m.key == H2H_MARKET)?;

    let mut odds = Prices::default();
    for outcome in &market.outcomes {
        if outcome.name == home_team {
            odds.home = outcome.price;
        } else if outcome.name == away_team {
            odds.away = outcome.price;
        } else if outcome.name == DRAW_OUTCOME {
            odds.draw = outcome.price;
        }
    }

    let info = bookmakers::by_key(&bm.key);
    let name = info
        .map(|i| i.name.to_string())
        .unwrap_or_else(|| bm.title.clone());

    Some(Quote {
        bookmaker_key: bm.key.clone(),
        bookmaker_name: name,
        icon: Some(bookmakers::icon_for(&bm.key).to_string()),
        last_update: bm.last_update,
        odds,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
      {
        "id": "e912304de2b2ce35b473ce2ecd3d1502",
        "sport_key": "soccer_epl",
        "sport_title": "EPL",
        "commence_time": "2025-08-16T14:00:00Z",
        "home_team": "Arsenal",
        "away_team": "Chelsea",
        "bookmakers": [
          {
            "key": "pinnacle",
            "title": "Pinnacle Sports",
            "last_update": "2025-08-15T10:00:00Z",
            "markets": [
              {"key": "h2h", "outcomes": [
                {"name": "Arsenal", "price": 2.18},
                {"name": "Chelsea", "price": 3.48},
                {"name": "Draw", "price": 3.42}
              ]}
            ]
          },
          {
            "key": "sharpbook",
            "title": "Sharp Book",
            "markets": [
              {"key": "h2h", "outcomes": [
                {"name": "Arsenal", "price": 2.20},
                {"name": "Draw", "price": 3.30}
              ]}
            ]
          },
          {
            "key": "totalsonly",
            "title": "Totals Only",
            "markets": [
              {"key": "totals", "outcomes": [{"name": "Over", "price": 1.9}]}
            ]
          }
        ]
      }
    ]"#;

    fn sample_fixture() -> Fixture {
        let events: Vec<OddsApiEvent> = serde_json::from_str(SAMPLE).unwrap();
        events.into_iter().map(normalize_event).next().unwrap()
    }

    #[test]
    fn test_normalize_event_fields() {
        let fx = sample_fixture();
        assert_eq!(fx.id, "e912304de2b2ce35b473ce2ecd3d1502");
        assert_eq!(fx.home_team, "Arsenal");
        assert_eq!(fx.away_team, "Chelsea");
        assert!(fx.commence_time.is_some());
    }

    #[test]
    fn test_normalize_maps_outcomes_by_team_name() {
        let fx = sample_fixture();
        let pinnacle = &fx.quotes[0];
        assert_eq!(pinnacle.odds.home, Some(2.18));
        assert_eq!(pinnacle.odds.draw, Some(3.42));
        assert_eq!(pinnacle.odds.away, Some(3.48));
        assert!(pinnacle.last_update.is_some());
    }

    #[test]
    fn test_normalize_uses_directory_name_then_title() {
        let fx = sample_fixture();
        assert_eq!(fx.quotes[0].bookmaker_name, "Pinnacle");
        assert_eq!(fx.quotes[0].icon.as_deref(), Some("🔵"));
        assert_eq!(fx.quotes[1].bookmaker_name, "Sharp Book");
        assert_eq!(fx.quotes[1].icon.as_deref(), Some(bookmakers::DEFAULT_ICON));
        assert_eq!(fx.quotes[1].odds.away, None);
    }

    #[test]
    fn test_normalize_skips_books_without_h2h() {
        let fx = sample_fixture();
        assert_eq!(fx.quotes.len(), 2);
        assert!(fx.quotes.iter().all(|q| q.bookmaker_key != "totalsonly"));
    }

    #[test]
    fn test_build_url() {
        let client = TheOddsApiClient::new(
            SecretString::new("k3y".to_string()),
            "br",
            Duration::from_secs(5),
        )
        .unwrap()
        .with_base_url("http://localhost:9000/");

        let url = client.build_url(&OddsQuery {
            league: Some("PL".into()),
            bookmakers: Some("bet365,pinnacle".into()),
            ..OddsQuery::default()
        });
        assert_eq!(
            url,
            "http://localhost:9000/v4/sports/soccer_epl/odds/?apiKey=k3y&regions=br&markets=h2h&oddsFormat=decimal&bookmakers=bet365%2Cpinnacle"
        );

        let url = client.build_url(&OddsQuery {
            region: Some("eu".into()),
            ..OddsQuery::default()
        });
        assert!(url.contains("/soccer_brazil_campeonato/"));
        assert!(url.contains("regions=eu"));
        assert!(!url.contains("bookmakers="));
    }

    #[test]
    fn test_source_name() {
        let client = TheOddsApiClient::new(
            SecretString::new("k".to_string()),
            "br",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(client.name(), "the-odds-api");
    }
}
