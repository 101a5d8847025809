//! API-Football (API-Sports) odds integration for the free board.
//!
//! API: `https://v3.football.api-sports.io/odds`
//! Auth: `x-rapidapi-key` header. Free tier: 100 req/day.
//!
//! The odds endpoint returns bookmakers per fixture, each with a list of
//! bets. Only the three-way "Match Winner" (or "1X2") bet is used. Prices
//! arrive as strings.

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

pub const DEFAULT_BASE_URL: &str = "https://v3.football.api-sports.io";
const API_HOST: &str = "v3.football.api-sports.io";
const SOURCE_NAME: &str = "api-football";

/// Bet names that carry the three-way market.
const MATCH_WINNER_BETS: &[&str] = &["Match Winner", "1X2"];

// ---------------------------------------------------------------------------
// API response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct ApiFootballResponse {
    #[serde(default)]
    response: Vec<ApiFootballOdds>,
}

#[derive(Debug, Deserialize)]
struct ApiFootballOdds {
    #[serde(default)]
    league: Option<ApiFootballLeague>,
    fixture: ApiFootballFixture,
    #[serde(default)]
    bookmakers: Vec<ApiFootballBookmaker>,
}

#[derive(Debug, Deserialize)]
struct ApiFootballLeague {
    #[serde(default)]
    name: Option<String>,
    /// Not part of the documented schema but occasionally present.
    #[serde(default)]
    home: Option<String>,
    #[serde(default)]
    away: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiFootballFixture {
    id: i64,
    #[serde(default)]
    date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct ApiFootballBookmaker {
    name: String,
    #[serde(default)]
    bets: Vec<ApiFootballBet>,
}

#[derive(Debug, Deserialize)]
struct ApiFootballBet {
    name: String,
    #[serde(default)]
    values: Vec<ApiFootballValue>,
}

#[derive(Debug, Deserialize)]
struct ApiFootballValue {
    value: String,
    odd: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct ApiFootballClient {
    http: Client,
    api_key: SecretString,
    base_url: String,
    season: u16,
}

impl ApiFootballClient {
    pub fn new(api_key: SecretString, season: u16, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent("ODDSROOM/0.1.0")
            .build()
            .context("Failed to build HTTP client for API-Football")?;
        Ok(Self {
            http,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            season,
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn build_url(&self, query: &OddsQuery) -> String {
        match query.fixture.as_deref().filter(|f| !f.is_empty()) {
            Some(fixture) => format!(
                "{}/odds?fixture={}",
                self.base_url,
                urlencoding::encode(fixture)
            ),
            None => format!(
                "{}/odds?league={}&season={}",
                self.base_url,
                leagues::api_football_league_id(query.league.as_deref()),
                self.season,
            ),
        }
    }
}

#[async_trait]
impl OddsSource for ApiFootballClient {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn fetch(&self, query: &OddsQuery) -> Result<FeedBatch> {
        let url = self.build_url(query);
        debug!(url = %url, "Fetching API-Football odds");

        let resp = self
            .http
            .get(&url)
            .header("x-rapidapi-key", self.api_key.expose_secret())
            .header("x-rapidapi-host", API_HOST)
            .send()
            .await
            .context("API-Football request failed")?;

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
            .get("x-ratelimit-requests-remaining")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body: ApiFootballResponse = resp.json().await.map_err(|e| OddsError::Decode {
            source_name: SOURCE_NAME.to_string(),
            message: e.to_string(),
        })?;

        let fixtures = normalize_response(body);
        info!(fixtures = fixtures.len(), "API-Football odds fetched");

        Ok(FeedBatch {
            fixtures,
            remaining_requests,
        })
    }
}

// ---------------------------------------------------------------------------
// Normalisation
// ---------------------------------------------------------------------------

pub(crate) fn normalize_response(body: ApiFootballResponse) -> Vec<Fixture> {
    body.response.into_iter().map(normalize_item).collect()
}

fn normalize_item(item: ApiFootballOdds) -> Fixture {
    let quotes = item
        .bookmakers
        .iter()
        .filter_map(normalize_bookmaker)
        .collect();

    let (title, home, away) = match item.league {
        Some(l) => (l.name, l.home, l.away),
        None => (None, None, None),
    };

    Fixture {
        id: item.fixture.id.to_string(),
        sport_key: "soccer".to_string(),
        sport_title: title.unwrap_or_default(),
        commence_time: item.fixture.date,
        home_team: home.unwrap_or_else(|| "Home".to_string()),
        away_team: away.unwrap_or_else(|| "Away".to_string()),
        quotes,
        analysis: Vec::new(),
    }
}

fn normalize_bookmaker(bm: &ApiFootballBookmaker) -> Option<Quote> {
    let bet = bm
        .bets
        .iter()
        .find(|b| MATCH_WINNER_BETS.contains(&b.name.as_str()))?;

    let mut odds = Prices::default();
    for v in &bet.values {
        let price = v.odd.trim().parse::<f64>().ok();
        match v.value.as_str() {
            "Home" => odds.home = price,
            "Draw" => odds.draw = price,
            "Away" => odds.away = price,
            _ => {}
        }
    }

    let key = bookmakers::key_from_name(&bm.name);
    let icon = bookmakers::by_name(&bm.name)
        .map(|b| b.icon)
        .unwrap_or(bookmakers::DEFAULT_ICON);

    Some(Quote {
        bookmaker_key: key,
        bookmaker_name: bm.name.clone(),
        icon: Some(icon.to_string()),
        last_update: None,
        odds,
    })
}
