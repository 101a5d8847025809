//! API route handlers.
//!
//! All endpoints return JSON. State is shared via `Arc<ServerState>`.
//! Vendor failures never surface as 5xx: the boards fall back to demo
//! or estimated fixtures and report what went wrong in the body.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::cache::TtlCache;
use crate::feeds::bookmakers::{BookmakerInfo, BOOKMAKERS};
use crate::feeds::demo::DemoSource;
use crate::feeds::estimated::EstimatedSource;
use crate::feeds::{FeedBatch, OddsQuery, OddsSource};
use crate::odds::{AggregateResult, FixtureOdds, OddsAggregator};
use crate::types::{Fixture, OddsError, Quote};

const DEMO_SOURCE: &str = "demo";
const ESTIMATED_SOURCE: &str = "estimated";

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct ServerState {
    pub aggregator: OddsAggregator,
    premium: Option<Box<dyn OddsSource>>,
    free: Option<Box<dyn OddsSource>>,
    demo: DemoSource,
    estimated: EstimatedSource,
    cache: Option<RwLock<TtlCache<BoardResponse>>>,
}

impl ServerState {
    /// State with no vendor feeds and no cache: both boards serve
    /// offline fixtures.
    pub fn new(aggregator: OddsAggregator) -> Self {
        Self {
            aggregator,
            premium: None,
            free: None,
            demo: DemoSource::new(),
            estimated: EstimatedSource::default(),
            cache: None,
        }
    }

    /// Feed behind `/api/odds`.
    pub fn with_premium(mut self, source: Box<dyn OddsSource>) -> Self {
        self.premium = Some(source);
        self
    }

    /// Feed behind `/api/odds-free`.
    pub fn with_free(mut self, source: Box<dyn OddsSource>) -> Self {
        self.free = Some(source);
        self
    }

    pub fn with_estimated(mut self, estimated: EstimatedSource) -> Self {
        self.estimated = estimated;
        self
    }

    pub fn with_cache(mut self, cache: TtlCache<BoardResponse>) -> Self {
        self.cache = Some(RwLock::new(cache));
        self
    }

    async fn cached(&self, key: &str) -> Option<BoardResponse> {
        let cache = self.cache.as_ref()?;
        // `get` records hit/miss counters, so it needs the write lock.
        let hit = cache.write().await.get(key);
        if hit.is_some() {
            debug!(key, "Board served from cache");
        }
        hit
    }

    async fn store(&self, key: String, board: &BoardResponse) {
        if let Some(cache) = &self.cache {
            cache.write().await.insert(key, board.clone());
        }
    }

    fn price_all(&self, fixtures: Vec<Fixture>) -> Vec<FixtureOdds> {
        fixtures
            .into_iter()
            .map(|f| self.aggregator.price_fixture(f))
            .collect()
    }

    fn live_board(&self, source: &'static str, batch: FeedBatch) -> BoardResponse {
        BoardResponse {
            success: true,
            demo: false,
            source: source.to_string(),
            message: None,
            error: None,
            odds: self.price_all(batch.fixtures),
            remaining_requests: batch.remaining_requests,
            updated_at: Utc::now(),
        }
    }

    fn fallback_board(
        &self,
        source: &'static str,
        fixtures: Vec<Fixture>,
        message: String,
        error: Option<String>,
    ) -> BoardResponse {
        BoardResponse {
            success: true,
            demo: source == DEMO_SOURCE,
            source: source.to_string(),
            message: Some(message),
            error,
            odds: self.price_all(fixtures),
            remaining_requests: None,
            updated_at: Utc::now(),
        }
    }
}

pub type AppState = Arc<ServerState>;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of an odds board response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardResponse {
    pub success: bool,
    /// True when the odds are fixed demo fixtures.
    pub demo: bool,
    /// Feed that produced `odds`.
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub odds: Vec<FixtureOdds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_requests: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AggregateRequest {
    pub quotes: Vec<Quote>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Human-readable explanation for a fallback caused by `err`.
fn fallback_message(err: &anyhow::Error, fallback: &str) -> String {
    match err.downcast_ref::<OddsError>() {
        Some(OddsError::Unauthorized { source_name, .. }) => format!(
            "Using {fallback} odds: {source_name} rejected the configured API key."
        ),
        Some(OddsError::MissingApiKey(source_name)) => {
            format!("Using {fallback} odds: no API key configured for {source_name}.")
        }
        _ => format!("Using {fallback} odds due to an upstream error."),
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /api/odds
pub async fn get_odds(
    State(state): State<AppState>,
    Query(query): Query<OddsQuery>,
) -> Json<BoardResponse> {
    let Some(source) = state.premium.as_deref() else {
        let err = anyhow::Error::new(OddsError::MissingApiKey("the-odds-api".to_string()));
        return Json(state.fallback_board(
            DEMO_SOURCE,
            state.demo.fixtures(),
            fallback_message(&err, DEMO_SOURCE),
            None,
        ));
    };

    let key = format!("odds:{}", query.cache_key());
    if let Some(board) = state.cached(&key).await {
        return Json(board);
    }

    match source.fetch(&query).await {
        Ok(batch) => {
            let board = state.live_board(source.name(), batch);
            info!(source = source.name(), fixtures = board.odds.len(), "Premium board built");
            state.store(key, &board).await;
            Json(board)
        }
        Err(e) => {
            warn!(source = source.name(), error = %e, "Premium feed failed, serving demo odds");
            Json(state.fallback_board(
                DEMO_SOURCE,
                state.demo.fixtures(),
                fallback_message(&e, DEMO_SOURCE),
                Some(format!("{e:#}")),
            ))
        }
    }
}

/// GET /api/odds-free
pub async fn get_odds_free(
    State(state): State<AppState>,
    Query(query): Query<OddsQuery>,
) -> Json<BoardResponse> {
    let league = query.league.as_deref();

    let Some(source) = state.free.as_deref() else {
        return Json(state.fallback_board(
            ESTIMATED_SOURCE,
            state.estimated.fixtures(league),
            "Estimated odds based on league standings.".to_string(),
            None,
        ));
    };

    let key = format!("odds-free:{}", query.cache_key());
    if let Some(board) = state.cached(&key).await {
        return Json(board);
    }

    match source.fetch(&query).await {
        Ok(batch) => {
            let board = state.live_board(source.name(), batch);
            info!(source = source.name(), fixtures = board.odds.len(), "Free board built");
            state.store(key, &board).await;
            Json(board)
        }
        Err(e) => {
            warn!(source = source.name(), error = %e, "Free feed failed, serving estimated odds");
            Json(state.fallback_board(
                ESTIMATED_SOURCE,
                state.estimated.fixtures(league),
                fallback_message(&e, ESTIMATED_SOURCE),
                Some(format!("{e:#}")),
            ))
        }
    }
}

/// POST /api/aggregate
pub async fn post_aggregate(
    State(state): State<AppState>,
    Json(req): Json<AggregateRequest>,
) -> Json<AggregateResult> {
    Json(state.aggregator.aggregate(&req.quotes))
}

/// GET /api/bookmakers
pub async fn get_bookmakers() -> Json<&'static [BookmakerInfo]> {
    Json(BOOKMAKERS)
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
