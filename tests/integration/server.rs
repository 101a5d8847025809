//! HTTP API against the mock feed, driven through the full router.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Duration;
use std::sync::Arc;
use tower::ServiceExt;

use oddsroom::cache::TtlCache;
use oddsroom::feeds::estimated::{EstimatedSource, TableMatchup};
use oddsroom::odds::OddsAggregator;
use oddsroom::server::{build_router, AppState, ServerState};
use oddsroom::types::OddsError;

use crate::mock_feed::MockFeed;

fn state_with(premium: &MockFeed, free: &MockFeed) -> AppState {
    Arc::new(
        ServerState::new(OddsAggregator::default())
            .with_premium(Box::new(premium.clone()))
            .with_free(Box::new(free.clone()))
            .with_cache(TtlCache::new(16, Duration::seconds(60))),
    )
}

async fn get_json(state: AppState, uri: &str) -> serde_json::Value {
    let resp = build_router(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK, "{uri}");
    let body = axum::body::to_bytes(resp.into_body(), 1_000_000).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_premium_board_from_feed() {
    let premium = MockFeed::new();
    let state = state_with(&premium, &MockFeed::new());

    let json = get_json(state, "/api/odds?league=PL&region=eu&bookmakers=bet365").await;

    assert_eq!(json["demo"], false);
    assert_eq!(json["source"], "mock-feed");
    assert_eq!(json["remaining_requests"], "499");
    assert_eq!(json["odds"].as_array().unwrap().len(), 2);
    assert_eq!(json["odds"][0]["home_team"], "Arsenal");
    assert_eq!(json["odds"][0]["value_bets"][0]["bookmaker_key"], "softbook");
    assert_eq!(json["odds"][0]["bookmakers"].as_array().unwrap().len(), 3);

    let q = premium.last_query().unwrap();
    assert_eq!(q.league.as_deref(), Some("PL"));
    assert_eq!(q.region.as_deref(), Some("eu"));
    assert_eq!(q.bookmakers.as_deref(), Some("bet365"));
}

#[tokio::test]
async fn test_premium_board_cached_between_requests() {
    let premium = MockFeed::new();
    let state = state_with(&premium, &MockFeed::new());

    get_json(state.clone(), "/api/odds?league=PL").await;
    get_json(state.clone(), "/api/odds?league=PL").await;
    assert_eq!(premium.calls(), 1);

    get_json(state, "/api/odds?league=SA").await;
    assert_eq!(premium.calls(), 2);
}

#[tokio::test]
async fn test_premium_failure_serves_demo_then_recovers() {
    let premium = MockFeed::new();
    let state = state_with(&premium, &MockFeed::new());

    premium.fail_next(OddsError::Unauthorized {
        source_name: "the-odds-api".into(),
        status: 401,
    });
    let json = get_json(state.clone(), "/api/odds").await;
    assert_eq!(json["demo"], true);
    assert_eq!(json["success"], true);
    assert!(json["message"].as_str().unwrap().contains("rejected"));
    assert!(json["error"].as_str().is_some());
    assert_eq!(json["odds"][0]["id"], "demo_0");

    // Fallbacks are not cached: the next request reaches the feed again.
    let json = get_json(state, "/api/odds").await;
    assert_eq!(json["demo"], false);
    assert_eq!(premium.calls(), 2);
}

#[tokio::test]
async fn test_free_board_failure_serves_estimates() {
    let free = MockFeed::new();
    let state = state_with(&MockFeed::new(), &free);

    free.fail_next(OddsError::Decode {
        source_name: "api-football".into(),
        message: "expected value".into(),
    });
    let json = get_json(state, "/api/odds-free?league=BSA&fixture=123").await;

    assert_eq!(json["source"], "estimated");
    assert_eq!(json["demo"], false);
    assert!(json["error"].as_str().unwrap().contains("expected value"));
    assert_eq!(json["odds"][0]["id"], "est_0");
    assert_eq!(free.last_query().unwrap().fixture.as_deref(), Some("123"));
}

#[tokio::test]
async fn test_free_board_custom_estimates() {
    let state: AppState = Arc::new(
        ServerState::new(OddsAggregator::default()).with_estimated(EstimatedSource::new(vec![
            TableMatchup::new("Bahia", "Vitória", 9, 17),
        ])),
    );
    let json = get_json(state, "/api/odds-free").await;

    let odds = json["odds"].as_array().unwrap();
    assert_eq!(odds.len(), 1);
    assert_eq!(odds[0]["home_team"], "Bahia");
    assert!(odds[0]["best_odds"]["home"]["value"].as_f64().unwrap() > 1.0);
    assert_eq!(odds[0]["analysis"][0], "Bahia sit 9th in the table with a 57% chance");
    assert_eq!(odds[0]["analysis"][2], "Home side favoured by a better table position");
}

#[tokio::test]
async fn test_options_preflight() {
    let state = state_with(&MockFeed::new(), &MockFeed::new());
    let resp = build_router(state)
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/aggregate")
                .header("origin", "http://localhost:3000")
                .header("access-control-request-method", "POST")
                .header("access-control-request-headers", "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(resp.status().is_success());
    let methods = resp
        .headers()
        .get("access-control-allow-methods")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(methods.contains("POST"));
}
