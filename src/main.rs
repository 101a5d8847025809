//! ODDSROOM: multi-bookmaker odds aggregation service.
//!
//! Entry point. Loads configuration, initialises structured logging,
//! wires the vendor feeds that have keys configured, and serves the
//! JSON API until Ctrl+C.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use oddsroom::cache::TtlCache;
use oddsroom::config::AppConfig;
use oddsroom::feeds::api_football::ApiFootballClient;
use oddsroom::feeds::the_odds_api::TheOddsApiClient;
use oddsroom::odds::OddsAggregator;
use oddsroom::server::{self, ServerState};

const BANNER: &str = r#"
  ___  ____  ____  ____  ____   ___   ___  __  __
 / _ \|  _ \|  _ \/ ___||  _ \ / _ \ / _ \|  \/  |
| | | | | | | | | \___ \| |_) | | | | | | | |\/| |
| |_| | |_| | |_| |___) |  _ <| |_| | |_| | |  | |
 \___/|____/|____/|____/|_| \_\\___/ \___/|_|  |_|

  Multi-bookmaker odds aggregation
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let config_path = AppConfig::path_from_env();
    let cfg = AppConfig::load(&config_path)?;

    init_logging();

    println!("{BANNER}");
    info!(
        name = %cfg.server.name,
        config = %config_path,
        value_threshold = cfg.aggregator.value_threshold,
        min_price = cfg.aggregator.min_price,
        "ODDSROOM starting up"
    );

    let state = build_state(&cfg)?;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
        }
        info!("Shutdown signal received.");
    };

    server::serve(Arc::new(state), &cfg.server.host, cfg.server.port, shutdown).await?;

    info!("ODDSROOM shut down cleanly.");
    Ok(())
}

/// Wire feeds and cache from configuration.
fn build_state(cfg: &AppConfig) -> Result<ServerState> {
    let feeds = &cfg.feeds;
    let mut state = ServerState::new(OddsAggregator::new(cfg.aggregator.clone()));

    match AppConfig::resolve_secret(&feeds.the_odds_api_key_env) {
        Some(key) => {
            let client = TheOddsApiClient::new(key, &feeds.default_region, feeds.timeout())?;
            info!(region = %feeds.default_region, "The Odds API enabled for /api/odds");
            state = state.with_premium(Box::new(client));
        }
        None => warn!(
            env = %feeds.the_odds_api_key_env,
            "No The Odds API key configured; /api/odds will serve demo odds"
        ),
    }

    match AppConfig::resolve_secret(&feeds.api_football_key_env) {
        Some(key) => {
            let client = ApiFootballClient::new(key, feeds.season, feeds.timeout())?;
            info!(season = feeds.season, "API-Football enabled for /api/odds-free");
            state = state.with_free(Box::new(client));
        }
        None => warn!(
            env = %feeds.api_football_key_env,
            "No API-Football key configured; /api/odds-free will serve estimated odds"
        ),
    }

    if cfg.cache.enabled {
        info!(
            ttl_secs = cfg.cache.ttl_secs,
            capacity = cfg.cache.capacity,
            "Response cache enabled"
        );
        state = state.with_cache(TtlCache::new(cfg.cache.capacity, cfg.cache.ttl()));
    }

    Ok(state)
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("oddsroom=info"));

    let json_logging = std::env::var("ODDSROOM_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
