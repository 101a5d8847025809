//! Shared types for the ODDSROOM service.
//!
//! These types form the data model used across all modules.
//! Feeds produce them, the odds engine consumes them, and the
//! server serialises the results without reshaping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// One leg of a three-way (1X2) football market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Home,
    Draw,
    Away,
}

impl Outcome {
    /// All outcomes in market order (useful for iteration).
    pub const ALL: [Outcome; 3] = [Outcome::Home, Outcome::Draw, Outcome::Away];
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Home => write!(f, "home"),
            Outcome::Draw => write!(f, "draw"),
            Outcome::Away => write!(f, "away"),
        }
    }
}

impl std::str::FromStr for Outcome {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "home" | "1" => Ok(Outcome::Home),
            "draw" | "x" => Ok(Outcome::Draw),
            "away" | "2" => Ok(Outcome::Away),
            _ => Err(anyhow::anyhow!("Unknown outcome: {s}")),
        }
    }
}

/// A value per outcome. Serialises as `{"home": .., "draw": .., "away": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Triple<T> {
    pub home: T,
    pub draw: T,
    pub away: T,
}

impl<T> Triple<T> {
    pub fn new(home: T, draw: T, away: T) -> Self {
        Self { home, draw, away }
    }

    /// Build a triple by evaluating `f` once per outcome, in market order.
    pub fn from_fn(mut f: impl FnMut(Outcome) -> T) -> Self {
        Self {
            home: f(Outcome::Home),
            draw: f(Outcome::Draw),
            away: f(Outcome::Away),
        }
    }

    pub fn get(&self, outcome: Outcome) -> &T {
        match outcome {
            Outcome::Home => &self.home,
            Outcome::Draw => &self.draw,
            Outcome::Away => &self.away,
        }
    }

    pub fn get_mut(&mut self, outcome: Outcome) -> &mut T {
        match outcome {
            Outcome::Home => &mut self.home,
            Outcome::Draw => &mut self.draw,
            Outcome::Away => &mut self.away,
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Triple<U> {
        Triple {
            home: f(self.home),
            draw: f(self.draw),
            away: f(self.away),
        }
    }
}

impl Triple<f64> {
    pub fn sum(&self) -> f64 {
        self.home + self.draw + self.away
    }
}

/// Decimal prices a bookmaker quotes; `None` when an outcome is not offered.
pub type Prices = Triple<Option<f64>>;

// ---------------------------------------------------------------------------
// Quote
// ---------------------------------------------------------------------------

/// One bookmaker's prices for a single fixture's three-way market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Bookmaker identifier, unique within a fixture.
    #[serde(rename = "key")]
    pub bookmaker_key: String,
    /// Display name.
    #[serde(rename = "name")]
    pub bookmaker_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<DateTime<Utc>>,
    pub odds: Prices,
}

impl Quote {
    /// Quote with all three prices present.
    pub fn new(key: &str, name: &str, home: f64, draw: f64, away: f64) -> Self {
        Self::with_prices(key, name, Triple::new(Some(home), Some(draw), Some(away)))
    }

    pub fn with_prices(key: &str, name: &str, odds: Prices) -> Self {
        Self {
            bookmaker_key: key.to_string(),
            bookmaker_name: name.to_string(),
            icon: None,
            last_update: None,
            odds,
        }
    }

    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_string());
        self
    }

    /// The price quoted for an outcome, if any.
    pub fn price(&self, outcome: Outcome) -> Option<f64> {
        *self.odds.get(outcome)
    }

    /// Number of outcomes this quote prices.
    pub fn priced_outcomes(&self) -> usize {
        Outcome::ALL
            .iter()
            .filter(|o| self.price(**o).is_some())
            .count()
    }

    /// Short bookmaker reference used in best-price and value-bet records.
    pub fn bookmaker_ref(&self) -> BookmakerRef {
        BookmakerRef {
            name: self.bookmaker_name.clone(),
            key: self.bookmaker_key.clone(),
            icon: self.icon.clone(),
        }
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fmt_price = |p: Option<f64>| match p {
            Some(v) => format!("{v:.2}"),
            None => "-".to_string(),
        };
        write!(
            f,
            "[{}] 1={} X={} 2={}",
            self.bookmaker_key,
            fmt_price(self.odds.home),
            fmt_price(self.odds.draw),
            fmt_price(self.odds.away),
        )
    }
}

/// Identity of a bookmaker as surfaced in results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmakerRef {
    pub name: String,
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A football fixture with the quotes collected for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
    pub id: String,
    pub sport_key: String,
    pub sport_title: String,
    pub commence_time: Option<DateTime<Utc>>,
    pub home_team: String,
    pub away_team: String,
    pub quotes: Vec<Quote>,
    /// Reasons supplied by the feed itself. When present they replace
    /// the reading derived from the prices.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub analysis: Vec<String>,
}

impl fmt::Display for Fixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} vs {} ({} books)",
            self.id,
            self.home_team,
            self.away_team,
            self.quotes.len(),
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for ODDSROOM.
#[derive(Debug, thiserror::Error)]
pub enum OddsError {
    #[error("API key not configured for {0}")]
    MissingApiKey(String),

    #[error("{source_name} rejected credentials (HTTP {status})")]
    Unauthorized { source_name: String, status: u16 },

    #[error("{source_name} API error {status}: {body}")]
    Upstream {
        source_name: String,
        status: u16,
        body: String,
    },

    #[error("Failed to decode {source_name} response: {message}")]
    Decode {
        source_name: String,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
