//! League code mapping across vendors.
//!
//! The board speaks short competition codes (`BSA`, `PL`, ...). Each
//! vendor has its own identifiers; this table translates between them.

pub struct League {
    pub code: &'static str,
    pub title: &'static str,
    /// The Odds API sport key, if the vendor covers the league.
    pub odds_api_key: Option<&'static str>,
    /// API-Football numeric league id, if covered.
    pub api_football_id: Option<u32>,
}

pub const LEAGUES: &[League] = &[
    League { code: "BSA", title: "Brasileirão Série A", odds_api_key: Some("soccer_brazil_campeonato"), api_football_id: Some(71) },
    League { code: "BSB", title: "Brasileirão Série B", odds_api_key: Some("soccer_brazil_serie_b"), api_football_id: Some(72) },
    League { code: "PL", title: "Premier League", odds_api_key: Some("soccer_epl"), api_football_id: Some(39) },
    League { code: "PD", title: "La Liga", odds_api_key: Some("soccer_spain_la_liga"), api_football_id: Some(140) },
    League { code: "SA", title: "Serie A", odds_api_key: Some("soccer_italy_serie_a"), api_football_id: Some(135) },
    League { code: "BL1", title: "Bundesliga", odds_api_key: Some("soccer_germany_bundesliga"), api_football_id: Some(78) },
    League { code: "FL1", title: "Ligue 1", odds_api_key: Some("soccer_france_ligue_one"), api_football_id: Some(61) },
    League { code: "CL", title: "UEFA Champions League", odds_api_key: Some("soccer_uefa_champs_league"), api_football_id: Some(2) },
    League { code: "EL", title: "UEFA Europa League", odds_api_key: Some("soccer_uefa_europa_league"), api_football_id: Some(3) },
    League { code: "PPL", title: "Primeira Liga", odds_api_key: Some("soccer_portugal_primeira_liga"), api_football_id: None },
    League { code: "DED", title: "Eredivisie", odds_api_key: Some("soccer_netherlands_eredivisie"), api_football_id: None },
    League { code: "MLS", title: "Major League Soccer", odds_api_key: Some("soccer_usa_mls"), api_football_id: None },
    League { code: "COP", title: "Copa do Brasil", odds_api_key: None, api_football_id: Some(73) },
];

/// League used when a request names none (or an unknown one).
pub const DEFAULT_LEAGUE: &str = "BSA";

/// Look up a league by code (case-insensitive).
pub fn find(code: &str) -> Option<&'static League> {
    LEAGUES.iter().find(|l| l.code.eq_ignore_ascii_case(code.trim()))
}

fn default_league() -> &'static League {
    &LEAGUES[0]
}

/// The Odds API sport key for a league code, falling back to the
/// Brasileirão when the code is missing or unmapped.
pub fn odds_api_sport_key(code: Option<&str>) -> &'static str {
    code.and_then(find)
        .and_then(|l| l.odds_api_key)
        .or(default_league().odds_api_key)
        .unwrap_or("soccer_brazil_campeonato")
}

/// API-Football league id for a code. Numeric input passes through.
pub fn api_football_league_id(code: Option<&str>) -> u32 {
    let Some(code) = code else {
        return default_league().api_football_id.unwrap_or(71);
    };
    if let Ok(id) = code.trim().parse::<u32>() {
        return id;
    }
    find(code)
        .and_then(|l| l.api_football_id)
        .or(default_league().api_football_id)
        .unwrap_or(71)
}
