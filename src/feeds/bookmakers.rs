//! Bookmaker directory: display names, icons, and licensing country.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct BookmakerInfo {
    pub key: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub country: &'static str,
}

/// Icon for books missing from the directory.
pub const DEFAULT_ICON: &str = "📊";

pub const BOOKMAKERS: &[BookmakerInfo] = &[
    BookmakerInfo { key: "bet365", name: "Bet365", icon: "🟢", country: "UK" },
    BookmakerInfo { key: "betfair", name: "Betfair", icon: "🟡", country: "UK" },
    BookmakerInfo { key: "pinnacle", name: "Pinnacle", icon: "🔵", country: "Curaçao" },
    BookmakerInfo { key: "1xbet", name: "1xBet", icon: "🔷", country: "Curaçao" },
    BookmakerInfo { key: "betway", name: "Betway", icon: "⚫", country: "Malta" },
    BookmakerInfo { key: "unibet", name: "Unibet", icon: "🟣", country: "Malta" },
    BookmakerInfo { key: "williamhill", name: "William Hill", icon: "🟤", country: "UK" },
    BookmakerInfo { key: "bovada", name: "Bovada", icon: "🔴", country: "Curaçao" },
    BookmakerInfo { key: "draftkings", name: "DraftKings", icon: "🟠", country: "USA" },
    BookmakerInfo { key: "fanduel", name: "FanDuel", icon: "💙", country: "USA" },
    BookmakerInfo { key: "betonline", name: "BetOnline", icon: "🖤", country: "Panama" },
    BookmakerInfo { key: "mybookieag", name: "MyBookie", icon: "💜", country: "Curaçao" },
    BookmakerInfo { key: "betmgm", name: "BetMGM", icon: "💛", country: "USA" },
    BookmakerInfo { key: "pointsbetus", name: "PointsBet", icon: "🧡", country: "Australia" },
    BookmakerInfo { key: "superbook", name: "SuperBook", icon: "💚", country: "USA" },
    BookmakerInfo { key: "betsson", name: "Betsson", icon: "🩵", country: "Malta" },
    BookmakerInfo { key: "nordicbet", name: "NordicBet", icon: "🩶", country: "Malta" },
    BookmakerInfo { key: "bwin", name: "Bwin", icon: "🟠", country: "Gibraltar" },
    BookmakerInfo { key: "marathonbet", name: "Marathon Bet", icon: "🔴", country: "Curaçao" },
    BookmakerInfo { key: "sportingbet", name: "Sportingbet", icon: "💚", country: "UK" },
];

pub fn by_key(key: &str) -> Option<&'static BookmakerInfo> {
    BOOKMAKERS.iter().find(|b| b.key == key)
}

pub fn by_name(name: &str) -> Option<&'static BookmakerInfo> {
    BOOKMAKERS.iter().find(|b| b.name.eq_ignore_ascii_case(name.trim()))
}

/// Key derived from a display name: lowercase, whitespace removed.
pub fn key_from_name(name: &str) -> String {
    name.split_whitespace().collect::<String>().to_lowercase()
}

/// Icon for a bookmaker key, or the generic icon.
pub fn icon_for(key: &str) -> &'static str {
    by_key(key).map(|b| b.icon).unwrap_or(DEFAULT_ICON)
}
