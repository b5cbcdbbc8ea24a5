use serde::{Deserialize, Serialize};

/// Final gameweek of a Premier League season.
pub const SEASON_GAMEWEEKS: u8 = 38;

/// Gameweeks from `active` onward, at most `size` of them, never past the end of the season.
///
/// `active` values below 1 are treated as gameweek 1. A window starting after the
/// final gameweek is empty.
pub fn gameweek_window(active: u8, size: u8) -> Vec<u8> {
    let start = active.max(1);
    if size == 0 || start > SEASON_GAMEWEEKS {
        return Vec::new();
    }
    let end = start.saturating_add(size - 1).min(SEASON_GAMEWEEKS);
    (start..=end).collect()
}

/// Parses keys of the form `gw12` (case-insensitive) into gameweek numbers.
pub fn parse_gameweek_key(raw: &str) -> Option<u8> {
    let s = raw.trim();
    let digits = s
        .strip_prefix("gw")
        .or_else(|| s.strip_prefix("GW"))
        .or_else(|| s.strip_prefix("Gw"))?;
    let gw = digits.parse::<u8>().ok()?;
    is_valid_gameweek(gw).then_some(gw)
}

pub fn gameweek_key(gw: u8) -> String {
    format!("gw{gw}")
}

pub fn is_valid_gameweek(gw: u8) -> bool {
    (1..=SEASON_GAMEWEEKS).contains(&gw)
}

/// Current UI selection driving a recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSelection {
    pub active_gameweek: u8,
    pub window_size: u8,
    pub use_decay: bool,
}

impl Default for ViewSelection {
    fn default() -> Self {
        Self {
            active_gameweek: 1,
            window_size: 5,
            use_decay: false,
        }
    }
}

impl ViewSelection {
    pub fn window(&self) -> Vec<u8> {
        gameweek_window(self.active_gameweek, self.window_size)
    }
}
