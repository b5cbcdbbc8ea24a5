use std::collections::HashMap;

use serde::Serialize;

use crate::data::ForecastRecord;
use crate::stats::cmp_nan_last;
use crate::team_fixtures::{Fixture, TeamSchedule, Venue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum XgMetric {
    /// Expected goals for.
    Attack,
    /// Clean-sheet probability.
    Defence,
}

impl XgMetric {
    pub fn value(self, fixture: &Fixture) -> f64 {
        match self {
            XgMetric::Attack => fixture.xg_for,
            XgMetric::Defence => fixture.cs_prob,
        }
        .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XgSortKey {
    Total,
    /// Team short name, looked up by the caller-provided map.
    Team,
    Gameweek(u8),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XgRow {
    pub team_code: u32,
    pub total: f64,
    /// One entry per window gameweek; each holds the per-fixture values (empty when blank).
    pub cells: Vec<(u8, Vec<f64>)>,
}

impl XgRow {
    pub fn gameweek_total(&self, gw: u8) -> f64 {
        self.cells
            .iter()
            .find(|(g, _)| *g == gw)
            .map(|(_, v)| v.iter().sum())
            .unwrap_or(0.0)
    }
}

/// Splits each forecast into a home-side and an away-side fixture.
///
/// A side keeps a clean sheet when the other side scores zero, so the home view takes
/// `away_goals_0_prob` and the away view `home_goals_0_prob`.
pub fn team_fixtures_from_forecasts(forecasts: &[ForecastRecord]) -> HashMap<u32, TeamSchedule> {
    let mut out: HashMap<u32, TeamSchedule> = HashMap::new();
    for f in forecasts {
        let home = Fixture {
            fixture_id: Some(f.fixture_id),
            opponent_code: f.away_team_code,
            gameweek: f.gw,
            venue: Venue::Home,
            xg_for: Some(f.home_xg),
            cs_prob: Some(f.away_goals_0_prob),
        };
        let away = Fixture {
            fixture_id: Some(f.fixture_id),
            opponent_code: f.home_team_code,
            gameweek: f.gw,
            venue: Venue::Away,
            xg_for: Some(f.away_xg),
            cs_prob: Some(f.home_goals_0_prob),
        };
        out.entry(f.home_team_code)
            .or_insert_with(|| TeamSchedule::new(f.home_team_code))
            .push(home);
        out.entry(f.away_team_code)
            .or_insert_with(|| TeamSchedule::new(f.away_team_code))
            .push(away);
    }
    out
}

pub fn xg_row(schedule: &TeamSchedule, gameweeks: &[u8], metric: XgMetric) -> XgRow {
    let cells: Vec<(u8, Vec<f64>)> = gameweeks
        .iter()
        .map(|&gw| {
            let values = schedule
                .fixtures_in(gw)
                .iter()
                .map(|f| metric.value(f))
                .collect();
            (gw, values)
        })
        .collect();
    let total: f64 = cells.iter().flat_map(|(_, v)| v.iter()).sum();
    XgRow {
        team_code: schedule.team_code,
        total,
        cells,
    }
}

/// Window totals per team, highest first. Ties keep team-code order.
pub fn compute_xg_table(
    schedules: &HashMap<u32, TeamSchedule>,
    gameweeks: &[u8],
    metric: XgMetric,
) -> Vec<XgRow> {
    let mut codes: Vec<u32> = schedules.keys().copied().collect();
    codes.sort_unstable();
    let mut rows: Vec<XgRow> = codes
        .iter()
        .filter_map(|code| schedules.get(code))
        .map(|s| xg_row(s, gameweeks, metric))
        .collect();
    rows.sort_by(|a, b| cmp_nan_last(b.total, a.total));
    rows
}

/// Whether any team plays more than once in any window gameweek.
pub fn any_double_gameweeks(rows: &[XgRow]) -> bool {
    rows.iter()
        .any(|r| r.cells.iter().any(|(_, values)| values.len() > 1))
}

/// Re-sorts rows by a column header. `short_names` supplies the text for [`XgSortKey::Team`].
pub fn sort_xg_rows(
    rows: &mut [XgRow],
    key: XgSortKey,
    ascending: bool,
    short_names: &HashMap<u32, String>,
) {
    rows.sort_by(|a, b| {
        let ord = match key {
            XgSortKey::Total => cmp_nan_last(a.total, b.total),
            XgSortKey::Gameweek(gw) => cmp_nan_last(a.gameweek_total(gw), b.gameweek_total(gw)),
            XgSortKey::Team => {
                let an = short_names.get(&a.team_code).map(String::as_str).unwrap_or("");
                let bn = short_names.get(&b.team_code).map(String::as_str).unwrap_or("");
                an.cmp(bn)
            }
        };
        if ascending { ord } else { ord.reverse() }
    });
}

/// Toggles direction when the same column is clicked again; a new column starts descending.
pub fn next_sort_direction(previous: Option<(XgSortKey, bool)>, key: XgSortKey) -> bool {
    match previous {
        Some((prev_key, ascending)) if prev_key == key => !ascending,
        _ => false,
    }
}
