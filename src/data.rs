//! Record shapes of the dashboard's JSON files and conversions into the typed model.
//!
//! Reading the files is left to the caller; everything here works on strings.

use std::collections::{BTreeMap, HashMap};

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::gameweek::parse_gameweek_key;
use crate::ratings::RatingTable;
use crate::score_matrix::ScoreMatrix;
use crate::team_fixtures::{Fixture, TeamSchedule, Venue};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub team_code: u32,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub team_short: String,
    /// Opponent strength used by the fixture ticker. Other rating columns in the
    /// teams file are ignored.
    #[serde(default)]
    pub elo_opta: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRatingRecord {
    pub team_code: u32,
    pub spi: f64,
    #[serde(default)]
    pub off_rating: f64,
    #[serde(default)]
    pub def_rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerMatchRecord {
    pub opponent: u32,
    pub home_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerFixturesRecord {
    pub team_code: u32,
    #[serde(default)]
    pub fixtures: BTreeMap<String, Vec<TickerMatchRecord>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    pub fixture_id: u32,
    pub gw: u8,
    pub home_team_code: u32,
    pub away_team_code: u32,
    #[serde(default)]
    pub home_team: String,
    #[serde(default)]
    pub away_team: String,
    pub home_xg: f64,
    pub away_xg: f64,
    /// P(home scores 0), i.e. the away side's clean-sheet probability.
    pub home_goals_0_prob: f64,
    /// P(away scores 0), i.e. the home side's clean-sheet probability.
    pub away_goals_0_prob: f64,
    #[serde(default)]
    pub match_date: Option<Value>,
}

impl ForecastRecord {
    /// Kickoff date from either an epoch-milliseconds number or an ISO date string.
    pub fn kickoff_date(&self) -> Option<NaiveDate> {
        match self.match_date.as_ref()? {
            Value::Number(n) => {
                let ms = n.as_i64()?;
                DateTime::from_timestamp_millis(ms).map(|dt| dt.date_naive())
            }
            Value::String(s) => parse_date_prefix(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreMatrixRecord {
    pub fixture_id: u32,
    pub score_matrix: Vec<Vec<f64>>,
}

impl ScoreMatrixRecord {
    pub fn to_matrix(&self) -> Result<ScoreMatrix> {
        ScoreMatrix::from_away_major(self.score_matrix.clone())
            .with_context(|| format!("fixture {} has an invalid score matrix", self.fixture_id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Freshness {
    Fresh,
    Aging,
    Stale,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Last completed gameweek.
    pub active_gw: u8,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub season: Option<u16>,
}

impl DashboardConfig {
    /// The gameweek the dashboard opens on: the one after the last completed.
    pub fn display_gameweek(&self) -> u8 {
        self.active_gw.saturating_add(1)
    }

    pub fn last_updated_date(&self) -> Option<NaiveDate> {
        self.last_updated.as_deref().and_then(parse_date_prefix)
    }

    /// Within 2 days is fresh, within a week is aging, older (or unknown) is stale.
    pub fn freshness(&self, today: NaiveDate) -> Freshness {
        let Some(updated) = self.last_updated_date() else {
            return Freshness::Stale;
        };
        let days = (today - updated).num_days();
        if days <= 2 {
            Freshness::Fresh
        } else if days <= 7 {
            Freshness::Aging
        } else {
            Freshness::Stale
        }
    }

    /// Season label such as `2025-26`, from the two-digit starting year.
    /// Anything that is not a two-digit year has no label.
    pub fn season_label(&self) -> Option<String> {
        let start = self.season.filter(|s| *s <= 99)?;
        Some(format!("20{start:02}-{:02}", (start + 1) % 100))
    }
}

fn parse_date_prefix(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    let head = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

fn parse_array<T: for<'de> Deserialize<'de>>(raw: &str, what: &str) -> Result<Vec<T>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    serde_json::from_str(trimmed).with_context(|| format!("invalid {what} json"))
}

pub fn parse_teams_json(raw: &str) -> Result<Vec<TeamRecord>> {
    parse_array(raw, "teams")
}

pub fn parse_team_ratings_json(raw: &str) -> Result<Vec<TeamRatingRecord>> {
    parse_array(raw, "team ratings")
}

pub fn parse_ticker_fixtures_json(raw: &str) -> Result<Vec<TickerFixturesRecord>> {
    parse_array(raw, "fixtures")
}

pub fn parse_forecasts_json(raw: &str) -> Result<Vec<ForecastRecord>> {
    parse_array(raw, "match forecasts")
}

pub fn parse_score_matrices_json(raw: &str) -> Result<Vec<ScoreMatrixRecord>> {
    parse_array(raw, "score matrix")
}

pub fn parse_config_json(raw: &str) -> Result<DashboardConfig> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(anyhow!("empty config"));
    }
    serde_json::from_str(trimmed).context("invalid config json")
}

/// Rating lookup from team records; teams without an `elo_opta` rating are left out.
pub fn rating_table(teams: &[TeamRecord]) -> RatingTable {
    RatingTable::from_pairs(
        teams
            .iter()
            .filter_map(|t| t.elo_opta.map(|e| (t.team_code, e))),
    )
}

pub fn spi_table(ratings: &[TeamRatingRecord]) -> RatingTable {
    RatingTable::from_pairs(ratings.iter().map(|r| (r.team_code, r.spi)))
}

/// Converts ticker records to schedules. Unknown gameweek keys and venue labels are
/// skipped with a warning.
pub fn schedules_from_ticker(records: &[TickerFixturesRecord]) -> HashMap<u32, TeamSchedule> {
    let mut out: HashMap<u32, TeamSchedule> = HashMap::new();
    for rec in records {
        let schedule = out
            .entry(rec.team_code)
            .or_insert_with(|| TeamSchedule::new(rec.team_code));
        for (key, matches) in &rec.fixtures {
            let Some(gw) = parse_gameweek_key(key) else {
                warn!(team = rec.team_code, key = %key, "skipping unknown gameweek key");
                continue;
            };
            for m in matches {
                let Some(venue) = Venue::from_label(&m.home_label) else {
                    warn!(team = rec.team_code, gw, label = %m.home_label, "skipping fixture without venue");
                    continue;
                };
                schedule.push(Fixture::new(m.opponent, gw, venue));
            }
        }
    }
    out
}

pub fn find_score_matrix(records: &[ScoreMatrixRecord], fixture_id: u32) -> Option<&ScoreMatrixRecord> {
    records.iter().find(|r| r.fixture_id == fixture_id)
}

pub fn fixtures_for_gameweek(forecasts: &[ForecastRecord], gw: u8) -> Vec<&ForecastRecord> {
    forecasts.iter().filter(|f| f.gw == gw).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(last_updated: Option<&str>) -> DashboardConfig {
        DashboardConfig {
            active_gw: 37,
            last_updated: last_updated.map(str::to_string),
            season: Some(25),
        }
    }

    #[test]
    fn freshness_thresholds() {
        let today = NaiveDate::from_ymd_opt(2025, 7, 10).unwrap();
        assert_eq!(config(Some("2025-07-08")).freshness(today), Freshness::Fresh);
        assert_eq!(config(Some("2025-07-03T09:00:00Z")).freshness(today), Freshness::Aging);
        assert_eq!(config(Some("2025-07-02")).freshness(today), Freshness::Stale);
        assert_eq!(config(None).freshness(today), Freshness::Stale);
    }

    #[test]
    fn display_gameweek_and_season_label() {
        let c = config(None);
        assert_eq!(c.display_gameweek(), 38);
        assert_eq!(c.season_label().as_deref(), Some("2025-26"));
    }

    #[test]
    fn season_label_needs_a_two_digit_year() {
        let mut c = config(None);
        c.season = Some(99);
        assert_eq!(c.season_label().as_deref(), Some("2099-00"));
        c.season = Some(2025);
        assert_eq!(c.season_label(), None);
        c.season = Some(u16::MAX);
        assert_eq!(c.season_label(), None);
        c.season = None;
        assert_eq!(c.season_label(), None);
    }

    #[test]
    fn kickoff_date_accepts_millis_and_strings() {
        let mut rec = ForecastRecord {
            fixture_id: 1,
            gw: 1,
            home_team_code: 3,
            away_team_code: 7,
            home_team: String::new(),
            away_team: String::new(),
            home_xg: 1.2,
            away_xg: 0.9,
            home_goals_0_prob: 0.3,
            away_goals_0_prob: 0.4,
            match_date: Some(Value::from(1_755_302_400_000_i64)),
        };
        assert_eq!(rec.kickoff_date(), NaiveDate::from_ymd_opt(2025, 8, 16));
        rec.match_date = Some(Value::from("2025-08-16 15:00"));
        assert_eq!(rec.kickoff_date(), NaiveDate::from_ymd_opt(2025, 8, 16));
        rec.match_date = None;
        assert_eq!(rec.kickoff_date(), None);
    }
}
