//! Fixture difficulty from opponent strength.
//!
//! Every gameweek in a window gets one opponent rating (adjusted for venue, averaged over
//! double/triple gameweeks, penalised when blank). The window is then rolled up into one
//! number per team, and teams are ranked easiest-first.

use std::collections::HashMap;

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::config::env_f64;
use crate::gameweek::ViewSelection;
use crate::ratings::RatingTable;
use crate::stats;
use crate::team_fixtures::{TeamSchedule, Venue};

/// A blank gameweek counts as an opponent 6% stronger than the strongest team.
pub const BLANK_PENALTY: f64 = 1.06;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RollUp {
    Mean,
    Median,
    WeightedMean,
    WeightedMedian,
    /// Average of the weighted mean and weighted median.
    Blended,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyConfig {
    /// Added to the opponent's rating when the observed team is at home.
    pub home_adjustment: f64,
    /// Added to the opponent's rating when the observed team is away.
    pub away_adjustment: f64,
    pub min_rating: f64,
    pub max_rating: f64,
    pub decay_lambda: f64,
    pub blank_multiplier: f64,
    pub plain: RollUp,
    pub decayed: RollUp,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self::ticker()
    }
}

impl DifficultyConfig {
    /// Fixture ticker: no venue adjustment, plain mean or time-decayed mean.
    pub fn ticker() -> Self {
        Self {
            home_adjustment: 0.0,
            away_adjustment: 0.0,
            min_rating: 70.0,
            max_rating: 100.0,
            decay_lambda: 0.3,
            blank_multiplier: BLANK_PENALTY,
            plain: RollUp::Mean,
            decayed: RollUp::WeightedMean,
        }
    }

    /// Home advantage knocks 15 points off the opponent; decayed mode blends the
    /// weighted mean and weighted median.
    pub fn blended() -> Self {
        Self {
            home_adjustment: -15.0,
            away_adjustment: 0.0,
            min_rating: 70.0,
            max_rating: 100.0,
            decay_lambda: 0.2,
            blank_multiplier: BLANK_PENALTY,
            plain: RollUp::Mean,
            decayed: RollUp::Blended,
        }
    }

    /// Replaces the floor and ceiling with the extremes of `ratings`, when it has any.
    pub fn with_dataset_bounds(mut self, ratings: &RatingTable) -> Self {
        if let Some(min) = ratings.min() {
            self.min_rating = min;
        }
        if let Some(max) = ratings.max() {
            self.max_rating = max;
        }
        self
    }

    /// Applies `FIXTURE_*` environment overrides on top of `self`.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = env_f64(&lookup, "FIXTURE_DECAY_LAMBDA") {
            self.decay_lambda = v.max(0.0);
        }
        if let Some(v) = env_f64(&lookup, "FIXTURE_HOME_ADJ") {
            self.home_adjustment = v;
        }
        if let Some(v) = env_f64(&lookup, "FIXTURE_AWAY_ADJ") {
            self.away_adjustment = v;
        }
        if let Some(v) = env_f64(&lookup, "FIXTURE_MIN_RATING") {
            self.min_rating = v;
        }
        if let Some(v) = env_f64(&lookup, "FIXTURE_MAX_RATING") {
            self.max_rating = v;
        }
        self
    }

    pub fn blank_rating(&self) -> f64 {
        self.max_rating * self.blank_multiplier
    }

    pub fn roll_up_for(&self, use_decay: bool) -> RollUp {
        if use_decay { self.decayed } else { self.plain }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedTeam {
    pub team_code: u32,
    pub metric_value: f64,
}

/// Difficulty of a single gameweek for the team owning `schedule`.
pub fn opponent_rating(
    schedule: &TeamSchedule,
    gw: u8,
    ratings: &RatingTable,
    cfg: &DifficultyConfig,
) -> f64 {
    let slot = schedule.slot(gw);
    if slot.is_blank() {
        return cfg.blank_rating();
    }

    let adjusted: Vec<f64> = slot
        .fixtures()
        .into_iter()
        .map(|f| {
            let Some(base) = ratings.get(f.opponent_code) else {
                debug!(
                    team = schedule.team_code,
                    opponent = f.opponent_code,
                    gw,
                    "opponent has no rating, assuming the strongest"
                );
                return cfg.max_rating;
            };
            let adj = match f.venue {
                Venue::Home => cfg.home_adjustment,
                Venue::Away => cfg.away_adjustment,
            };
            (base + adj).max(cfg.min_rating)
        })
        .collect();

    stats::mean(&adjusted)
}

/// One opponent rating per gameweek in `gw_list`, in window order.
pub fn window_ratings(
    schedule: &TeamSchedule,
    gw_list: &[u8],
    ratings: &RatingTable,
    cfg: &DifficultyConfig,
) -> Vec<f64> {
    gw_list
        .iter()
        .map(|&gw| opponent_rating(schedule, gw, ratings, cfg))
        .collect()
}

pub fn mean_rating(
    schedule: &TeamSchedule,
    gw_list: &[u8],
    ratings: &RatingTable,
    cfg: &DifficultyConfig,
) -> f64 {
    stats::mean(&window_ratings(schedule, gw_list, ratings, cfg))
}

pub fn median_rating(
    schedule: &TeamSchedule,
    gw_list: &[u8],
    ratings: &RatingTable,
    cfg: &DifficultyConfig,
) -> f64 {
    stats::median(&window_ratings(schedule, gw_list, ratings, cfg))
}

pub fn weighted_mean_rating(
    schedule: &TeamSchedule,
    gw_list: &[u8],
    ratings: &RatingTable,
    cfg: &DifficultyConfig,
) -> f64 {
    let values = window_ratings(schedule, gw_list, ratings, cfg);
    stats::weighted_mean(&values, &stats::decay_weights(values.len(), cfg.decay_lambda))
}

pub fn weighted_median_rating(
    schedule: &TeamSchedule,
    gw_list: &[u8],
    ratings: &RatingTable,
    cfg: &DifficultyConfig,
) -> f64 {
    let values = window_ratings(schedule, gw_list, ratings, cfg);
    stats::weighted_median(&values, &stats::decay_weights(values.len(), cfg.decay_lambda))
}

/// Rolls a window of per-gameweek ratings into a single metric. Empty windows give NaN.
pub fn roll_up(values: &[f64], mode: RollUp, decay_lambda: f64) -> f64 {
    let weights = || stats::decay_weights(values.len(), decay_lambda);
    match mode {
        RollUp::Mean => stats::mean(values),
        RollUp::Median => stats::median(values),
        RollUp::WeightedMean => stats::weighted_mean(values, &weights()),
        RollUp::WeightedMedian => stats::weighted_median(values, &weights()),
        RollUp::Blended => {
            let w = weights();
            (stats::weighted_mean(values, &w) + stats::weighted_median(values, &w)) / 2.0
        }
    }
}

pub fn team_metric(
    schedule: &TeamSchedule,
    gw_list: &[u8],
    ratings: &RatingTable,
    cfg: &DifficultyConfig,
    mode: RollUp,
) -> f64 {
    let values = window_ratings(schedule, gw_list, ratings, cfg);
    roll_up(&values, mode, cfg.decay_lambda)
}

/// Ranks `team_codes` easiest schedule first.
///
/// Teams missing from `schedules` are treated as blank in every gameweek. Equal metrics
/// keep their input order; NaN metrics (empty window) sort last.
pub fn rank_teams(
    team_codes: &[u32],
    schedules: &HashMap<u32, TeamSchedule>,
    ratings: &RatingTable,
    gw_list: &[u8],
    mode: RollUp,
    cfg: &DifficultyConfig,
) -> Vec<RankedTeam> {
    let mut ranked: Vec<RankedTeam> = team_codes
        .par_iter()
        .map(|&code| {
            let metric_value = match schedules.get(&code) {
                Some(schedule) => team_metric(schedule, gw_list, ratings, cfg, mode),
                None => team_metric(&TeamSchedule::new(code), gw_list, ratings, cfg, mode),
            };
            RankedTeam {
                team_code: code,
                metric_value,
            }
        })
        .collect();

    ranked.sort_by(|a, b| stats::cmp_nan_last(a.metric_value, b.metric_value));
    ranked
}

/// Ranks for the current UI selection: its window, and the decayed roll-up when toggled on.
pub fn rank_for_selection(
    team_codes: &[u32],
    schedules: &HashMap<u32, TeamSchedule>,
    ratings: &RatingTable,
    selection: &ViewSelection,
    cfg: &DifficultyConfig,
) -> Vec<RankedTeam> {
    let window = selection.window();
    let mode = cfg.roll_up_for(selection.use_decay);
    rank_teams(team_codes, schedules, ratings, &window, mode, cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::team_fixtures::Fixture;

    fn table() -> RatingTable {
        RatingTable::from_pairs([(2, 80.0), (3, 90.0), (4, 100.0), (5, 60.0)])
    }

    #[test]
    fn blank_gameweek_uses_sentinel() {
        let cfg = DifficultyConfig::ticker();
        let s = TeamSchedule::new(1);
        assert!((opponent_rating(&s, 5, &table(), &cfg) - 106.0).abs() < 1e-9);
    }

    #[test]
    fn venue_adjustment_and_floor() {
        let cfg = DifficultyConfig::blended();
        let s = TeamSchedule::from_fixtures(
            1,
            vec![
                Fixture::new(3, 1, Venue::Home),
                Fixture::new(3, 2, Venue::Away),
                Fixture::new(5, 3, Venue::Home),
            ],
        );
        assert_eq!(opponent_rating(&s, 1, &table(), &cfg), 75.0);
        assert_eq!(opponent_rating(&s, 2, &table(), &cfg), 90.0);
        // 60 - 15 is clamped up to the floor.
        assert_eq!(opponent_rating(&s, 3, &table(), &cfg), 70.0);
    }

    #[test]
    fn unknown_opponent_counts_as_strongest() {
        let cfg = DifficultyConfig::ticker();
        let s = TeamSchedule::from_fixtures(1, vec![Fixture::new(99, 4, Venue::Away)]);
        assert_eq!(opponent_rating(&s, 4, &table(), &cfg), 100.0);
    }

    #[test]
    fn double_gameweek_averages_matches() {
        let cfg = DifficultyConfig::ticker();
        let s = TeamSchedule::from_fixtures(
            1,
            vec![Fixture::new(2, 7, Venue::Home), Fixture::new(4, 7, Venue::Away)],
        );
        assert_eq!(opponent_rating(&s, 7, &table(), &cfg), 90.0);
    }

    #[test]
    fn dataset_bounds_replace_floor_and_ceiling() {
        let cfg = DifficultyConfig::ticker().with_dataset_bounds(&table());
        assert_eq!(cfg.min_rating, 60.0);
        assert_eq!(cfg.max_rating, 100.0);
        let empty = DifficultyConfig::ticker().with_dataset_bounds(&RatingTable::new());
        assert_eq!(empty, DifficultyConfig::ticker());
    }

    #[test]
    fn blended_is_midpoint_of_weighted_mean_and_median() {
        let values = [80.0, 100.0, 90.0];
        let wm = roll_up(&values, RollUp::WeightedMean, 0.3);
        let wmed = roll_up(&values, RollUp::WeightedMedian, 0.3);
        let blended = roll_up(&values, RollUp::Blended, 0.3);
        assert!((blended - (wm + wmed) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn empty_window_is_nan() {
        for mode in [
            RollUp::Mean,
            RollUp::Median,
            RollUp::WeightedMean,
            RollUp::WeightedMedian,
            RollUp::Blended,
        ] {
            assert!(roll_up(&[], mode, 0.3).is_nan());
        }
    }

    #[test]
    fn env_overrides_apply_and_ignore_garbage() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("FIXTURE_DECAY_LAMBDA", "0.5"),
            ("FIXTURE_HOME_ADJ", "-10"),
            ("FIXTURE_MIN_RATING", "not-a-number"),
        ]);
        let cfg = DifficultyConfig::ticker().with_overrides(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.decay_lambda, 0.5);
        assert_eq!(cfg.home_adjustment, -10.0);
        assert_eq!(cfg.min_rating, 70.0);
    }
}
