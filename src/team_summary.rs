use std::collections::HashMap;

use serde::Serialize;

use crate::data::{TeamRatingRecord, TeamRecord};
use crate::stats;

/// Distribution of team ratings, used to anchor the card color scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub p10: f64,
    pub p90: f64,
}

impl RatingSummary {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        Some(Self {
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            mean: stats::mean(values),
            median: stats::median(values),
            p10: stats::quantile(values, 0.1),
            p90: stats::quantile(values, 0.9),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamCard {
    pub rank: usize,
    pub team_code: u32,
    pub team_short: String,
    pub spi: f64,
    pub off_rating: f64,
    pub def_rating: f64,
}

/// Joins ratings with team names and orders them strongest first, ranks starting at 1.
///
/// Ratings for teams missing from `teams` still get a card, with the code as the name.
pub fn team_cards(ratings: &[TeamRatingRecord], teams: &[TeamRecord]) -> Vec<TeamCard> {
    let names: HashMap<u32, &str> = teams
        .iter()
        .map(|t| (t.team_code, t.team_short.as_str()))
        .collect();

    let mut sorted: Vec<&TeamRatingRecord> = ratings.iter().collect();
    sorted.sort_by(|a, b| stats::cmp_nan_last(b.spi, a.spi));

    sorted
        .into_iter()
        .enumerate()
        .map(|(i, r)| TeamCard {
            rank: i + 1,
            team_code: r.team_code,
            team_short: names
                .get(&r.team_code)
                .map(|s| s.to_string())
                .unwrap_or_else(|| r.team_code.to_string()),
            spi: r.spi,
            off_rating: r.off_rating,
            def_rating: r.def_rating,
        })
        .collect()
}

pub fn rating_summary(ratings: &[TeamRatingRecord]) -> Option<RatingSummary> {
    let values: Vec<f64> = ratings.iter().map(|r| r.spi).collect();
    RatingSummary::from_values(&values)
}
