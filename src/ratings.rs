use std::collections::HashMap;

use crate::stats;

/// Team code → scalar strength rating (Elo/SPI-like).
#[derive(Debug, Clone, Default)]
pub struct RatingTable {
    ratings: HashMap<u32, f64>,
}

impl RatingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (u32, f64)>) -> Self {
        Self {
            ratings: pairs.into_iter().collect(),
        }
    }

    pub fn get(&self, team_code: u32) -> Option<f64> {
        self.ratings.get(&team_code).copied()
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    pub fn min(&self) -> Option<f64> {
        self.ratings.values().copied().reduce(f64::min)
    }

    pub fn max(&self) -> Option<f64> {
        self.ratings.values().copied().reduce(f64::max)
    }

    pub fn median(&self) -> Option<f64> {
        let values: Vec<f64> = self.ratings.values().copied().collect();
        let m = stats::median(&values);
        (!m.is_nan()).then_some(m)
    }
}
