//! Correct-score matrices and the summaries derived from them.
//!
//! Matrices are stored home-major: `cells[h][a]` is the probability that the home side
//! scores `h` and the away side scores `a`. Rows are home goals, columns away goals.
//! Published score-matrix files use the transpose (rows are away goals); build those with
//! [`ScoreMatrix::from_away_major`].

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// Display buckets per side: 0, 1, 2, 3 and "4+".
pub const DISPLAY_CAP: usize = 5;

/// Allowed distance of the total probability mass from 1. Published matrices are
/// truncated at a maximum goal count, so a little mass is missing.
pub const DEFAULT_MASS_TOLERANCE: f64 = 1e-3;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreMatrixError {
    #[error("score matrix is empty")]
    Empty,

    #[error("score matrix row {row} has {len} cells, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("score matrix cell [{row}][{col}] is not a probability: {value}")]
    InvalidCell { row: usize, col: usize, value: f64 },

    #[error("score matrix mass is {total}, expected 1")]
    MassMismatch { total: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMatrix {
    cells: Vec<Vec<f64>>,
}

impl ScoreMatrix {
    pub fn new(cells: Vec<Vec<f64>>) -> Result<Self, ScoreMatrixError> {
        Self::with_tolerance(cells, DEFAULT_MASS_TOLERANCE)
    }

    pub fn with_tolerance(cells: Vec<Vec<f64>>, tolerance: f64) -> Result<Self, ScoreMatrixError> {
        validate(&cells, tolerance)?;
        Ok(Self { cells })
    }

    /// Builds from the published layout, where `raw[a][h]` holds away goals on the rows.
    pub fn from_away_major(raw: Vec<Vec<f64>>) -> Result<Self, ScoreMatrixError> {
        Self::new(transpose(raw)?)
    }

    pub fn size(&self) -> usize {
        self.cells.len()
    }

    pub fn cell(&self, home_goals: usize, away_goals: usize) -> f64 {
        self.cells
            .get(home_goals)
            .and_then(|row| row.get(away_goals))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.cells
    }

    pub fn total(&self) -> f64 {
        self.cells.iter().flatten().sum()
    }

    /// P(home scores exactly k), for k in `0..size`.
    pub fn home_marginals(&self) -> Vec<f64> {
        self.cells.iter().map(|row| row.iter().sum()).collect()
    }

    /// P(away scores exactly k), for k in `0..size`.
    pub fn away_marginals(&self) -> Vec<f64> {
        (0..self.size())
            .map(|a| self.cells.iter().map(|row| row[a]).sum())
            .collect()
    }
}

fn transpose(raw: Vec<Vec<f64>>) -> Result<Vec<Vec<f64>>, ScoreMatrixError> {
    check_square(&raw)?;
    let n = raw.len();
    Ok((0..n).map(|h| (0..n).map(|a| raw[a][h]).collect()).collect())
}

fn check_square(cells: &[Vec<f64>]) -> Result<(), ScoreMatrixError> {
    let n = cells.len();
    if n == 0 {
        return Err(ScoreMatrixError::Empty);
    }
    for (row, values) in cells.iter().enumerate() {
        if values.len() != n {
            return Err(ScoreMatrixError::NotSquare {
                row,
                len: values.len(),
                expected: n,
            });
        }
    }
    Ok(())
}

fn validate(cells: &[Vec<f64>], tolerance: f64) -> Result<(), ScoreMatrixError> {
    check_square(cells)?;
    for (row, values) in cells.iter().enumerate() {
        for (col, &value) in values.iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(ScoreMatrixError::InvalidCell { row, col, value });
            }
        }
    }
    let total: f64 = cells.iter().flatten().sum();
    if (total - 1.0).abs() > tolerance {
        warn!(total, tolerance, "score matrix does not sum to 1");
        return Err(ScoreMatrixError::MassMismatch { total });
    }
    Ok(())
}

/// Display bucket for a goal count; everything from `DISPLAY_CAP - 1` up shares the last one.
pub fn group_goal(goals: usize) -> usize {
    goals.min(DISPLAY_CAP - 1)
}

/// Bins the full matrix into `DISPLAY_CAP x DISPLAY_CAP`, rows home goals, columns away goals.
pub fn group_matrix(matrix: &ScoreMatrix) -> [[f64; DISPLAY_CAP]; DISPLAY_CAP] {
    let mut grouped = [[0.0; DISPLAY_CAP]; DISPLAY_CAP];
    for (h, row) in matrix.rows().iter().enumerate() {
        for (a, p) in row.iter().enumerate() {
            grouped[group_goal(h)][group_goal(a)] += p;
        }
    }
    grouped
}

/// Folds per-goal probabilities into display buckets; the last bucket collects the tail.
pub fn group_marginals(probs: &[f64]) -> [f64; DISPLAY_CAP] {
    let mut grouped = [0.0; DISPLAY_CAP];
    for (k, p) in probs.iter().enumerate() {
        grouped[group_goal(k)] += p;
    }
    grouped
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Home,
    Draw,
    Away,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prob3 {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

impl Prob3 {
    pub fn get(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Home => self.home,
            Outcome::Draw => self.draw,
            Outcome::Away => self.away,
        }
    }

    pub fn sum(&self) -> f64 {
        self.home + self.draw + self.away
    }
}

/// Win/draw/loss from the raw matrix: below the diagonal the home side scored more.
///
/// This agrees with [`ScoreMatrix::home_marginals`]. The published away-major files
/// were read the other way round by the dashboard, so its home-win and away-win figures
/// come out swapped relative to these.
pub fn outcome_probs(matrix: &ScoreMatrix) -> Prob3 {
    let mut home = 0.0;
    let mut draw = 0.0;
    let mut away = 0.0;
    for (h, row) in matrix.rows().iter().enumerate() {
        home += row[..h].iter().sum::<f64>();
        draw += row[h];
        away += row[h + 1..].iter().sum::<f64>();
    }
    Prob3 { home, draw, away }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchForecast {
    pub grouped_matrix: [[f64; DISPLAY_CAP]; DISPLAY_CAP],
    pub home_marginals: [f64; DISPLAY_CAP],
    pub away_marginals: [f64; DISPLAY_CAP],
    pub home_win_prob: f64,
    pub draw_prob: f64,
    pub away_win_prob: f64,
}

impl MatchForecast {
    pub fn outcomes(&self) -> Prob3 {
        Prob3 {
            home: self.home_win_prob,
            draw: self.draw_prob,
            away: self.away_win_prob,
        }
    }

    /// True when `outcome` is (jointly) the most likely result.
    pub fn is_favourite(&self, outcome: Outcome) -> bool {
        let p = self.outcomes();
        let max = p.home.max(p.draw).max(p.away);
        p.get(outcome) == max
    }

    /// Largest single cell in the grouped matrix, used to scale cell shading.
    pub fn grouped_max(&self) -> f64 {
        self.grouped_matrix
            .iter()
            .flatten()
            .copied()
            .fold(0.0, f64::max)
    }
}

pub fn forecast(matrix: &ScoreMatrix) -> MatchForecast {
    let outcomes = outcome_probs(matrix);
    MatchForecast {
        grouped_matrix: group_matrix(matrix),
        home_marginals: group_marginals(&matrix.home_marginals()),
        away_marginals: group_marginals(&matrix.away_marginals()),
        home_win_prob: outcomes.home,
        draw_prob: outcomes.draw,
        away_win_prob: outcomes.away,
    }
}
