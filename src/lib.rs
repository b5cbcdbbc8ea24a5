pub mod config;
pub mod data;
pub mod difficulty;
pub mod gameweek;
pub mod ratings;
pub mod score_matrix;
pub mod stats;
pub mod team_fixtures;
pub mod team_summary;
pub mod xg_table;
