use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use fixture_lab::data::{parse_forecasts_json, parse_team_ratings_json, parse_teams_json};
use fixture_lab::gameweek::gameweek_window;
use fixture_lab::team_summary::{rating_summary, team_cards};
use fixture_lab::xg_table::{
    XgMetric, XgSortKey, any_double_gameweeks, compute_xg_table, sort_xg_rows,
    team_fixtures_from_forecasts,
};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn attack_table_sums_window_xg() {
    let forecasts =
        parse_forecasts_json(&read_fixture("match_forecasts.json")).expect("fixture should parse");
    let schedules = team_fixtures_from_forecasts(&forecasts);
    let gws = gameweek_window(20, 2);
    let rows = compute_xg_table(&schedules, &gws, XgMetric::Attack);

    // Arsenal: 2.1 in GW20, then 1.2 + 1.7 in a GW21 double.
    assert_eq!(rows[0].team_code, 3);
    assert!((rows[0].total - 5.0).abs() < 1e-9);
    assert!((rows[0].gameweek_total(21) - 2.9).abs() < 1e-9);
    assert!(any_double_gameweeks(&rows));

    let totals: Vec<f64> = rows.iter().map(|r| r.total).collect();
    assert!(totals.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn defence_table_uses_opponent_zero_goal_probability() {
    let forecasts =
        parse_forecasts_json(&read_fixture("match_forecasts.json")).expect("fixture should parse");
    let schedules = team_fixtures_from_forecasts(&forecasts);
    let rows = compute_xg_table(&schedules, &[20], XgMetric::Defence);
    let arsenal = rows.iter().find(|r| r.team_code == 3).expect("arsenal row");
    let fulham = rows.iter().find(|r| r.team_code == 54).expect("fulham row");
    assert!((arsenal.total - 0.55).abs() < 1e-9);
    assert!((fulham.total - 0.12).abs() < 1e-9);
    assert_eq!(rows[0].team_code, 3);
}

#[test]
fn rows_resort_by_gameweek_and_team_name() {
    let forecasts =
        parse_forecasts_json(&read_fixture("match_forecasts.json")).expect("fixture should parse");
    let teams = parse_teams_json(&read_fixture("teams.json")).expect("fixture should parse");
    let names: HashMap<u32, String> = teams
        .iter()
        .map(|t| (t.team_code, t.team_short.clone()))
        .collect();
    let schedules = team_fixtures_from_forecasts(&forecasts);
    let mut rows = compute_xg_table(&schedules, &[20, 21], XgMetric::Attack);

    sort_xg_rows(&mut rows, XgSortKey::Team, true, &names);
    let order: Vec<&str> = rows.iter().map(|r| names[&r.team_code].as_str()).collect();
    assert_eq!(order, vec!["ARS", "CHE", "FUL", "LIV"]);

    sort_xg_rows(&mut rows, XgSortKey::Gameweek(21), false, &names);
    assert_eq!(rows[0].team_code, 3);
    assert_eq!(rows.last().map(|r| r.team_code), Some(8));
}

#[test]
fn rating_cards_from_fixtures() {
    let ratings =
        parse_team_ratings_json(&read_fixture("team_ratings.json")).expect("fixture should parse");
    let teams = parse_teams_json(&read_fixture("teams.json")).expect("fixture should parse");
    let cards = team_cards(&ratings, &teams);
    let order: Vec<&str> = cards.iter().map(|c| c.team_short.as_str()).collect();
    assert_eq!(order, vec!["ARS", "LIV", "FUL"]);

    let summary = rating_summary(&ratings).expect("non-empty");
    assert_eq!(summary.median, 66.0);
    assert_eq!(summary.max, 68.2);
}
