use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Venue {
    Home,
    Away,
}

impl Venue {
    /// Accepts the `H`/`A` labels used by the fixture feeds, in either case.
    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "h" | "home" => Some(Venue::Home),
            "a" | "away" => Some(Venue::Away),
            _ => None,
        }
    }
}

/// A single match seen from one team's side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub fixture_id: Option<u32>,
    pub opponent_code: u32,
    pub gameweek: u8,
    pub venue: Venue,
    pub xg_for: Option<f64>,
    pub cs_prob: Option<f64>,
}

impl Fixture {
    pub fn new(opponent_code: u32, gameweek: u8, venue: Venue) -> Self {
        Self {
            fixture_id: None,
            opponent_code,
            gameweek,
            venue,
            xg_for: None,
            cs_prob: None,
        }
    }
}

/// How many matches a team plays in one gameweek.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameweekSlot<'a> {
    Blank,
    Single(&'a Fixture),
    Double(&'a Fixture, &'a Fixture),
    Multi(&'a [Fixture]),
}

impl<'a> GameweekSlot<'a> {
    pub fn from_fixtures(fixtures: &'a [Fixture]) -> Self {
        match fixtures {
            [] => GameweekSlot::Blank,
            [one] => GameweekSlot::Single(one),
            [first, second] => GameweekSlot::Double(first, second),
            many => GameweekSlot::Multi(many),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            GameweekSlot::Blank => 0,
            GameweekSlot::Single(_) => 1,
            GameweekSlot::Double(..) => 2,
            GameweekSlot::Multi(all) => all.len(),
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, GameweekSlot::Blank)
    }

    pub fn fixtures(&self) -> Vec<&'a Fixture> {
        match *self {
            GameweekSlot::Blank => Vec::new(),
            GameweekSlot::Single(f) => vec![f],
            GameweekSlot::Double(a, b) => vec![a, b],
            GameweekSlot::Multi(all) => all.iter().collect(),
        }
    }
}

/// One team's fixtures keyed by gameweek.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamSchedule {
    pub team_code: u32,
    by_gameweek: BTreeMap<u8, Vec<Fixture>>,
}

impl TeamSchedule {
    pub fn new(team_code: u32) -> Self {
        Self {
            team_code,
            by_gameweek: BTreeMap::new(),
        }
    }

    pub fn from_fixtures(team_code: u32, fixtures: impl IntoIterator<Item = Fixture>) -> Self {
        let mut out = Self::new(team_code);
        for f in fixtures {
            out.push(f);
        }
        out
    }

    pub fn push(&mut self, fixture: Fixture) {
        self.by_gameweek
            .entry(fixture.gameweek)
            .or_default()
            .push(fixture);
    }

    pub fn fixtures_in(&self, gw: u8) -> &[Fixture] {
        self.by_gameweek.get(&gw).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn slot(&self, gw: u8) -> GameweekSlot<'_> {
        GameweekSlot::from_fixtures(self.fixtures_in(gw))
    }

    pub fn gameweeks(&self) -> impl Iterator<Item = u8> + '_ {
        self.by_gameweek.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fixture> {
        self.by_gameweek.values().flatten()
    }
}
