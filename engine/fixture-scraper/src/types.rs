use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::parser::ParsedRow;

/// Marker written in the Match column of a placeholder row
pub const ERROR_MARKER: &str = "ERROR";

/// A team whose fixture page is scraped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamEntry {
    /// Display name written to the Team column (e.g., "Bayern Munich")
    pub name: String,
    /// futbol24 team page
    pub url: String,
}

impl TeamEntry {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self { name: name.into(), url: url.into() }
    }
}

/// An upcoming fixture found on a team page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    /// Team whose page listed the fixture
    pub team: String,
    /// "Home vs Away"
    pub match_desc: String,
    /// Best-effort competition label, may be empty
    pub competition: String,
    /// Date as printed on the page (DD.MM.YYYY)
    pub date: String,
    /// Kickoff (HH:MM) or "TBC"
    pub time: String,
}

impl Fixture {
    pub fn from_parsed(team: &str, row: ParsedRow) -> Self {
        Self {
            team: team.to_string(),
            match_desc: row.match_desc,
            competition: row.competition,
            date: row.date,
            time: row.time,
        }
    }
}

/// One line of the output table, in CSV column order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRow {
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "Match")]
    pub match_desc: String,
    #[serde(rename = "Competition")]
    pub competition: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Time")]
    pub time: String,
}

impl OutputRow {
    /// Row standing in for a team whose fixtures could not be produced
    pub fn placeholder(team: &str, reason: &str) -> Self {
        Self {
            team: team.to_string(),
            match_desc: ERROR_MARKER.to_string(),
            competition: reason.to_string(),
            date: String::new(),
            time: String::new(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.match_desc == ERROR_MARKER && self.date.is_empty() && self.time.is_empty()
    }

    /// Cells in column order
    pub fn to_record(&self) -> [&str; 5] {
        [&self.team, &self.match_desc, &self.competition, &self.date, &self.time]
    }
}

impl From<Fixture> for OutputRow {
    fn from(fixture: Fixture) -> Self {
        Self {
            team: fixture.team,
            match_desc: fixture.match_desc,
            competition: fixture.competition,
            date: fixture.date,
            time: fixture.time,
        }
    }
}

/// What happened to a single team during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub team: String,
    /// Number of fixture rows emitted
    pub fixtures: usize,
    /// Failure reason when a placeholder row was emitted instead
    pub error: Option<String>,
}

/// Everything produced by one run over the configured teams
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureReport {
    /// When the run started
    pub generated_at: DateTime<Utc>,
    /// Output table, in team order
    pub rows: Vec<OutputRow>,
    /// One entry per processed team
    pub teams: Vec<TeamSummary>,
}

impl FixtureReport {
    pub fn new() -> Self {
        Self { generated_at: Utc::now(), rows: Vec::new(), teams: Vec::new() }
    }

    /// Append the fixtures of a team that was scraped successfully
    pub fn push_fixtures(&mut self, team: &str, fixtures: Vec<Fixture>) {
        self.teams.push(TeamSummary {
            team: team.to_string(),
            fixtures: fixtures.len(),
            error: None,
        });
        self.rows.extend(fixtures.into_iter().map(OutputRow::from));
    }

    /// Append the single placeholder row of a team that failed
    pub fn push_failure(&mut self, team: &str, reason: &str) {
        self.teams.push(TeamSummary {
            team: team.to_string(),
            fixtures: 0,
            error: Some(reason.to_string()),
        });
        self.rows.push(OutputRow::placeholder(team, reason));
    }

    pub fn fixture_count(&self) -> usize {
        self.teams.iter().map(|t| t.fixtures).sum()
    }

    pub fn failed_teams(&self) -> Vec<&TeamSummary> {
        self.teams.iter().filter(|t| t.error.is_some()).collect()
    }

    /// Rows belonging to one team
    pub fn rows_for(&self, team: &str) -> Vec<&OutputRow> {
        self.rows.iter().filter(|r| r.team == team).collect()
    }
}

impl Default for FixtureReport {
    fn default() -> Self {
        Self::new()
    }
}
