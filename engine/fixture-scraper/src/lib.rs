//! # Fixture Scraper
//!
//! Fetches the upcoming fixtures of a fixed list of football teams from their
//! futbol24 team pages and flattens them into a `Team,Match,Competition,Date,Time`
//! table.
//!
//! Each team goes through the same sequence: the [`Fetcher`] downloads the page
//! (backing off on HTTP 429), the [`locator`] finds the table that follows the
//! "Next matches" heading, and the [`RowParser`] turns row text into fixtures.
//! The [`FixtureScraper`] drives the teams one after another and turns every
//! per-team failure into a single placeholder row.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod locator;
pub mod logging;
pub mod orchestrator;
pub mod output;
pub mod parser;
pub mod teams;
pub mod types;


pub use config::ScraperConfig;
pub use error::{ConfigError, FetchError, ScrapeError};
pub use fetcher::{Fetcher, HttpResponse, ReqwestTransport, Transport};
pub use orchestrator::FixtureScraper;
pub use parser::{ParsedRow, Rejection, RowParser};
pub use types::{Fixture, FixtureReport, OutputRow, TeamEntry, TeamSummary};

/// Current version of the fixture scraper
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Heading text that introduces the upcoming fixtures on a team page
pub const NEXT_MATCHES_MARKER: &str = "Next matches";

/// Default number of fixtures collected per team
pub const DEFAULT_FIXTURES_PER_TEAM: usize = 2;

/// Kickoff placeholder used when a row carries no `HH:MM` time
pub const TIME_PLACEHOLDER: &str = "TBC";

/// Column headers of the CSV output
pub const CSV_HEADERS: [&str; 5] = ["Team", "Match", "Competition", "Date", "Time"];
