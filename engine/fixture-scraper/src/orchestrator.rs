use anyhow::{Context, Result};
use scraper::Html;
use tracing::{debug, info, warn};

use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::fetcher::{random_jitter, Fetcher, ReqwestTransport, Transport};
use crate::locator::{locate_section, SectionRows};
use crate::parser::{ParsedRow, Rejection, RowParser};
use crate::types::{Fixture, FixtureReport, TeamEntry};

/// Drives fetch, locate and parse over the configured teams, one team at a time
pub struct FixtureScraper<T = ReqwestTransport> {
    fetcher: Fetcher<T>,
    parser: RowParser,
    config: ScraperConfig,
}

impl FixtureScraper<ReqwestTransport> {
    /// Create a scraper that talks to the real site
    pub fn new(config: ScraperConfig) -> Result<Self> {
        let fetcher = Fetcher::from_config(&config.http, config.retry.clone())?;
        Self::with_fetcher(fetcher, config)
    }
}

impl<T: Transport> FixtureScraper<T> {
    pub fn with_fetcher(fetcher: Fetcher<T>, config: ScraperConfig) -> Result<Self> {
        let parser = RowParser::new().context("Failed to compile row patterns")?;
        Ok(Self { fetcher, parser, config })
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &Fetcher<T> {
        &self.fetcher
    }

    /// Scrape every configured team
    pub async fn run(&self) -> FixtureReport {
        self.run_teams(&self.config.teams).await
    }

    /// Scrape `teams` in order.
    ///
    /// A failing team contributes one placeholder row and the run moves on.
    /// Every team is followed by the paced delay, whatever its outcome.
    pub async fn run_teams(&self, teams: &[TeamEntry]) -> FixtureReport {
        let mut report = FixtureReport::new();
        info!("Starting to scrape fixtures for {} teams", teams.len());

        for team in teams {
            match self.scrape_team(team).await {
                Ok(fixtures) => {
                    info!("{}: {} fixtures", team.name, fixtures.len());
                    report.push_fixtures(&team.name, fixtures);
                }
                Err(e) => {
                    warn!("{}: {}", team.name, e);
                    report.push_failure(&team.name, &e.to_string());
                }
            }

            self.pause().await;
        }

        info!(
            "Scraped {} fixtures, {} of {} teams failed",
            report.fixture_count(),
            report.failed_teams().len(),
            teams.len()
        );
        report
    }

    /// Fetch one team page and extract its next fixtures
    pub async fn scrape_team(&self, team: &TeamEntry) -> Result<Vec<Fixture>, ScrapeError> {
        let html = self.fetcher.fetch(&team.url).await?;
        self.extract_fixtures(&team.name, &html)
    }

    /// Locate the fixtures section of `html` and parse up to the per-team quota
    pub fn extract_fixtures(&self, team: &str, html: &str) -> Result<Vec<Fixture>, ScrapeError> {
        let document = Html::parse_document(html);
        let section = locate_section(&document, &self.config.marker)?;
        debug!("{}: fixtures section has {} rows", team, section.len());

        let fixtures =
            collect_fixtures(&self.parser, team, &section, self.config.fixtures_per_team);
        if fixtures.is_empty() {
            return Err(ScrapeError::NoFixturesParsed);
        }
        Ok(fixtures)
    }

    async fn pause(&self) {
        let pacing = &self.config.pacing;
        let wait = pacing.team_delay() + random_jitter(pacing.max_jitter());
        debug!("Waiting {:?} before the next team", wait);
        tokio::time::sleep(wait).await;
    }
}

/// Parse rows in order until `quota` fixtures are collected
fn collect_fixtures(
    parser: &RowParser,
    team: &str,
    section: &SectionRows,
    quota: usize,
) -> Vec<Fixture> {
    let parsed: Box<dyn Iterator<Item = Result<ParsedRow, Rejection>> + '_> = match section {
        SectionRows::Table(rows) => Box::new(rows.iter().map(|cells| parser.parse_cells(cells))),
        SectionRows::Lines(lines) => Box::new(lines.iter().map(|line| parser.parse_text(line))),
    };

    let mut fixtures = Vec::new();
    for (row_index, result) in parsed.enumerate() {
        match result {
            Ok(row) => fixtures.push(Fixture::from_parsed(team, row)),
            Err(rejection) => debug!("{}: skipping row {}: {}", team, row_index, rejection),
        }
        if fixtures.len() >= quota {
            break;
        }
    }
    fixtures
}
