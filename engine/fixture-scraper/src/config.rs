//! Configuration for the fixture scraper

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::teams::default_teams;
use crate::types::TeamEntry;
use crate::{DEFAULT_FIXTURES_PER_TEAM, NEXT_MATCHES_MARKER};

/// Browser User-Agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Configuration for a scraping run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Heading text that introduces the fixtures table
    pub marker: String,

    /// Maximum fixtures emitted per team
    pub fixtures_per_team: usize,

    /// HTTP client configuration
    pub http: HttpConfig,

    /// Backoff on HTTP 429
    pub retry: RetryConfig,

    /// Delay between teams
    pub pacing: PacingConfig,

    /// Output destinations
    pub output: OutputConfig,

    /// Teams to scrape, in order
    pub teams: Vec<TeamEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent header
    pub user_agent: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total number of requests made for a URL that keeps answering 429
    pub max_attempts: u32,

    /// Base backoff in milliseconds; attempt `i` waits `base * (i + 2)` plus jitter
    pub base_delay_ms: u64,

    /// Upper bound of the random jitter added to each backoff, in milliseconds
    pub jitter_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Fixed wait after each team, in milliseconds
    pub team_delay_ms: u64,

    /// Upper bound of the random jitter added to the team delay, in milliseconds
    pub jitter_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// CSV file written at the end of the run
    pub csv_path: PathBuf,

    /// Optional JSON report
    pub json_path: Option<PathBuf>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            marker: NEXT_MATCHES_MARKER.to_string(),
            fixtures_per_team: DEFAULT_FIXTURES_PER_TEAM,
            http: HttpConfig::default(),
            retry: RetryConfig::default(),
            pacing: PacingConfig::default(),
            output: OutputConfig::default(),
            teams: default_teams(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { user_agent: DEFAULT_USER_AGENT.to_string(), timeout_secs: 30 }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_attempts: 6, base_delay_ms: 1200, jitter_ms: 1000 }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self { team_delay_ms: 1200, jitter_ms: 1000 }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { csv_path: PathBuf::from("next_fixtures.csv"), json_path: None }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl RetryConfig {
    /// Wait before retrying after the 429 answered to attempt `attempt_index` (0-based)
    pub fn backoff(&self, attempt_index: u32, jitter: Duration) -> Duration {
        Duration::from_millis(self.base_delay_ms.saturating_mul(u64::from(attempt_index) + 2))
            + jitter
    }

    pub fn max_jitter(&self) -> Duration {
        Duration::from_millis(self.jitter_ms)
    }
}

impl PacingConfig {
    pub fn team_delay(&self) -> Duration {
        Duration::from_millis(self.team_delay_ms)
    }

    pub fn max_jitter(&self) -> Duration {
        Duration::from_millis(self.jitter_ms)
    }
}

impl ScraperConfig {
    /// Load configuration from a TOML file; missing keys keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: ScraperConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Override settings from `FIXTURES_*` environment variables
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup (the environment in production)
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("FIXTURES_OUTPUT") {
            self.output.csv_path = PathBuf::from(path);
        }

        if let Some(json) = lookup("FIXTURES_JSON") {
            self.output.json_path = Some(PathBuf::from(json));
        }

        if let Some(per_team) = lookup("FIXTURES_PER_TEAM") {
            self.fixtures_per_team = parse_number("FIXTURES_PER_TEAM", &per_team)?;
        }

        if let Some(delay) = lookup("FIXTURES_TEAM_DELAY_MS") {
            self.pacing.team_delay_ms = parse_number("FIXTURES_TEAM_DELAY_MS", &delay)?;
        }

        if let Some(user_agent) = lookup("FIXTURES_USER_AGENT") {
            self.http.user_agent = user_agent;
        }

        self.validate()?;
        Ok(self)
    }

    /// Reject settings the scraper cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retry.max_attempts == 0 {
            return Err(invalid("retry.max_attempts must be at least 1"));
        }
        if self.fixtures_per_team == 0 {
            return Err(invalid("fixtures_per_team must be at least 1"));
        }
        if self.marker.trim().is_empty() {
            return Err(invalid("marker must not be empty"));
        }
        if self.teams.is_empty() {
            return Err(invalid("at least one team must be configured"));
        }
        if let Some(team) =
            self.teams.iter().find(|t| t.name.trim().is_empty() || t.url.trim().is_empty())
        {
            return Err(invalid(&format!("team entry {team:?} needs a name and a url")));
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| invalid(&format!("{key} is not a number: '{value}'")))
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::Invalid { message: message.to_string() }
}
