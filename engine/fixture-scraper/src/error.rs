//! Error types for the fixture scraper

use thiserror::Error;

/// Terminal failures of a single page fetch
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Blocked (429) {attempts} times: {url}")]
    Blocked { url: String, attempts: u32 },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to read body of {url}: {message}")]
    Body { url: String, message: String },
}

/// Reasons a team produces a placeholder row instead of fixtures
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("'{marker}' section not found")]
    SectionNotFound { marker: String },

    #[error("no fixtures table after '{marker}'")]
    TableNotFound { marker: String },

    #[error("no fixtures parsed")]
    NoFixturesParsed,
}

/// Errors loading or validating a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

impl ScrapeError {
    /// Whether the team page was reachable at all
    pub fn is_network(&self) -> bool {
        matches!(self, ScrapeError::Fetch(_))
    }
}
