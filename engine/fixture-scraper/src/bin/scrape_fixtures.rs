use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use fixture_scraper::logging::initialize_logging;
use fixture_scraper::output::{print_table, write_csv_file, write_json_file};
use fixture_scraper::teams::select_teams;
use fixture_scraper::{FixtureReport, FixtureScraper, ScraperConfig};
use std::path::{Path, PathBuf};
use tracing::info;

/// Fetch the next fixtures of football teams from futbol24 and save them as CSV
#[derive(Parser)]
#[command(name = "scrape-fixtures")]
#[command(version, about = "Fetch the next fixtures of football teams from futbol24")]
struct Cli {
    /// TOML configuration file (defaults are used for missing keys)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// CSV output path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write a JSON report to this path
    #[arg(long)]
    json: Option<PathBuf>,

    /// Only scrape these teams (repeatable, case-insensitive)
    #[arg(short, long = "team")]
    teams: Vec<String>,

    /// Fixtures kept per team
    #[arg(long)]
    per_team: Option<usize>,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the configured teams (default)
    Run,
    /// List the configured teams and their pages
    Teams,
    /// Extract fixtures from a saved team page without touching the network
    Parse {
        /// Team name written to the Team column
        #[arg(long)]
        team: String,
        /// Saved HTML page
        #[arg(long)]
        file: PathBuf,
    },
    /// Print the effective configuration as TOML
    DumpConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    initialize_logging(&cli.log_level);

    let config = load_config(&cli)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run(config, &cli.teams).await,
        Commands::Teams => {
            for team in &config.teams {
                println!("{:<20} {}", team.name, team.url);
            }
            Ok(())
        }
        Commands::Parse { team, file } => parse_saved_page(config, &team, &file),
        Commands::DumpConfig => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> Result<ScraperConfig> {
    let mut config = match &cli.config {
        Some(path) => ScraperConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ScraperConfig::default(),
    }
    .with_env_overrides()?;

    if let Some(output) = &cli.output {
        config.output.csv_path = output.clone();
    }
    if let Some(json) = &cli.json {
        config.output.json_path = Some(json.clone());
    }
    if let Some(per_team) = cli.per_team {
        config.fixtures_per_team = per_team;
    }
    config.validate()?;

    Ok(config)
}

async fn run(config: ScraperConfig, team_filter: &[String]) -> Result<()> {
    let teams = match select_teams(&config.teams, team_filter) {
        Ok(teams) => teams,
        Err(unknown) => {
            let known: Vec<&str> = config.teams.iter().map(|t| t.name.as_str()).collect();
            bail!("Unknown team(s) {:?}; configured teams: {}", unknown, known.join(", "));
        }
    };

    info!("Starting fixture scraper for {} teams...", teams.len());

    let scraper = FixtureScraper::new(config)?;
    let report = scraper.run_teams(&teams).await;

    save_report(scraper.config(), &report)?;
    print_table(&report.rows);
    print_summary(&report);

    info!("Scraping completed successfully!");
    Ok(())
}

fn parse_saved_page(config: ScraperConfig, team: &str, file: &Path) -> Result<()> {
    let html = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let scraper = FixtureScraper::new(config)?;

    let mut report = FixtureReport::new();
    match scraper.extract_fixtures(team, &html) {
        Ok(fixtures) => report.push_fixtures(team, fixtures),
        Err(e) => report.push_failure(team, &e.to_string()),
    }

    print_table(&report.rows);
    Ok(())
}

fn save_report(config: &ScraperConfig, report: &FixtureReport) -> Result<()> {
    write_csv_file(&config.output.csv_path, &report.rows)?;
    if let Some(json_path) = &config.output.json_path {
        write_json_file(json_path, report)?;
    }
    Ok(())
}

fn print_summary(report: &FixtureReport) {
    println!("\nSummary:");
    println!("- Teams processed: {}", report.teams.len());
    println!("- Fixtures found: {}", report.fixture_count());

    let failed = report.failed_teams();
    if !failed.is_empty() {
        println!("- Teams without fixtures: {}", failed.len());
        for summary in failed {
            println!("  - {}: {}", summary.team, summary.error.as_deref().unwrap_or(""));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_takes_team_and_file_flags() {
        let cli = Cli::try_parse_from([
            "scrape-fixtures",
            "--team",
            "Ajax",
            "parse",
            "--team",
            "Ajax",
            "--file",
            "ajax.html",
        ])
        .unwrap();

        assert_eq!(cli.teams, vec!["Ajax"]);
        match cli.command {
            Some(Commands::Parse { team, file }) => {
                assert_eq!(team, "Ajax");
                assert_eq!(file, PathBuf::from("ajax.html"));
            }
            _ => panic!("expected the parse command"),
        }
    }

    #[test]
    fn test_run_is_the_default_command() {
        let cli = Cli::try_parse_from(["scrape-fixtures", "--per-team", "3"]).unwrap();

        assert!(cli.command.is_none());
        assert_eq!(cli.per_team, Some(3));
    }
}
