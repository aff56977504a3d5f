use crate::types::TeamEntry;

const FUTBOL24_TEAM_BASE: &str = "https://www.futbol24.com/team";

/// (display name, country, futbol24 slug)
const DEFAULT_TEAMS: &[(&str, &str, &str)] = &[
    ("Bayern Munich", "Germany", "Bayern-Munchen"),
    ("Stuttgart", "Germany", "VfB-Stuttgart"),
    ("Manchester City", "England", "Manchester-City"),
    ("Barcelona", "Spain", "Barcelona"),
    ("PSV", "Holland", "PSV-Eindhoven"),
    ("PSG", "France", "Paris-Saint-Germain"),
    ("Ajax", "Holland", "Ajax"),
    ("Club Brugge", "Belgium", "Club-Brugge"),
    ("Brighton", "England", "Brighton"),
    ("Bournemouth", "England", "AFC-Bournemouth"),
    ("Leverkusen", "Germany", "Bayer-Leverkusen"),
    ("Hoffenheim", "Germany", "Hoffenheim"),
    ("Werder Bremen", "Germany", "Werder-Bremen"),
    ("Real Madrid", "Spain", "Real-Madrid"),
    ("Liverpool", "England", "Liverpool"),
    ("Midtjylland", "Denmark", "Midtjylland"),
    ("Crvena Zvezda", "Serbia", "Crvena-Zvezda"),
    ("Lincoln Red Imps", "Gibraltar", "Lincoln-Red-Imps"),
];

/// futbol24 team page for a country and team slug
pub fn futbol24_url(country: &str, slug: &str) -> String {
    format!("{FUTBOL24_TEAM_BASE}/{country}/{slug}/")
}

/// The compiled-in team list, in processing order
pub fn default_teams() -> Vec<TeamEntry> {
    DEFAULT_TEAMS
        .iter()
        .map(|(name, country, slug)| TeamEntry::new(*name, futbol24_url(country, slug)))
        .collect()
}

/// Keep only the teams named in `names` (case-insensitive), preserving the order of `teams`.
///
/// Returns the unknown names as the error so the caller can report them.
pub fn select_teams(teams: &[TeamEntry], names: &[String]) -> Result<Vec<TeamEntry>, Vec<String>> {
    if names.is_empty() {
        return Ok(teams.to_vec());
    }

    let unknown: Vec<String> = names
        .iter()
        .filter(|n| !teams.iter().any(|t| t.name.eq_ignore_ascii_case(n)))
        .cloned()
        .collect();
    if !unknown.is_empty() {
        return Err(unknown);
    }

    Ok(teams
        .iter()
        .filter(|t| names.iter().any(|n| t.name.eq_ignore_ascii_case(n)))
        .cloned()
        .collect())
}
