//! Row parser: turns the flattened text of one fixtures-table row into a fixture.
//!
//! The extraction is positional and regex driven. A row such as
//! `11.01.2026 17:30 GER D1 Bayern München - Wolfsburg` yields the date, the
//! kickoff time, `Bayern München vs Wolfsburg` as the match and whatever is
//! left over at the front (`GER D1`) as the competition label.
//!
//! Rows showing a scoreline are completed matches and are rejected.

use regex::{Match, Regex};
use thiserror::Error;

use crate::TIME_PLACEHOLDER;

/// Words at the end of the left segment considered for the home team
const HOME_WINDOW_WORDS: usize = 4;

/// Leading leftover tokens kept as the competition label
const COMPETITION_TOKENS: usize = 3;

const COMPETITION_MAX_CHARS: usize = 30;

/// Fields extracted from a single row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRow {
    /// DD.MM.YYYY as printed
    pub date: String,
    /// HH:MM, or "TBC" when the row has no kickoff time
    pub time: String,
    /// Best-effort label, may be empty
    pub competition: String,
    /// "Home vs Away"
    pub match_desc: String,
}

/// Why a row was not turned into a fixture
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("row shows a scoreline")]
    Scoreline,

    #[error("row has no DD.MM.YYYY date")]
    MissingDate,

    #[error("row has no home/away separator")]
    MissingMatch,
}

/// Compiled patterns for row extraction
#[derive(Debug, Clone)]
pub struct RowParser {
    scoreline: Regex,
    date: Regex,
    time: Regex,
    hyphen: Regex,
    versus: Regex,
}

impl RowParser {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            scoreline: Regex::new(r"\b\d{1,2}\s*[-–]\s*\d{1,2}\b")?,
            date: Regex::new(r"\b\d{2}\.\d{2}\.\d{4}\b")?,
            time: Regex::new(r"\b\d{2}:\d{2}\b")?,
            hyphen: Regex::new(r"\s[-–]\s")?,
            versus: Regex::new(r"(?i)(?:^|\s)vs\.?(?:\s|$)")?,
        })
    }

    /// Parse a row given as its table cells
    pub fn parse_cells<S: AsRef<str>>(&self, cells: &[S]) -> Result<ParsedRow, Rejection> {
        let joined = cells.iter().map(|c| c.as_ref()).collect::<Vec<_>>().join(" ");
        self.parse_text(&joined)
    }

    /// Parse a row given as flattened text
    pub fn parse_text(&self, text: &str) -> Result<ParsedRow, Rejection> {
        let text = collapse_whitespace(text);

        if self.scoreline.is_match(&text) {
            return Err(Rejection::Scoreline);
        }

        let date = self.date.find(&text).ok_or(Rejection::MissingDate)?;
        let time = self.time.find(&text);

        let residual = collapse_whitespace(&cut_out(&text, date, time));
        let (left, away) = self.split_match(&residual).ok_or(Rejection::MissingMatch)?;

        let left_tokens: Vec<&str> = left.split_whitespace().collect();
        let home_len = home_window(&left_tokens);
        let (leftover, home_tokens) = left_tokens.split_at(left_tokens.len() - home_len);

        let home = home_tokens.join(" ");
        let away = away.trim();
        let match_desc = match (home.is_empty(), away.is_empty()) {
            (false, false) => format!("{home} vs {away}"),
            (false, true) => home,
            (true, false) => away.to_string(),
            (true, true) => return Err(Rejection::MissingMatch),
        };

        Ok(ParsedRow {
            date: date.as_str().to_string(),
            time: time.map_or_else(|| TIME_PLACEHOLDER.to_string(), |t| t.as_str().to_string()),
            competition: competition_label(leftover),
            match_desc,
        })
    }

    /// Split around the rightmost spaced hyphen, falling back to the rightmost "vs"
    fn split_match<'a>(&self, residual: &'a str) -> Option<(&'a str, &'a str)> {
        let separator = self
            .hyphen
            .find_iter(residual)
            .last()
            .or_else(|| self.versus.find_iter(residual).last())?;

        Some((&residual[..separator.start()], &residual[separator.end()..]))
    }
}

/// Trim and squeeze every whitespace run to a single space
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `text` with the date and time matches replaced by spaces
fn cut_out(text: &str, date: Match<'_>, time: Option<Match<'_>>) -> String {
    let mut spans: Vec<(usize, usize)> = vec![(date.start(), date.end())];
    if let Some(t) = time {
        spans.push((t.start(), t.end()));
    }
    spans.sort_unstable();

    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    for (start, end) in spans {
        if start < pos {
            continue;
        }
        out.push_str(&text[pos..start]);
        out.push(' ');
        pos = end;
    }
    out.push_str(&text[pos..]);
    out
}

/// Number of trailing tokens taken as the home team.
///
/// Starts from the last `HOME_WINDOW_WORDS` tokens and drops the competition
/// code at the front of the window, always keeping one token. A tier code
/// such as "D1" ends the competition. Without one, a leading pair of short
/// uppercase codes ("UEFA CL", "ENG PR") is the competition, so club prefixes
/// like "PSV", "FC" or "AFC" stay with the team.
fn home_window(tokens: &[&str]) -> usize {
    let window = &tokens[tokens.len().saturating_sub(HOME_WINDOW_WORDS)..];
    if window.is_empty() {
        return 0;
    }

    let code_len = match window.iter().rposition(|t| is_tier_code(t)) {
        Some(index) => index + 1,
        None if window.iter().take_while(|t| is_short_code(t)).count() >= 2 => 2,
        None => 0,
    };
    window.len() - code_len.min(window.len() - 1)
}

/// Letters and digits together: "D1", "2B"
fn is_tier_code(token: &str) -> bool {
    token.chars().any(|c| c.is_ascii_digit()) && token.chars().any(|c| c.is_alphabetic())
}

/// Up to four ASCII capitals: "GER", "UEFA", "PSV"
fn is_short_code(token: &str) -> bool {
    token.len() <= 4 && token.chars().all(|c| c.is_ascii_uppercase())
}

fn competition_label(tokens: &[&str]) -> String {
    let label = tokens.iter().take(COMPETITION_TOKENS).copied().collect::<Vec<_>>().join(" ");
    label.chars().take(COMPETITION_MAX_CHARS).collect::<String>().trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn parser() -> RowParser {
        RowParser::new().unwrap()
    }

    #[test]
    fn test_parse_full_row() {
        let row =
            parser().parse_text("11.01.2026 17:30 GER D1 Bayern München - Wolfsburg").unwrap();

        assert_eq!(row.date, "11.01.2026");
        assert_eq!(row.time, "17:30");
        assert_eq!(row.match_desc, "Bayern München vs Wolfsburg");
        assert_eq!(row.competition, "GER D1");
    }

    #[test]
    fn test_parse_cells_matches_text() {
        let cells = ["11.01.2026", "17:30", "GER D1", "Bayern München", "-", "Wolfsburg"];

        assert_eq!(
            parser().parse_cells(&cells),
            parser().parse_text("11.01.2026 17:30 GER D1 Bayern München - Wolfsburg")
        );
    }

    #[test]
    fn test_missing_time_is_tbc() {
        let row = parser().parse_text("24.01.2026 UEFA CL Club Brugge - Ajax").unwrap();

        assert_eq!(row.time, "TBC");
        assert_eq!(row.match_desc, "Club Brugge vs Ajax");
        assert_eq!(row.competition, "UEFA CL");
    }

    #[test]
    fn test_scoreline_is_rejected() {
        let p = parser();

        assert_eq!(
            p.parse_text("04.01.2026 GER D1 Bayern München 2 - 1 Wolfsburg"),
            Err(Rejection::Scoreline)
        );
        assert_eq!(p.parse_text("04.01.2026 Ajax 0-0 PSV"), Err(Rejection::Scoreline));
        assert_eq!(p.parse_text("04.01.2026 Ajax 10 – 2 PSV"), Err(Rejection::Scoreline));
    }

    #[test]
    fn test_missing_date_is_rejected() {
        let p = parser();

        assert_eq!(
            p.parse_text("17:30 GER D1 Bayern München - Wolfsburg"),
            Err(Rejection::MissingDate)
        );
        assert_eq!(
            p.parse_text("11.01.26 Bayern München - Wolfsburg"),
            Err(Rejection::MissingDate)
        );
        assert_eq!(p.parse_text(""), Err(Rejection::MissingDate));
    }

    #[test]
    fn test_missing_separator_is_rejected() {
        assert_eq!(
            parser().parse_text("11.01.2026 17:30 Bayern München Wolfsburg"),
            Err(Rejection::MissingMatch)
        );
        assert_eq!(parser().parse_text("11.01.2026 17:30 -"), Err(Rejection::MissingMatch));
    }

    #[test]
    fn test_vs_fallback() {
        let row = parser().parse_text("31.01.2026 20:45 Liverpool VS Manchester City").unwrap();

        assert_eq!(row.match_desc, "Liverpool vs Manchester City");
        assert_eq!(row.competition, "");
    }

    #[test]
    fn test_hyphenated_team_names_survive() {
        let row =
            parser().parse_text("07.02.2026 21:00 FRA D1 Lyon - Paris Saint-Germain").unwrap();

        assert_eq!(row.match_desc, "Lyon vs Paris Saint-Germain");
        assert_eq!(row.competition, "FRA D1");
    }

    #[test]
    fn test_home_window_is_bounded() {
        let text = concat!(
            "14.02.2026 16:00 Premier League Round 25 ",
            "Brighton and Hove Albion - Bournemouth"
        );
        let row = parser().parse_text(text).unwrap();

        assert_eq!(row.match_desc, "Brighton and Hove Albion vs Bournemouth");
        assert_eq!(row.competition, "Premier League Round");
    }

    #[test]
    fn test_short_uppercase_home_team_is_kept() {
        let row = parser().parse_text("01.02.2026 14:30 NED D1 PSV - Ajax").unwrap();

        assert_eq!(row.match_desc, "PSV vs Ajax");
        assert_eq!(row.competition, "NED D1");
    }

    #[test]
    fn test_club_prefixes_stay_with_home_team() {
        let p = parser();
        let cases = [
            ("17.01.2026 18:45 NED D1 PSV Eindhoven - Ajax", "PSV Eindhoven vs Ajax", "NED D1"),
            ("24.01.2026 21:00 ESP D1 FC Barcelona - Sevilla", "FC Barcelona vs Sevilla", "ESP D1"),
            (
                "31.01.2026 ENG PR AFC Bournemouth - Liverpool",
                "AFC Bournemouth vs Liverpool",
                "ENG PR",
            ),
            ("07.02.2026 UEFA CL PSV - Bayern München", "PSV vs Bayern München", "UEFA CL"),
            ("14.02.2026 GER D1 Schalke 04 - Hertha BSC", "Schalke 04 vs Hertha BSC", "GER D1"),
        ];

        for (text, match_desc, competition) in cases {
            let row = p.parse_text(text).unwrap();
            assert_eq!(row.match_desc, match_desc, "{text}");
            assert_eq!(row.competition, competition, "{text}");
        }
    }

    #[test]
    fn test_club_prefix_without_competition() {
        let row = parser().parse_text("21.02.2026 15:30 FC Barcelona - Real Madrid").unwrap();

        assert_eq!(row.match_desc, "FC Barcelona vs Real Madrid");
        assert_eq!(row.competition, "");
    }

    #[test]
    fn test_competition_label_is_bounded() {
        let text = concat!(
            "01.02.2026 Supercalifragilisticexpialidocious Championship Extraordinaire ",
            "Round Of Sixteen Ajax - PSV"
        );
        let row = parser().parse_text(text).unwrap();

        assert_eq!(row.match_desc, "Round Of Sixteen Ajax vs PSV");
        assert_eq!(row.competition.chars().count(), COMPETITION_MAX_CHARS);
        assert!(row.competition.starts_with("Supercalifragilistic"));
    }

    #[test]
    fn test_whitespace_is_collapsed() {
        let text = "  11.01.2026\n\t17:30   GER D1\nBayern München \n - \n Wolfsburg ";
        let row = parser().parse_text(text).unwrap();

        assert_eq!(row.match_desc, "Bayern München vs Wolfsburg");
        assert_eq!(row.competition, "GER D1");
    }

    fn team_name() -> impl Strategy<Value = String> {
        "[A-Z][a-z]{2,10}( [A-Z][a-z]{2,10})?"
    }

    proptest! {
        #[test]
        fn prop_scorelines_are_rejected(
            home in team_name(),
            away in team_name(),
            a in 0u32..100,
            b in 0u32..100,
        ) {
            let text = format!("11.01.2026 {home} {a} - {b} {away}");
            prop_assert_eq!(parser().parse_text(&text), Err(Rejection::Scoreline));
        }

        #[test]
        fn prop_dated_rows_with_separator_parse(
            day in 1u32..29,
            month in 1u32..13,
            year in 2000u32..2100,
            home in team_name(),
            away in team_name(),
            use_vs in any::<bool>(),
        ) {
            let sep = if use_vs { "vs" } else { "-" };
            let text = format!("{day:02}.{month:02}.{year} GER D1 {home} {sep} {away}");

            let row = parser().parse_text(&text).unwrap();
            prop_assert_eq!(row.date, format!("{day:02}.{month:02}.{year}"));
            prop_assert!(!row.match_desc.is_empty());
            prop_assert_eq!(row.time, "TBC");
        }

        #[test]
        fn prop_rows_without_date_are_rejected(text in "[A-Za-z0-9 :.-]{0,60}") {
            let date = Regex::new(r"\b\d{2}\.\d{2}\.\d{4}\b").unwrap();
            prop_assume!(!date.is_match(&text));

            prop_assert!(parser().parse_text(&text).is_err());
        }

        #[test]
        fn prop_parsing_is_deterministic(text in "[A-Za-z0-9 :.-]{0,60}") {
            let p = parser();
            prop_assert_eq!(p.parse_text(&text), p.parse_text(&text));
        }
    }
}
