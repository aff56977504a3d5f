//! Fixture locator: finds the upcoming-fixtures table on a team page.
//!
//! The page is walked in document order. The anchor is the innermost
//! heading-like element whose flattened text contains the marker. The
//! fixtures table is the table the anchor captions, or else the first
//! `<table>` that starts after it.

use scraper::{ElementRef, Html};

use crate::error::ScrapeError;
use crate::parser::collapse_whitespace;

/// Elements that can carry a section label
const HEADING_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "caption", "th", "td", "div", "span", "p", "strong", "b",
    "a", "li", "header",
];

/// Tags that place an anchor inside the table it labels
const TABLE_LABEL_TAGS: &[&str] = &["caption", "th", "td"];

/// Elements whose text counts as one line when no table follows the anchor
const LINE_TAGS: &[&str] = &["tr", "li", "p", "div"];

/// Upper bound on fallback lines collected after the anchor
const MAX_FALLBACK_LINES: usize = 100;

/// Row content of the fixtures section
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionRows {
    /// Cells of every row of the fixtures table
    Table(Vec<Vec<String>>),
    /// Text lines following the anchor when the page has no table there
    Lines(Vec<String>),
}

impl SectionRows {
    pub fn len(&self) -> usize {
        match self {
            SectionRows::Table(rows) => rows.len(),
            SectionRows::Lines(lines) => lines.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Flattened, whitespace-collapsed text of an element
pub fn flat_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

fn is_tag(element: &ElementRef<'_>, tags: &[&str]) -> bool {
    tags.contains(&element.value().name())
}

/// All elements of the document in document order
fn elements_in_order(document: &Html) -> Vec<ElementRef<'_>> {
    document.root_element().descendants().filter_map(ElementRef::wrap).collect()
}

fn labels(element: ElementRef<'_>, marker: &str) -> bool {
    is_tag(&element, HEADING_TAGS) && flat_text(element).contains(marker)
}

/// Index (in document order) of the anchor heading
fn find_anchor_index(elements: &[ElementRef<'_>], marker: &str) -> Option<usize> {
    elements.iter().position(|&el| {
        labels(el, marker)
            && !el.descendants().skip(1).filter_map(ElementRef::wrap).any(|d| labels(d, marker))
    })
}

/// The fixtures table for the anchor at `anchor`.
///
/// A caption or header cell labels the table enclosing it, unless a table
/// nested in that enclosing table follows the anchor. Otherwise the first
/// table after the anchor is used.
fn fixtures_table<'a>(elements: &[ElementRef<'a>], anchor: usize) -> Option<ElementRef<'a>> {
    let following = elements[anchor + 1..].iter().copied().find(|el| el.value().name() == "table");

    let label = elements[anchor];
    let enclosing = is_tag(&label, TABLE_LABEL_TAGS)
        .then(|| {
            label
                .ancestors()
                .filter_map(ElementRef::wrap)
                .find(|a| a.value().name() == "table")
        })
        .flatten();

    match (enclosing, following) {
        (Some(outer), Some(inner)) if inner.ancestors().any(|a| a.id() == outer.id()) => {
            Some(inner)
        }
        (Some(outer), _) => Some(outer),
        (None, following) => following,
    }
}

/// Cell texts of each row belonging to `table` (rows of nested tables are skipped)
pub fn table_rows(table: ElementRef<'_>) -> Vec<Vec<String>> {
    table
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "tr")
        .filter(|row| {
            row.ancestors()
                .filter_map(ElementRef::wrap)
                .find(|a| a.value().name() == "table")
                .is_some_and(|owner| owner.id() == table.id())
        })
        .map(|row| {
            let cells: Vec<String> = row
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|c| matches!(c.value().name(), "td" | "th"))
                .map(flat_text)
                .collect();
            if cells.is_empty() {
                vec![flat_text(row)]
            } else {
                cells
            }
        })
        .filter(|cells| cells.iter().any(|c| !c.is_empty()))
        .collect()
}

/// Text lines that follow the anchor: innermost `tr`/`li`/`p`/`div` blocks, in order
fn lines_after(elements: &[ElementRef<'_>], anchor: usize) -> Vec<String> {
    elements[anchor + 1..]
        .iter()
        .copied()
        .filter(|el| is_tag(el, LINE_TAGS))
        .filter(|el| {
            !el.descendants()
                .skip(1)
                .filter_map(ElementRef::wrap)
                .any(|d| is_tag(&d, LINE_TAGS))
        })
        .map(flat_text)
        .filter(|line| !line.is_empty())
        .take(MAX_FALLBACK_LINES)
        .collect()
}

/// Rows of the fixtures section.
///
/// Falls back to the text lines after the anchor when no table follows it.
pub fn locate_section(document: &Html, marker: &str) -> Result<SectionRows, ScrapeError> {
    let elements = elements_in_order(document);
    let anchor = find_anchor_index(&elements, marker)
        .ok_or_else(|| ScrapeError::SectionNotFound { marker: marker.to_string() })?;

    if let Some(table) = fixtures_table(&elements, anchor) {
        return Ok(SectionRows::Table(table_rows(table)));
    }

    let lines = lines_after(&elements, anchor);
    if lines.is_empty() {
        return Err(ScrapeError::TableNotFound { marker: marker.to_string() });
    }
    Ok(SectionRows::Lines(lines))
}
