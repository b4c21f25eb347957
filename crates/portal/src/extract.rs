//! Scrapes company records out of a raw result document.
//!
//! The result grid is the single `<table role="grid">` on the page. Rows
//! that belong to a result carry a numeric `data-ri` marker; header and
//! footer rows do not. Cell meaning is positional — the portal renders no
//! usable class names — so column indexes below are the contract:
//! 1 court + register designation, 2 name, 3 state, 4 status, 5 documents,
//! and from 8 on the history block in three-cell strides of which the first
//! two cells are a (former name, location) pair.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use tracing::warn;

use crate::model::Company;

/// Register designation inside the court cell, e.g. `HRB 12345` or
/// `VR 6789 B`. A trailing word character disqualifies a candidate (so
/// " Formerly" does not donate an `F` suffix); the regex crate has no
/// lookahead, so that guard lives in [`register_number`].
static REGISTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(HRA|HRB|GnR|VR|PR)\s*\d+(\s+[A-Z])?").unwrap());

/// First cell index of the history block.
const HISTORY_START: usize = 8;
/// The history block repeats in three-cell groups; only the first two cells
/// of each group carry data.
const HISTORY_STRIDE: usize = 3;

/// Cell content that marks the start of the branches section, which ends
/// the history block.
const BRANCH_MARKERS: [&str; 2] = ["Niederlassungen", "Branches"];

/// Extracts all company rows from a raw result document, in document order.
///
/// A page without a result grid (including error and "no results" pages)
/// yields an empty vector, never an error. Malformed rows are skipped.
pub fn extract_companies(html: &str) -> Vec<Company> {
    let document = Html::parse_document(html);
    let grid_sel = Selector::parse(r#"table[role="grid"]"#).unwrap();
    let row_sel = Selector::parse("tr").unwrap();
    let cell_sel = Selector::parse("td").unwrap();

    let Some(grid) = document.select(&grid_sel).next() else {
        return Vec::new();
    };

    let mut companies = Vec::new();
    for row in grid.select(&row_sel) {
        let Some(index) = row
            .value()
            .attr("data-ri")
            .and_then(|marker| marker.parse::<usize>().ok())
        else {
            continue;
        };

        let cells: Vec<String> = row
            .select(&cell_sel)
            .map(|cell| cell.text().collect::<String>().trim().to_string())
            .collect();

        // A result row carries at least the six leading columns. Anything
        // shorter is a rendering anomaly; drop the row, keep the rest.
        if cells.len() < 6 {
            warn!(row = index, cells = cells.len(), "skipping malformed result row");
            continue;
        }

        companies.push(company_from_cells(&cells));
    }
    companies
}

fn company_from_cells(cells: &[String]) -> Company {
    let court = cells[1].clone();
    let state = cells[3].clone();
    let register_num =
        register_number(&court).map(|register| apply_register_suffix(register, &state));
    let status = cells[4].trim().to_string();
    let status_current = status.to_uppercase().replace(' ', "_");

    Company {
        register_num,
        name: cells[2].clone(),
        status,
        status_current,
        documents: cells[5].clone(),
        history: history_pairs(cells),
        court,
        state,
    }
}

/// Pulls the register designation out of the court cell.
///
/// The optional single-letter suffix is only kept when nothing word-like
/// follows it; otherwise the match falls back to the bare number, matching
/// how a trailing-boundary assertion would behave.
fn register_number(court: &str) -> Option<String> {
    for caps in REGISTER_RE.captures_iter(court) {
        let full = caps.get(0).expect("capture 0 always present");
        if word_boundary_after(court, full.end()) {
            return Some(full.as_str().to_string());
        }
        if let Some(suffix) = caps.get(2) {
            if word_boundary_after(court, suffix.start()) {
                return Some(court[full.start()..suffix.start()].to_string());
            }
        }
    }
    None
}

fn word_boundary_after(s: &str, end: usize) -> bool {
    s[end..]
        .chars()
        .next()
        .is_none_or(|c| !c.is_alphanumeric() && c != '_')
}

/// Some states render the register number without its conventional suffix;
/// append it so equal registrations compare equal across result pages.
/// Known conventions: Berlin `HRB … B`, Bremen `… HB` for every type.
fn apply_register_suffix(register: String, state: &str) -> String {
    let register_type = register.split_whitespace().next().unwrap_or_default();
    let suffix = match (state, register_type) {
        ("Berlin", "HRB") => Some(" B"),
        ("Bremen", "HRA" | "HRB" | "GnR" | "VR" | "PR") => Some(" HB"),
        _ => None,
    };
    match suffix {
        Some(suffix) if !register.ends_with(suffix) => register + suffix,
        _ => register,
    }
}

/// Walks the history block as a small state machine: keep consuming
/// (name, location) pairs one stride apart until the branches marker or
/// cell exhaustion ends the block.
fn history_pairs(cells: &[String]) -> Vec<(String, String)> {
    enum Scan {
        Pair(usize),
        Done,
    }

    let mut history = Vec::new();
    let mut scan = Scan::Pair(HISTORY_START);
    while let Scan::Pair(i) = scan {
        scan = if i + 1 >= cells.len() {
            Scan::Done
        } else if BRANCH_MARKERS.iter().any(|marker| cells[i].contains(marker)) {
            Scan::Done
        } else {
            history.push((cells[i].clone(), cells[i + 1].clone()));
            Scan::Pair(i + HISTORY_STRIDE)
        };
    }
    history
}
