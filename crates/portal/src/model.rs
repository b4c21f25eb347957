//! Search inputs and the extracted company record.

use serde::{Deserialize, Serialize};

use hreg_states::StateCode;

/// Keyword semantics of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Every keyword must appear.
    All,
    /// At least one keyword must appear.
    Min,
    /// Exact company-name match.
    Exact,
}

impl MatchMode {
    /// Accepted wire spellings, in the order they are reported to callers.
    pub const OPTIONS: [&'static str; 3] = ["all", "min", "exact"];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all" => Some(MatchMode::All),
            "min" => Some(MatchMode::Min),
            "exact" => Some(MatchMode::Exact),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchMode::All => "all",
            MatchMode::Min => "min",
            MatchMode::Exact => "exact",
        }
    }

    /// The numeric code the portal's match-mode control expects.
    pub fn portal_code(self) -> &'static str {
        match self {
            MatchMode::All => "1",
            MatchMode::Min => "2",
            MatchMode::Exact => "3",
        }
    }
}

/// One search request against the portal.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// Raw keyword string. Also the cache key, byte for byte — two queries
    /// differing only in case are distinct cache entries.
    pub keywords: String,
    pub mode: MatchMode,
    /// Per-state filters to tick in the advanced-search form.
    pub states: Vec<StateCode>,
    /// Skip the cache lookup and overwrite the entry with a fresh fetch.
    pub bypass_cache: bool,
    /// Verbose portal-protocol logging.
    pub debug: bool,
}

impl SearchQuery {
    pub fn new(keywords: impl Into<String>) -> Self {
        Self {
            keywords: keywords.into(),
            mode: MatchMode::All,
            states: Vec::new(),
            bypass_cache: false,
            debug: false,
        }
    }
}

/// One company row scraped from the result grid.
///
/// Field names follow the established JSON contract of the service, hence
/// the `register_num` / `statusCurrent` spellings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Full court cell text (court name plus register designation).
    pub court: String,
    /// Register number extracted from the court cell, with state-specific
    /// suffix applied. `None` when the cell carries no register designation.
    pub register_num: Option<String>,
    pub name: String,
    /// State as the portal renders it (free-form German name).
    pub state: String,
    /// Status cell verbatim (trimmed).
    pub status: String,
    /// Status uppercased with each space replaced by an underscore.
    #[serde(rename = "statusCurrent")]
    pub status_current: String,
    /// Documents-column cell text.
    pub documents: String,
    /// Former names as (name, location) pairs, oldest-last as rendered.
    pub history: Vec<(String, String)>,
}
