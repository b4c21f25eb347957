//! The search endpoint: validate, then run the portal pipeline inside an
//! isolated, timeout-bounded task.

use std::sync::Arc;

use axum::extract::Query;
use axum::{Extension, Json};
use serde::Deserialize;
use tracing::warn;

use hreg_portal::{Company, MatchMode, SearchQuery};
use hreg_states::StateCode;

use crate::error::ApiError;
use crate::state::SharedState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub keywords: Option<String>,
    pub mode: Option<String>,
    pub bundesland: Option<String>,
    pub force: Option<String>,
    pub debug: Option<String>,
}

/// GET /api/search
///
/// All validation happens before any network work. The pipeline itself runs
/// on its own spawned task bounded by the configured wall-clock timeout; on
/// expiry the task is abandoned, not aborted — the in-flight portal exchange
/// may keep running detached, so a timeout does not guarantee the external
/// connection is released.
pub async fn search(
    Extension(state): Extension<SharedState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Company>>, ApiError> {
    let query = validate(params)?;

    let searcher = Arc::clone(&state.searcher);
    let timeout = state.config.server.request_timeout();
    let keywords = query.keywords.clone();

    let work = tokio::spawn(async move { searcher.search(&query).await });
    match tokio::time::timeout(timeout, work).await {
        Err(_elapsed) => {
            warn!(%keywords, timeout_secs = timeout.as_secs(), "search timed out; pipeline task abandoned");
            Err(ApiError::Timeout(state.config.server.request_timeout_secs))
        }
        Ok(Err(join_error)) => Err(ApiError::Internal(format!(
            "search task failed: {join_error}"
        ))),
        Ok(Ok(Err(portal_error))) => Err(portal_error.into()),
        Ok(Ok(Ok(companies))) => Ok(Json(companies)),
    }
}

fn validate(params: SearchParams) -> Result<SearchQuery, ApiError> {
    let keywords = params
        .keywords
        .filter(|keywords| !keywords.is_empty())
        .ok_or_else(|| ApiError::Validation("Missing required parameter: keywords".to_string()))?;

    let mode = match params.mode.as_deref() {
        None | Some("") => MatchMode::All,
        Some(raw) => MatchMode::parse(raw).ok_or_else(|| {
            ApiError::Validation(format!(
                "Invalid mode parameter. Must be one of: {}",
                MatchMode::OPTIONS.join(", ")
            ))
        })?,
    };

    let mut states = Vec::new();
    if let Some(raw) = params.bundesland.filter(|raw| !raw.is_empty()) {
        let mut invalid = Vec::new();
        for token in raw.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            match StateCode::resolve(token) {
                Some(code) => states.push(code),
                None => invalid.push(token.to_string()),
            }
        }
        // Reject the whole request when anything is unknown, naming every
        // offender at once.
        if !invalid.is_empty() {
            let valid: Vec<&str> = StateCode::ALL.iter().map(|c| c.as_str()).collect();
            return Err(ApiError::Validation(format!(
                "Invalid bundesland code(s): {}. Valid codes: {}",
                invalid.join(", "),
                valid.join(", ")
            )));
        }
    }

    let mut query = SearchQuery::new(keywords);
    query.mode = mode;
    query.states = states;
    query.bypass_cache = flag(params.force.as_deref());
    query.debug = flag(params.debug.as_deref());
    Ok(query)
}

fn flag(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> SearchParams {
        let mut p = SearchParams::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "keywords" => p.keywords = value,
                "mode" => p.mode = value,
                "bundesland" => p.bundesland = value,
                "force" => p.force = value,
                "debug" => p.debug = value,
                other => panic!("unknown param {other}"),
            }
        }
        p
    }

    #[test]
    fn keywords_are_required() {
        let err = validate(params(&[])).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(err.to_string().contains("keywords"));
    }

    #[test]
    fn mode_defaults_to_all() {
        let query = validate(params(&[("keywords", "Gasag AG")])).unwrap();
        assert_eq!(query.mode, MatchMode::All);
        assert!(!query.bypass_cache);
        assert!(query.states.is_empty());
    }

    #[test]
    fn unknown_mode_lists_the_options() {
        let err = validate(params(&[("keywords", "x"), ("mode", "fuzzy")])).unwrap_err();
        assert!(err.to_string().contains("all, min, exact"));
    }

    #[test]
    fn bundesland_accepts_codes_and_names() {
        let query = validate(params(&[
            ("keywords", "x"),
            ("bundesland", "BE, Bavaria ,hh"),
        ]))
        .unwrap();
        assert_eq!(
            query.states,
            vec![StateCode::BE, StateCode::BY, StateCode::HH]
        );
    }

    #[test]
    fn invalid_bundesland_names_every_offender() {
        let err = validate(params(&[
            ("keywords", "x"),
            ("bundesland", "BE,XX,Atlantis"),
        ]))
        .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("XX"));
        assert!(message.contains("Atlantis"));
        assert!(message.contains("Valid codes: BW, BY, BE"));
    }

    #[test]
    fn force_flag_is_case_insensitive_true() {
        assert!(validate(params(&[("keywords", "x"), ("force", "True")]))
            .unwrap()
            .bypass_cache);
        assert!(!validate(params(&[("keywords", "x"), ("force", "1")]))
            .unwrap()
            .bypass_cache);
        assert!(!validate(params(&[("keywords", "x"), ("force", "false")]))
            .unwrap()
            .bypass_cache);
    }
}
