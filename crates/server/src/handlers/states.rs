//! State lookup and listing — thin pass-throughs to the state registry.

use axum::Json;
use axum::extract::Query;
use serde::Deserialize;
use serde_json::{Value, json};

use hreg_states::StateCode;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct LookupParams {
    pub name: Option<String>,
}

/// GET /api/bundesland?name=
pub async fn lookup(Query(params): Query<LookupParams>) -> Result<Json<Value>, ApiError> {
    let name = params
        .name
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApiError::Validation("Missing required parameter: name".to_string()))?;

    let code = StateCode::resolve(&name).ok_or_else(|| ApiError::NotFound {
        message: format!("Unknown district name: {name}"),
        hint: "Try German names (e.g., \"Berlin\", \"Bayern\") or English names \
               (e.g., \"Bavaria\", \"North Rhine-Westphalia\")"
            .to_string(),
    })?;

    Ok(Json(json!({
        "code": code.as_str(),
        "name_de": code.name_de(),
        "input": name,
        "form_field": code.form_field(),
    })))
}

/// GET /api/bundesland/list
pub async fn list() -> Json<Value> {
    let entries: Vec<Value> = StateCode::ALL
        .iter()
        .map(|code| {
            json!({
                "code": code.as_str(),
                "name_de": code.name_de(),
                "form_field": code.form_field(),
            })
        })
        .collect();
    Json(Value::Array(entries))
}
