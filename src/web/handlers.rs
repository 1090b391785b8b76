//! HTTP request handlers

use super::state::AppState;
use crate::results::{AggregateOutcome, SearchResult};
use crate::search::CallerContext;
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Search parameters, from the query string or a JSON body
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Search query
    pub q: Option<String>,
    /// Explicit user identity
    pub user_id: Option<String>,
    /// Caller asks for adult content
    #[serde(default)]
    pub include_adult: bool,
}

/// Response envelope
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    /// Always empty: adult sites are excluded before dispatch, never split out after
    pub adult_results: Vec<SearchResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /search
pub async fn search(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Response {
    run_search(&state, &headers, params).await
}

/// POST /search
pub async fn search_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(params): Json<SearchParams>,
) -> Response {
    run_search(&state, &headers, params).await
}

async fn run_search(state: &AppState, headers: &HeaderMap, params: SearchParams) -> Response {
    let ctx = CallerContext {
        user_id: params
            .user_id
            .filter(|u| !u.trim().is_empty())
            .or_else(|| bearer_token(headers)),
        include_adult: params.include_adult,
    };

    let outcome = state.aggregator.aggregate(params.q.as_deref(), &ctx).await;
    assemble(outcome, state.cache_max_age())
}

/// Wrap an outcome in the response envelope with status and cache directives
fn assemble(outcome: AggregateOutcome, max_age: u64) -> Response {
    let (status, cache_control, error) = if outcome.errored {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            HeaderValue::from_static("no-store"),
            Some("search failed".to_string()),
        )
    } else {
        let value = HeaderValue::from_str(&format!("public, max-age={}", max_age))
            .unwrap_or_else(|_| HeaderValue::from_static("no-cache"));
        (StatusCode::OK, value, None)
    };

    let body = SearchResponse {
        results: outcome.results,
        adult_results: Vec::new(),
        error,
    };

    (
        status,
        [
            (header::CACHE_CONTROL, cache_control),
            (header::VARY, HeaderValue::from_static("Authorization")),
        ],
        Json(body),
    )
        .into_response()
}

/// Token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}
