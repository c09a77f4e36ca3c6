use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use search_core::{
    load_jsonl_file, DocumentId, DocumentMatch, DocumentStatus, InputDocument, RankedDocument,
    SearchError, SearchServer, SharedSearchServer,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// JSONL file loaded at startup
    pub documents: Option<PathBuf>,
    pub stop_words: String,
    /// Required in `X-ADMIN-TOKEN` for writes; writes are refused when unset
    pub admin_token: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub status: Option<DocumentStatus>,
    pub min_rating: Option<i32>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub total_hits: usize,
    pub results: Vec<RankedDocument>,
}

#[derive(Deserialize)]
pub struct MatchParams {
    pub q: String,
    pub id: DocumentId,
}

#[derive(Serialize)]
pub struct MatchResponse {
    pub id: DocumentId,
    #[serde(flatten)]
    pub matched: DocumentMatch,
}

#[derive(Clone)]
pub struct AppState {
    pub search: SharedSearchServer,
    pub admin_token: Option<String>,
}

#[derive(Debug)]
pub enum ApiError {
    Search(SearchError),
    Unauthorized(String),
}

impl From<SearchError> for ApiError {
    fn from(e: SearchError) -> Self { ApiError::Search(e) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            ApiError::Search(e) => {
                let status = match e {
                    SearchError::OutOfRange { .. } | SearchError::NotFound(_) => StatusCode::NOT_FOUND,
                    _ => StatusCode::BAD_REQUEST,
                };
                (status, e.kind(), e.to_string())
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg),
        };
        (status, Json(serde_json::json!({ "error": kind, "message": message }))).into_response()
    }
}

pub fn build_app(config: AppConfig) -> Result<Router> {
    let mut server = SearchServer::with_stop_words(&config.stop_words)?;
    if let Some(path) = &config.documents {
        load_jsonl_file(&mut server, path)?;
    }
    let app_state = AppState { search: SharedSearchServer::new(server), admin_token: config.admin_token };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/match", get(match_handler))
        .route("/documents", post(add_document_handler))
        .route("/documents/count", get(count_handler))
        .route("/documents/at/:index", get(document_id_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);
    Ok(app)
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let server = state.search.read();
    let hits = match (params.status, params.min_rating) {
        (None, None) => server.search_with(&params.q, |_, doc_status, _| doc_status == DocumentStatus::Actual)?,
        (status, min_rating) => server.search_with(&params.q, |_, doc_status, rating| {
            status.map_or(true, |s| s == doc_status) && min_rating.map_or(true, |m| rating >= m)
        })?,
    };
    Ok(Json(SearchResponse { query: params.q, total_hits: hits.total_hits, results: hits.documents }))
}

pub async fn match_handler(
    State(state): State<AppState>,
    Query(params): Query<MatchParams>,
) -> Result<Json<MatchResponse>, ApiError> {
    let matched = state.search.read().match_document(&params.q, params.id)?;
    Ok(Json(MatchResponse { id: params.id, matched }))
}

pub async fn count_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "count": state.search.read().document_count() }))
}

pub async fn document_id_handler(
    State(state): State<AppState>,
    Path(index): Path<i32>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = state.search.read().document_id(index)?;
    Ok(Json(serde_json::json!({ "index": index, "id": id })))
}

async fn add_document_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(doc): Json<InputDocument>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    authorize(&state, &headers)?;
    state.search.write().add_input_document(&doc)?;
    tracing::info!(id = doc.id, "document indexed");
    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": doc.id }))))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err(ApiError::Unauthorized("ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err(ApiError::Unauthorized("invalid admin token".into()))
    }
}
