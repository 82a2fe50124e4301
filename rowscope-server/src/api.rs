//! REST endpoints over the dataset core.

use axum::{
    extract::{Path, Query as QueryParams, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use rowscope_connectors::{export_csv, export_file_name, Catalog, ConnectorError};
use rowscope_core::{
    display_columns, paginate, statistics, FilterOptions, Page, Query, Statistics,
    DEFAULT_DISPLAY_COLUMNS,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/locations", get(list_locations))
        .route("/api/datasets/:value/records", get(get_records))
        .route("/api/datasets/:value/statistics", get(get_statistics))
        .route("/api/datasets/:value/filters", get(get_filter_options))
        .route("/api/datasets/:value/export", get(export_records))
        .with_state(state)
}

fn error_status(e: &ConnectorError) -> StatusCode {
    match e {
        ConnectorError::NotFound(_) => StatusCode::NOT_FOUND,
        ConnectorError::NothingToExport => StatusCode::BAD_REQUEST,
        ConnectorError::Http(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn to_error(e: ConnectorError) -> (StatusCode, String) {
    let status = error_status(&e);
    if status.is_server_error() {
        warn!("Request failed: {}", e);
    }
    (status, e.to_string())
}

async fn health_check() -> &'static str {
    "OK"
}

// === Catalog ===

async fn list_locations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Catalog>, (StatusCode, Json<serde_json::Value>)> {
    state.catalog().await.map(|c| Json(c.clone())).map_err(|e| {
        warn!("Error reading data directory: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": "Failed to load locations" })),
        )
    })
}

// === Records ===

/// Query string shared by the record, statistics and export endpoints.
#[derive(Debug, Default, Deserialize)]
struct RecordParams {
    search: Option<String>,
    location: Option<String>,
    building: Option<String>,
    page: Option<usize>,
    page_size: Option<usize>,
}

impl RecordParams {
    fn query(&self) -> Query {
        Query {
            search: self.search.clone(),
            location: self.location.clone(),
            building: self.building.clone(),
        }
    }
}

#[derive(Serialize)]
struct RecordsResponse<'a> {
    headers: &'a [String],
    /// Subset of `headers` a table view should show.
    columns: Vec<String>,
    #[serde(flatten)]
    page: Page<'a>,
}

// GET /api/datasets/:value/records?search=&location=&building=&page=1&page_size=50
async fn get_records(
    State(state): State<Arc<AppState>>,
    Path(value): Path<String>,
    QueryParams(params): QueryParams<RecordParams>,
) -> Result<Response, (StatusCode, String)> {
    let (_, dataset) = state.dataset(&value).await.map_err(to_error)?;

    let matched = params.query().apply(&dataset.records);
    let page = paginate(
        matched,
        params.page.unwrap_or(1),
        params.page_size.unwrap_or(state.config.page_size),
    );

    Ok(Json(RecordsResponse {
        headers: &dataset.headers,
        columns: display_columns(&dataset.headers, DEFAULT_DISPLAY_COLUMNS),
        page,
    })
    .into_response())
}

// GET /api/datasets/:value/statistics?search=&location=&building=
async fn get_statistics(
    State(state): State<Arc<AppState>>,
    Path(value): Path<String>,
    QueryParams(params): QueryParams<RecordParams>,
) -> Result<Json<Statistics>, (StatusCode, String)> {
    let (_, dataset) = state.dataset(&value).await.map_err(to_error)?;
    let matched = params.query().apply(&dataset.records);
    Ok(Json(statistics(matched)))
}

#[derive(Debug, Deserialize)]
struct FilterOptionParams {
    limit: Option<usize>,
}

// GET /api/datasets/:value/filters?limit=20
async fn get_filter_options(
    State(state): State<Arc<AppState>>,
    Path(value): Path<String>,
    QueryParams(params): QueryParams<FilterOptionParams>,
) -> Result<Json<FilterOptions>, (StatusCode, String)> {
    let (_, dataset) = state.dataset(&value).await.map_err(to_error)?;
    let limit = params.limit.unwrap_or(state.config.filter_option_limit);
    Ok(Json(FilterOptions::from_records(&dataset.records, Some(limit))))
}

// GET /api/datasets/:value/export?search=&location=&building=
async fn export_records(
    State(state): State<Arc<AppState>>,
    Path(value): Path<String>,
    QueryParams(params): QueryParams<RecordParams>,
) -> Result<Response, (StatusCode, String)> {
    let (entry, dataset) = state.dataset(&value).await.map_err(to_error)?;
    let matched = params.query().apply(&dataset.records);
    let count = matched.len();

    let mut body = Vec::new();
    export_csv(matched, &dataset.headers, &mut body).map_err(to_error)?;

    let file_name = export_file_name(&entry.label, Utc::now());
    info!("Exporting {} records from '{}' as {}", count, entry.value, file_name);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
        .into_response())
}
