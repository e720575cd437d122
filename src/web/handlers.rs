//! Request handlers
//!
//! Each handler is an explicit request -> render-model function: all input
//! arrives as parameters, the result is a view value, and `render` turns the
//! view into markup. No per-session state exists anywhere.

use crate::downloader::{build_download_link, fetch_payload, CollectingSink, ProgressUpdate};
use crate::extractor::{resolve_with_retry, SearchEntry, VideoInfo};
use crate::utils::MedialinkError;
use crate::web::{render, AppState};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, warn};

/// Selectable resolution labels, in display order.
pub const RESOLUTION_LABELS: [&str; 5] = ["144p", "240p", "360p", "480p", "720p"];

/// Map a resolution label to the format height cap. Unrecognized labels fall
/// back to 720.
pub fn max_height_for_label(label: &str) -> u32 {
    match label {
        "144p" => 144,
        "240p" => 240,
        "360p" => 360,
        "480p" => 480,
        "720p" => 720,
        _ => 720,
    }
}

#[derive(Debug, Deserialize)]
pub struct FetchQuery {
    pub url: String,
    #[serde(default)]
    pub resolution: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

/// Render model for the direct-fetch page.
#[derive(Debug)]
pub struct FetchView {
    pub progress: Vec<ProgressUpdate>,
    pub outcome: FetchOutcome,
}

#[derive(Debug)]
pub enum FetchOutcome {
    Resolved { info: VideoInfo, anchor: String },
    Failed { message: String },
}

/// Render model for the search page.
#[derive(Debug)]
pub struct SearchView {
    pub query: String,
    pub entries: Vec<SearchEntry>,
    pub warning: Option<String>,
}

/// Top-level failure response. Only errors with no inline rendering path
/// (download-link construction) convert into this.
pub struct AppError(pub MedialinkError);

impl From<MedialinkError> for AppError {
    fn from(e: MedialinkError) -> Self {
        Self(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Unhandled failure while serving request: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(render::error_page(&self.0.to_string())),
        )
            .into_response()
    }
}

/// GET /
pub async fn index() -> Html<String> {
    Html(render::index_page())
}

/// GET /fetch?url=...&resolution=...
pub async fn fetch(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FetchQuery>,
) -> Result<Html<String>, AppError> {
    let view = fetch_view(&state, &params.url, &params.resolution).await?;
    Ok(Html(render::fetch_page(&view)))
}

/// GET /search?q=...
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Html<String> {
    let view = search_view(&state, &params.q).await;
    Html(render::search_page(&view))
}

/// Resolve a video and assemble its download link.
///
/// Resolution failures (including retry exhaustion) come back as an inline
/// `FetchOutcome::Failed`; a failure while fetching the payload for the
/// download link is the one path that escapes as `Err` to the top-level
/// error response.
pub async fn fetch_view(
    state: &AppState,
    url: &str,
    resolution: &str,
) -> Result<FetchView, MedialinkError> {
    let max_height = max_height_for_label(resolution);
    let sink = CollectingSink::new();

    match resolve_with_retry(
        state.extractor.as_ref(),
        url,
        max_height,
        &sink,
        &state.settings.retry,
    )
    .await
    {
        Ok(info) => {
            let payload = fetch_payload(
                &state.client,
                &info.direct_url,
                state.settings.max_payload_bytes,
                &sink,
            )
            .await?;
            let anchor = build_download_link(&payload, &info.title);
            Ok(FetchView {
                progress: sink.take(),
                outcome: FetchOutcome::Resolved { info, anchor },
            })
        }
        Err(e) => Ok(FetchView {
            progress: sink.take(),
            outcome: FetchOutcome::Failed {
                message: e.to_string(),
            },
        }),
    }
}

/// Run a flat search. Failures never surface as request errors: they render
/// as an empty listing plus an inline warning.
pub async fn search_view(state: &AppState, query: &str) -> SearchView {
    match state
        .extractor
        .search(query, state.settings.search_limit)
        .await
    {
        Ok(entries) if entries.is_empty() => SearchView {
            query: query.to_string(),
            entries,
            warning: Some("No search results found.".to_string()),
        },
        Ok(entries) => SearchView {
            query: query.to_string(),
            entries,
            warning: None,
        },
        Err(e) => {
            warn!("Search failed for '{}': {}", query, e);
            SearchView {
                query: query.to_string(),
                entries: Vec::new(),
                warning: Some(format!("An error occurred during the search: {}", e)),
            }
        }
    }
}
