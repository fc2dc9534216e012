use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::response::Html;
use axum::Json;
use dccode_render::group::ParagraphGroup;
use dccode_render::source::{checked_relative, MemorySource};
use dccode_render::xml::parse_document;
use dccode_render::{render_body as body_html, Body, FlattenOptions, Flattener};
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_DOCUMENT_PATH;
use crate::error::ServerError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PathParams {
    pub path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    /// XML of the document to render.
    pub document: String,
    /// Where the document lives, relative to the code directory.
    pub path: Option<String>,
    /// Unsaved documents, by relative path, that shadow stored ones.
    #[serde(default)]
    pub overrides: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub title: String,
    pub html: String,
    pub groups: Vec<ParagraphGroup>,
}

pub async fn health() -> &'static str {
    "OK"
}

/// Raw XML in, body markup out.
pub async fn render_body(
    State(state): State<AppState>,
    Query(params): Query<PathParams>,
    document: String,
) -> Result<Html<String>, ServerError> {
    let path = params.path.unwrap_or_else(|| DEFAULT_DOCUMENT_PATH.to_string());
    let rendered = render_blocking(state, document, path, HashMap::new()).await?;
    Ok(Html(rendered.html))
}

/// JSON request with optional path and overrides; title, markup and groups out.
pub async fn render(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Result<Json<RenderResponse>, ServerError> {
    let path = request
        .path
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| DEFAULT_DOCUMENT_PATH.to_string());
    let rendered = render_blocking(state, request.document, path, request.overrides).await?;
    Ok(Json(rendered))
}

/// Flattening is CPU-bound and may touch the filesystem, so it runs off the
/// async workers. A panic stays inside its task and surfaces as an error.
async fn render_blocking(
    state: AppState,
    document: String,
    path: String,
    overrides: HashMap<String, String>,
) -> Result<RenderResponse, ServerError> {
    tokio::task::spawn_blocking(move || render_document(&state, &document, &path, &overrides)).await?
}

fn render_document(
    state: &AppState,
    document: &str,
    path: &str,
    overrides: &HashMap<String, String>,
) -> Result<RenderResponse, ServerError> {
    if document.trim().is_empty() {
        return Err(ServerError::BadRequest("empty document".to_string()));
    }
    let path = checked_relative(path)?;
    let root = parse_document(document)?;
    let options = FlattenOptions::default().with_overrides(MemorySource::from_xml(overrides)?);
    let flattener = Flattener::new(&*state.source, &state.index, &state.linker, &options);

    let body = Body::build(&flattener, &root, &path)?;
    tracing::debug!(path = %path, groups = body.groups.len(), "rendered document");

    Ok(RenderResponse {
        html: body_html(&body.groups, &state.linker.link_root),
        title: body.title,
        groups: body.groups,
    })
}
