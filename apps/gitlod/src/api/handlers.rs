//! # HTTP Handlers
//!
//! Each RDF handler negotiates a format, then hands the engine work to the
//! blocking pool: entity construction, fetches and emission may all block on
//! the record source.

use super::AppState;
use super::types::{ApiError, FormatQuery, HealthResponse};
use crate::source::{checked_login, checked_repo_name};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use gitlod_core::{
    Account, EmitReport, Entity, Format, GitlodError, Mode, Person, Repository, TripleSink,
};

// =============================================================================
// CONTENT NEGOTIATION
// =============================================================================

/// Pick the output format.
///
/// An explicit `?format=` wins and must be known. Otherwise the first
/// recognised media type in `Accept` is used; anything else falls back to
/// Turtle.
pub fn negotiate(query: Option<&str>, accept: Option<&str>) -> Result<Format, ApiError> {
    if let Some(requested) = query {
        return requested
            .parse()
            .map_err(|e: GitlodError| ApiError::new(StatusCode::BAD_REQUEST, e.to_string()));
    }
    Ok(accept
        .into_iter()
        .flat_map(|a| a.split(','))
        .find_map(Format::from_media_type)
        .unwrap_or_default())
}

fn accept(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::ACCEPT).and_then(|v| v.to_str().ok())
}

/// Run `work` on the blocking pool and serialize what it emits.
async fn render<F>(format: Format, work: F) -> Result<Response, ApiError>
where
    F: FnOnce(&mut dyn TripleSink) -> Result<EmitReport, GitlodError> + Send + 'static,
{
    let body = tokio::task::spawn_blocking(move || {
        let mut writer = format.writer(Vec::new());
        let report = work(&mut writer)?;
        if !report.is_complete() {
            tracing::warn!(
                triples = report.triples,
                skipped = report.failed.len(),
                "partial graph served"
            );
        }
        writer.finish()
    })
    .await
    .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))??;

    Ok(([(header::CONTENT_TYPE, format.media_type())], body).into_response())
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `GET /health`
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// `GET /`
pub async fn root_handler() -> Redirect {
    Redirect::to("/users")
}

/// `GET /users`: every loaded entity, full.
pub async fn users_handler(
    State(state): State<AppState>,
    Query(query): Query<FormatQuery>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    union(state, &query, &headers).await
}

/// `GET /repos`: every loaded entity, full.
pub async fn repos_handler(
    State(state): State<AppState>,
    Query(query): Query<FormatQuery>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    union(state, &query, &headers).await
}

async fn union(
    state: AppState,
    query: &FormatQuery,
    headers: &HeaderMap,
) -> Result<Response, ApiError> {
    let format = negotiate(query.format.as_deref(), accept(headers))?;
    render(format, move |sink| {
        state
            .registry
            .union_view(state.source.clone())
            .with_traversal(state.traversal)
            .emit(Mode::Full, sink)
    })
    .await
}

/// `GET /users/{login}`: the person, fetched, full.
pub async fn user_handler(
    State(state): State<AppState>,
    Path(login): Path<String>,
    Query(query): Query<FormatQuery>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    checked_login(&login)?;
    let format = negotiate(query.format.as_deref(), accept(&headers))?;
    render(format, move |sink| {
        let mut person = Person::get(state.source.clone(), &login)?;
        person.fetch()?;
        state.traversal.emit(&mut person, Mode::Full, sink)
    })
    .await
}

/// `GET /users/{login}/repos/{repo}`: the project behind one of the account's
/// repositories, fetched, full.
pub async fn repo_handler(
    State(state): State<AppState>,
    Path((login, repo)): Path<(String, String)>,
    Query(query): Query<FormatQuery>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    checked_login(&login)?;
    checked_repo_name(&login, &repo)?;
    let format = negotiate(query.format.as_deref(), accept(&headers))?;
    render(format, move |sink| {
        let mut account = Account::get(state.source.clone(), &login)?;
        let mut project = account
            .repository(&repo)?
            .map(Repository::project)
            .ok_or_else(|| GitlodError::RecordNotFound(format!("repo {}/{}", login, repo)))?;
        project.fetch()?;
        state.traversal.emit(&mut project, Mode::Full, sink)
    })
    .await
}
