//! API handlers for the marksheet server
//!
//! - `GET /` upload form
//! - `GET /health`
//! - `POST /upload` roster in, zip of marksheets out

use std::path::{Path, PathBuf};

use axum::{
    extract::{Multipart, State},
    http::header,
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::Local;
use marksheet_core::{archive_file_name, bundle_documents, generate_marksheets, ArchiveSummary, Roster};
use serde::Serialize;
use tempfile::{Builder, TempDir};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ServerError;
use crate::state::AppState;

const UPLOAD_FIELD: &str = "file";
const FALLBACK_UPLOAD_NAME: &str = "roster.xlsx";

const INDEX_HTML: &str = r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>Marksheet Generator</title></head>
<body>
  <h1>Marksheet Generator</h1>
  <form action="/upload" method="post" enctype="multipart/form-data">
    <input type="file" name="file" accept=".xlsx,.xlsm,.xls,.ods">
    <button type="submit">Generate marksheets</button>
  </form>
</body>
</html>
"#;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /
pub async fn handle_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Handler: GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "marksheet",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Handler: POST /upload
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, ServerError> {
    let job_id = Uuid::new_v4().to_string();
    // Both job directories are removed when these guards drop, on every path out
    let upload_job = job_dir(&state.upload_dir, &job_id)?;
    let output_job = job_dir(&state.output_dir, &job_id)?;

    let roster_path = save_upload(&mut multipart, upload_job.path()).await?;
    info!(job = %job_id, roster = %roster_path.display(), "Roster uploaded");

    let output_dir = output_job.path().to_path_buf();
    let archive_name = archive_file_name(&Local::now());

    let job_state = state.clone();
    let archive = tokio::task::spawn_blocking(move || {
        run_job(&job_state, &roster_path, &output_dir, &archive_name)
    })
    .await
    .map_err(|e| ServerError::Internal(format!("Batch task failed: {}", e)))??;

    let body = tokio::fs::read(&archive.path).await?;
    let file_name = archive
        .path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("marks.zip")
        .to_string();

    info!(
        job = %job_id,
        documents = archive.entry_count,
        bytes = body.len(),
        "Archive ready"
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
        .into_response())
}

/// Store the `file` field under `dir`, returning its path
async fn save_upload(multipart: &mut Multipart, dir: &Path) -> Result<PathBuf, ServerError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::InvalidRequest(format!("Malformed upload: {}", e)))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            debug!(field = ?field.name(), "Ignoring form field");
            continue;
        }

        let file_name = upload_file_name(field.file_name().unwrap_or(FALLBACK_UPLOAD_NAME));
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ServerError::InvalidRequest(format!("Malformed upload: {}", e)))?;
        if bytes.is_empty() {
            return Err(ServerError::InvalidRequest("Uploaded file is empty".into()));
        }

        let path = dir.join(file_name);
        tokio::fs::write(&path, &bytes).await?;
        return Ok(path);
    }

    Err(ServerError::InvalidRequest(format!(
        "No '{}' field in upload",
        UPLOAD_FIELD
    )))
}

/// Per-request directory named after the job id, deleted on drop
fn job_dir(root: &Path, job_id: &str) -> Result<TempDir, ServerError> {
    Builder::new()
        .prefix(job_id)
        .rand_bytes(0)
        .tempdir_in(root)
        .map_err(|e| ServerError::Internal(format!("Cannot create job directory: {}", e)))
}

/// Final path component of a client-supplied name
fn upload_file_name(raw: &str) -> String {
    raw.rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .unwrap_or(FALLBACK_UPLOAD_NAME)
        .to_string()
}

fn run_job(
    state: &AppState,
    roster_path: &Path,
    output_dir: &Path,
    archive_name: &str,
) -> Result<ArchiveSummary, ServerError> {
    let roster = Roster::open(roster_path)?;
    let documents = generate_marksheets(&roster, &state.config, &state.renderer, output_dir)?;
    let archive = bundle_documents(&documents, &output_dir.join(archive_name))?;
    Ok(archive)
}
