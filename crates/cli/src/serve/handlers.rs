//! HTTP route handlers: health, periods, upload, download.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use gstn_core::{InputFormat, ReportingPeriod, MONTHS, OFFERED_YEARS};
use tracing::{info, warn};

use super::json_error;
use super::state::AppState;
use crate::runner::ReportError;

/// Fallback handler for unmatched routes.
pub(crate) async fn handle_not_found() -> impl IntoResponse {
    json_error(StatusCode::NOT_FOUND, "not found")
}

/// GET /health
pub(crate) async fn handle_health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({"status": "ok"})))
}

/// GET /periods
pub(crate) async fn handle_periods() -> impl IntoResponse {
    let response = serde_json::json!({
        "months": MONTHS,
        "years": OFFERED_YEARS,
    });
    (StatusCode::OK, Json(response))
}

/// The uploaded file part.
struct Upload {
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Bytes,
}

impl Upload {
    /// Prefer the declared content type; fall back to the file name when the
    /// client sent none or a generic one.
    fn format(&self) -> Result<InputFormat, ReportError> {
        match self.content_type.as_deref() {
            Some(ct) if !ct.starts_with("application/octet-stream") => {
                Ok(InputFormat::from_content_type(ct)?)
            }
            declared => {
                let name = self.file_name.as_deref().unwrap_or_default();
                InputFormat::from_path(std::path::Path::new(name)).map_err(|_| {
                    gstn_core::ExtractError::UnsupportedFormat(
                        declared.unwrap_or("none").to_string(),
                    )
                    .into()
                })
            }
        }
    }
}

/// POST /fetch-taxpayer-details
///
/// Multipart fields: `month`, `year`, `file`.
pub(crate) async fn handle_fetch_taxpayer_details(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Response {
    let mut month = None;
    let mut year = None;
    let mut upload = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return json_error(StatusCode::BAD_REQUEST, &format!("invalid upload: {}", e))
                    .into_response()
            }
        };

        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "month" | "year" => {
                let value = match field.text().await {
                    Ok(v) => v,
                    Err(e) => {
                        return json_error(
                            StatusCode::BAD_REQUEST,
                            &format!("invalid '{}' field: {}", name, e),
                        )
                        .into_response()
                    }
                };
                if name == "month" {
                    month = Some(value);
                } else {
                    year = Some(value);
                }
            }
            "file" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = match field.bytes().await {
                    Ok(b) => b,
                    Err(e) => {
                        return json_error(
                            StatusCode::BAD_REQUEST,
                            &format!("invalid upload: {}", e),
                        )
                        .into_response()
                    }
                };
                upload = Some(Upload {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            _ => {}
        }
    }

    let upload = match upload {
        Some(u) => u,
        None => return json_error(StatusCode::BAD_REQUEST, "No file uploaded").into_response(),
    };
    if upload.bytes.is_empty() {
        return json_error(StatusCode::BAD_REQUEST, "Uploaded file is empty").into_response();
    }

    let period = match ReportingPeriod::parse(
        month.as_deref().unwrap_or_default(),
        year.as_deref().unwrap_or_default(),
    ) {
        Ok(p) => p,
        Err(e) => return report_error(ReportError::from(e)),
    };
    let format = match upload.format() {
        Ok(f) => f,
        Err(e) => return report_error(e),
    };

    match state.pipeline.run(&upload.bytes, format, &period).await {
        Ok(summary) => {
            let response = serde_json::json!({
                "success": "File processed successfully.",
                "file": summary.file_name(),
                "month": period.month(),
                "year": period.year(),
                "gstins": summary.gstins,
                "resolved": summary.resolved,
                "failed": summary.failed,
            });
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => report_error(e),
    }
}

/// Map a pipeline failure onto a status code. Server-side failures only
/// expose their category.
fn report_error(e: ReportError) -> Response {
    let status = match &e {
        ReportError::Extract(_)
        | ReportError::Read { .. }
        | ReportError::NoGstins
        | ReportError::Period(_) => StatusCode::BAD_REQUEST,
        ReportError::Fetch(_) => StatusCode::GATEWAY_TIMEOUT,
        ReportError::Config(_) | ReportError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        warn!("report failed: {}", e);
        json_error(status, e.category()).into_response()
    } else {
        json_error(status, &format!("{}: {}", e.category(), e)).into_response()
    }
}

/// POST /download-file
///
/// Body: `{"file": "<name returned by the upload>"}`. The file is deleted
/// once read, so each report can be downloaded once.
pub(crate) async fn handle_download_file(
    State(state): State<Arc<AppState>>,
    Json(parsed): Json<serde_json::Value>,
) -> Response {
    let name = match parsed.get("file").and_then(|v| v.as_str()) {
        Some(n) => n.to_string(),
        None => {
            return json_error(StatusCode::BAD_REQUEST, "missing 'file' field").into_response()
        }
    };
    let path = match state.report_path(&name) {
        Some(p) => p,
        None => {
            return json_error(StatusCode::BAD_REQUEST, "invalid file name").into_response()
        }
    };

    let contents = match tokio::fs::read(&path).await {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return json_error(StatusCode::NOT_FOUND, "File not found").into_response()
        }
        Err(e) => {
            warn!("could not read {}: {}", path.display(), e);
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "could not read file")
                .into_response();
        }
    };

    if let Err(e) = tokio::fs::remove_file(&path).await {
        warn!("could not delete {}: {}", path.display(), e);
    } else {
        info!(file = %name, "report downloaded and removed");
    }

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", name),
            ),
        ],
        contents,
    )
        .into_response()
}
