//! HTTP status client -- POSTs one JSON lookup per GSTIN.
//!
//! Uses `ureq` (sync) wrapped in `tokio::task::spawn_blocking` to avoid
//! blocking the async runtime. One agent is built from configuration and
//! shared by every lookup; it carries no per-request state.

use std::time::Duration;

use async_trait::async_trait;
use gstn_core::{Gstin, RawFilingRecord};
use serde::Serialize;

use super::StatusClient;
use crate::error::LookupError;

/// Request body sent to the filing-status service.
#[derive(Debug, Serialize)]
struct LookupRequest {
    gstin: String,
    fy: String,
}

/// Client for the remote filing-status endpoint.
///
/// - `url` is POSTed `{"gstin": ..., "fy": ...}`
/// - `timeout` bounds each call end to end (connect + response)
pub struct HttpStatusClient {
    url: String,
    agent: ureq::Agent,
}

impl HttpStatusClient {
    pub fn new(url: &str, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();

        HttpStatusClient {
            url: url.to_string(),
            agent: config.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl StatusClient for HttpStatusClient {
    async fn lookup(&self, gstin: &Gstin, year: &str) -> Result<RawFilingRecord, LookupError> {
        let agent = self.agent.clone();
        let url = self.url.clone();
        let request = LookupRequest {
            gstin: gstin.to_string(),
            fy: year.to_string(),
        };

        let mut record = tokio::task::spawn_blocking(move || post_lookup(&agent, &url, &request))
            .await
            .map_err(|e| LookupError::Transport {
                gstin: gstin.to_string(),
                message: format!("task join error: {}", e),
            })??;

        record.gstin = gstin.to_string();
        Ok(record)
    }

    fn client_id(&self) -> &str {
        "http"
    }
}

fn post_lookup(
    agent: &ureq::Agent,
    url: &str,
    request: &LookupRequest,
) -> Result<RawFilingRecord, LookupError> {
    let gstin = || request.gstin.clone();

    let response = agent
        .post(url)
        .send_json(request)
        .map_err(|e| LookupError::Transport {
            gstin: gstin(),
            message: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(LookupError::Status {
            gstin: gstin(),
            code: status.as_u16(),
        });
    }

    let body = response
        .into_body()
        .read_to_string()
        .map_err(|e| LookupError::Transport {
            gstin: gstin(),
            message: format!("failed to read response: {}", e),
        })?;
    if body.trim().is_empty() {
        return Err(LookupError::EmptyBody { gstin: gstin() });
    }

    let record: Option<RawFilingRecord> =
        serde_json::from_str(&body).map_err(|e| LookupError::Decode {
            gstin: gstin(),
            message: e.to_string(),
        })?;
    record.ok_or_else(|| LookupError::EmptyBody { gstin: gstin() })
}
