//! The report pipeline shared by `gstn report` and `gstn serve`:
//! extract -> fetch + reconcile -> export.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use gstn_core::{
    extract_gstins, write_report_file, ExportError, ExtractError, InputFormat, PeriodError,
    ReportingPeriod,
};
use gstn_fetch::{fetch_all, FetchError, FetchOptions, HttpStatusClient, StatusClient};
use tracing::info;

use crate::config::{Config, ConfigError};

/// Anything that stops a report from being produced.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("could not read '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("no GSTINs found in the uploaded file")]
    NoGstins,

    #[error(transparent)]
    Period(#[from] PeriodError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

impl ReportError {
    /// Short user-facing label for the failure.
    pub fn category(&self) -> &'static str {
        match self {
            ReportError::Extract(ExtractError::ColumnNotFound | ExtractError::HeaderNotFound) => {
                "no matching column"
            }
            ReportError::Extract(_) | ReportError::Read { .. } | ReportError::NoGstins => {
                "bad file"
            }
            ReportError::Period(_) => "invalid period",
            ReportError::Config(_) => "configuration",
            ReportError::Fetch(_) => "remote timeout",
            ReportError::Export(_) => "export failed",
        }
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub path: PathBuf,
    pub gstins: usize,
    pub resolved: usize,
    pub failed: usize,
}

impl ReportSummary {
    /// The report's file name inside the export directory.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// One configured pipeline. The status client is built once and shared by
/// every run.
pub struct Pipeline {
    client: Option<Arc<dyn StatusClient>>,
    options: FetchOptions,
    export_dir: PathBuf,
}

impl Pipeline {
    /// Build from configuration. A missing service URL is only reported
    /// when a run reaches the lookup stage.
    pub fn from_config(config: &Config) -> Self {
        let client = config.remote_url().ok().map(|url| {
            Arc::new(HttpStatusClient::new(url, config.remote_timeout())) as Arc<dyn StatusClient>
        });
        Pipeline {
            client,
            options: config.fetch_options(),
            export_dir: config.serve.export_dir.clone(),
        }
    }

    pub fn with_client(
        client: Arc<dyn StatusClient>,
        options: FetchOptions,
        export_dir: &Path,
    ) -> Self {
        Pipeline {
            client: Some(client),
            options,
            export_dir: export_dir.to_path_buf(),
        }
    }

    /// Write reports somewhere other than the configured directory.
    pub fn with_export_dir(mut self, export_dir: &Path) -> Self {
        self.export_dir = export_dir.to_path_buf();
        self
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Run the whole pipeline for one uploaded document.
    pub async fn run(
        &self,
        bytes: &[u8],
        format: InputFormat,
        period: &ReportingPeriod,
    ) -> Result<ReportSummary, ReportError> {
        let gstins = extract_gstins(bytes, format)?;
        if gstins.is_empty() {
            return Err(ReportError::NoGstins);
        }

        let client = self.client.clone().ok_or(ConfigError::MissingUrl)?;
        let outcome = fetch_all(client, &gstins, period, &self.options).await?;

        let path = write_report_file(&self.export_dir, period, &outcome.records)?;
        let summary = ReportSummary {
            path,
            gstins: gstins.len(),
            resolved: outcome.records.len(),
            failed: outcome.failures.len(),
        };
        info!(
            report = %summary.path.display(),
            gstins = summary.gstins,
            resolved = summary.resolved,
            failed = summary.failed,
            "report ready"
        );
        Ok(summary)
    }
}
