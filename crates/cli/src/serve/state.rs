//! Application state shared across request handlers.

use std::path::{Path, PathBuf};

use crate::runner::Pipeline;

pub(crate) struct AppState {
    /// Configured once at startup; the status client inside is shared.
    pub(crate) pipeline: Pipeline,
}

impl AppState {
    pub(crate) fn new(pipeline: Pipeline) -> Self {
        AppState { pipeline }
    }

    /// Resolve a report name handed back by a client.
    ///
    /// Only bare names of files this service writes are accepted: no path
    /// separators, no `..`, `filing_` prefix and `.csv` suffix.
    pub(crate) fn report_path(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
            return None;
        }
        if !name.starts_with("filing_") || !name.ends_with(".csv") {
            return None;
        }
        Some(self.export_dir().join(name))
    }

    pub(crate) fn export_dir(&self) -> &Path {
        self.pipeline.export_dir()
    }
}
