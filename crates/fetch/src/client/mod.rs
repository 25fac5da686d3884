//! Status client abstraction: one remote lookup for one GSTIN.

pub mod http;
pub mod static_client;

use async_trait::async_trait;
use gstn_core::{Gstin, RawFilingRecord};

use crate::error::LookupError;

/// Fetches the filing-status payload for ONE GSTIN and reporting year.
///
/// Implementations issue exactly one call and never retry. On success the
/// returned record's `gstin` is the requested identifier, whatever the
/// service put there.
#[async_trait]
pub trait StatusClient: Send + Sync {
    async fn lookup(&self, gstin: &Gstin, year: &str) -> Result<RawFilingRecord, LookupError>;

    /// Short identifier for logs ("http", "static").
    fn client_id(&self) -> &str;
}
