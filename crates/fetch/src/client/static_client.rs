//! Static status client -- answers from an in-memory table.
//!
//! Stands in for the remote service in tests and dry runs.

use std::collections::HashMap;

use async_trait::async_trait;
use gstn_core::{Gstin, RawFilingRecord};

use super::StatusClient;
use crate::error::LookupError;

/// Client that serves pre-populated payloads keyed by GSTIN.
///
/// Lookup order:
/// 1. GSTINs registered with [`StaticStatusClient::fail_with`] return that error
/// 2. GSTINs with a payload return it (GSTIN overwritten, as the HTTP client does)
/// 3. Anything else behaves like an empty response
#[derive(Default)]
pub struct StaticStatusClient {
    records: HashMap<String, RawFilingRecord>,
    failures: HashMap<String, LookupError>,
}

impl StaticStatusClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a client with pre-populated payloads.
    pub fn with_records(records: HashMap<String, RawFilingRecord>) -> Self {
        StaticStatusClient {
            records,
            failures: HashMap::new(),
        }
    }

    /// Serve `record` for `gstin`.
    pub fn insert(&mut self, gstin: &str, record: RawFilingRecord) {
        self.records.insert(gstin.to_string(), record);
    }

    /// Make lookups for `gstin` fail with `error`.
    pub fn fail_with(&mut self, gstin: &str, error: LookupError) {
        self.failures.insert(gstin.to_string(), error);
    }
}

#[async_trait]
impl StatusClient for StaticStatusClient {
    async fn lookup(&self, gstin: &Gstin, _year: &str) -> Result<RawFilingRecord, LookupError> {
        if let Some(error) = self.failures.get(gstin.as_str()) {
            return Err(error.clone());
        }

        match self.records.get(gstin.as_str()) {
            Some(record) => {
                let mut record = record.clone();
                record.gstin = gstin.to_string();
                Ok(record)
            }
            None => Err(LookupError::EmptyBody {
                gstin: gstin.to_string(),
            }),
        }
    }

    fn client_id(&self) -> &str {
        "static"
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
