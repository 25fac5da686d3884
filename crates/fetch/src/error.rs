use std::time::Duration;

/// A single GSTIN's remote lookup failed.
///
/// Isolated per identifier: the coordinator records it and carries on with
/// the rest of the batch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// Connection, TLS, timeout or body-read failure.
    #[error("remote lookup failed for {gstin}: {message}")]
    Transport { gstin: String, message: String },

    /// The service answered with a non-2xx status.
    #[error("remote lookup failed for {gstin}: service returned HTTP {code}")]
    Status { gstin: String, code: u16 },

    /// The service answered 2xx with an empty or `null` body.
    #[error("remote lookup failed for {gstin}: empty response")]
    EmptyBody { gstin: String },

    /// The body was not a filing-status payload.
    #[error("remote lookup failed for {gstin}: invalid response: {message}")]
    Decode { gstin: String, message: String },
}

impl LookupError {
    /// The GSTIN whose lookup failed.
    pub fn gstin(&self) -> &str {
        match self {
            LookupError::Transport { gstin, .. }
            | LookupError::Status { gstin, .. }
            | LookupError::EmptyBody { gstin }
            | LookupError::Decode { gstin, .. } => gstin,
        }
    }
}

/// The batch as a whole failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Not every lookup finished within the overall wait. Results gathered
    /// so far are discarded.
    #[error("lookups did not finish within {waited:?} ({completed} of {total} done)")]
    Timeout {
        waited: Duration,
        completed: usize,
        total: usize,
    },
}
