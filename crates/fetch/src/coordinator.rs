//! Bounded-parallel lookups for a whole upload.
//!
//! A fixed-size queue holds one GSTIN per item; `workers` tasks pull from it,
//! look the GSTIN up, reconcile the answer and push a per-item outcome into a
//! single result channel. The pool size never depends on the upload size.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use gstn_core::{reconcile, Gstin, ReconciledRecord, ReportingPeriod};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::client::StatusClient;
use crate::error::{FetchError, LookupError};

/// Default number of concurrent lookups.
pub const DEFAULT_WORKERS: usize = 10;

/// Default bound on the whole batch.
pub const DEFAULT_WAIT: Duration = Duration::from_secs(60);

/// Pool bounds for [`fetch_all`].
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Worker tasks (clamped to `1..=number of GSTINs`).
    pub workers: usize,
    /// Overall wait for every lookup; exceeding it fails the batch.
    pub wait: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        FetchOptions {
            workers: DEFAULT_WORKERS,
            wait: DEFAULT_WAIT,
        }
    }
}

/// Result of a batch that finished in time.
///
/// Failed lookups are left out of `records` and reported in `failures`.
/// Both lists are sorted by GSTIN.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub records: Vec<ReconciledRecord>,
    pub failures: Vec<LookupError>,
}

type ItemOutcome = Result<ReconciledRecord, LookupError>;

/// Look up and reconcile every GSTIN for `period`.
///
/// Individual lookup failures never fail the batch. Only exceeding
/// `options.wait` does, in which case outstanding lookups are aborted and
/// finished ones are discarded.
pub async fn fetch_all(
    client: Arc<dyn StatusClient>,
    gstins: &BTreeSet<Gstin>,
    period: &ReportingPeriod,
    options: &FetchOptions,
) -> Result<FetchOutcome, FetchError> {
    let total = gstins.len();
    if total == 0 {
        return Ok(FetchOutcome::default());
    }

    let (queue_tx, queue_rx) = mpsc::channel::<Gstin>(total);
    for gstin in gstins {
        // Capacity equals the item count, so this never waits.
        let _ = queue_tx.try_send(gstin.clone());
    }
    drop(queue_tx);
    let queue = Arc::new(Mutex::new(queue_rx));

    let (result_tx, mut result_rx) = mpsc::unbounded_channel::<ItemOutcome>();
    let worker_count = options.workers.clamp(1, total);
    info!(
        gstins = total,
        workers = worker_count,
        client = client.client_id(),
        month = period.month(),
        year = period.year(),
        "starting lookups"
    );

    let mut workers = JoinSet::new();
    for worker in 0..worker_count {
        let queue = queue.clone();
        let client = client.clone();
        let result_tx = result_tx.clone();
        let month = period.month().to_string();
        let year = period.year().to_string();

        workers.spawn(async move {
            loop {
                let next = queue.lock().await.recv().await;
                let Some(gstin) = next else {
                    break;
                };
                debug!(worker, %gstin, "lookup");
                let outcome = client
                    .lookup(&gstin, &year)
                    .await
                    .map(|raw| reconcile(&raw, &month));
                if result_tx.send(outcome).is_err() {
                    break;
                }
            }
        });
    }
    drop(result_tx);

    let mut completed = 0usize;
    let mut outcome = FetchOutcome::default();
    let collect = async {
        while let Some(item) = result_rx.recv().await {
            completed += 1;
            match item {
                Ok(record) => outcome.records.push(record),
                Err(e) => {
                    warn!("{e}");
                    outcome.failures.push(e);
                }
            }
        }
    };
    let finished = tokio::time::timeout(options.wait, collect).await;

    if finished.is_err() {
        workers.abort_all();
        warn!(completed, total, "lookups timed out");
        return Err(FetchError::Timeout {
            waited: options.wait,
            completed,
            total,
        });
    }

    while let Some(joined) = workers.join_next().await {
        if let Err(e) = joined {
            warn!("lookup worker ended abnormally: {e}");
        }
    }

    outcome.records.sort_by(|a, b| a.gstin.cmp(&b.gstin));
    outcome
        .failures
        .sort_by(|a, b| a.gstin().cmp(b.gstin()));
    info!(
        resolved = outcome.records.len(),
        failed = outcome.failures.len(),
        "lookups finished"
    );
    Ok(outcome)
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
