//! gstn-fetch: remote filing-status lookups.
//!
//! Two levels:
//! - [`StatusClient`] -- ONE lookup for ONE GSTIN ([`HttpStatusClient`] in
//!   production, [`StaticStatusClient`] for fixtures)
//! - [`fetch_all`] -- every GSTIN of an upload through a fixed-size worker
//!   pool, reconciling each answer as soon as it arrives

pub mod client;
pub mod coordinator;
pub mod error;

pub use client::http::HttpStatusClient;
pub use client::static_client::StaticStatusClient;
pub use client::StatusClient;
pub use coordinator::{fetch_all, FetchOptions, FetchOutcome, DEFAULT_WAIT, DEFAULT_WORKERS};
pub use error::{FetchError, LookupError};
