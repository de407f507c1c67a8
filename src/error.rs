//! Error types for the fetch boundary.
//!
//! Row-level problems (a record missing a field, an unknown granularity tag)
//! are not errors here: the fetcher drops and counts those rows. Only whole
//! batch failures surface as [`FetchError`], and the store answers them with
//! the last successfully built result when it has one.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure: connection, timeout, or a non-success HTTP status.
    #[error("fee feed request failed: {0}")]
    Network(#[source] reqwest::Error),

    /// The response body is not the JSON array the feed contract promises.
    #[error("fee feed response has unexpected shape: {0}")]
    Format(String),
}
