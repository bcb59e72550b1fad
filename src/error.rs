use std::error::Error as StdError;

use thiserror::Error;

/// Ways a single webhook delivery can end without success.
///
/// None of these reach the host: [`crate::dispatch::Notifier::notify`] logs
/// them and folds them into an [`crate::dispatch::Outcome`].
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No usable destination URL, or settings no client can be built from.
    #[error("invalid or missing endpoint: {0}")]
    Configuration(String),

    /// Connection, DNS, TLS or timeout failure, or the client could not be built.
    #[error("transport error: {}", transport_detail(.0))]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with something other than 200.
    #[error("non-200 response: {status}")]
    Protocol { status: u16 },
}

/// The reqwest error followed by each underlying cause, `: `-separated.
/// reqwest's own message only names the URL; the cause (refused, DNS, TLS,
/// timeout) lives further down the `source()` chain.
pub fn transport_detail(err: &reqwest::Error) -> String {
    let mut detail = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !detail.contains(&text) {
            detail.push_str(": ");
            detail.push_str(&text);
        }
        source = cause.source();
    }
    if err.is_timeout() && !detail.contains("timed out") {
        detail.push_str(": timed out");
    }
    detail
}
