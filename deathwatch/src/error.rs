use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("failed to subscribe to signal: {0}")]
    Subscribe(#[from] io::Error),
}

/// Failure reported by a logger sink's `warn`/`error` operations.
///
/// The coordinator never acts on these; they exist so sinks that can fail
/// (buffered writers, network appenders) have somewhere to say so.
#[derive(Error, Debug)]
#[error("logger sink failure: {0}")]
pub struct LogError(pub String);
