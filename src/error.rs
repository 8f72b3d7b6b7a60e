use std::path::PathBuf;

use thiserror::Error;

/// Failures that end a replay run.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("reading request file {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid request line {line:?}: expected `<METHOD> <URL>`")]
    MalformedRequestLine { line: String },

    #[error("building request: {0}")]
    RequestConstruction(String),

    #[error("sending request: {0}")]
    Network(#[source] reqwest::Error),

    #[error("reading response body: {0}")]
    ResponseRead(#[source] reqwest::Error),

    #[error("writing report {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
