//! Module containing the universal error type for `sbtgen`
use std::path::PathBuf;
use thiserror::Error;

/// Universal error type for `sbtgen`
#[derive(Error, Debug)]
pub enum Error {
    /// The given path does not exist
    #[error("file {0:?} not found")]
    NotFound(PathBuf),

    /// IO error while reading or writing a file
    #[error("io error on {path:?}: {source}")]
    IoError {
        /// File being accessed
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// IO error while reading a table from a stream
    #[error("io error while reading table: {0}")]
    StreamError(#[source] std::io::Error),

    /// The table is not valid JSON
    #[error("error decoding JSON: {0}")]
    ParseError(#[source] serde_json::Error),

    /// The table is valid JSON, but not an array of binding records
    #[error("malformed shader binding table: {0}")]
    SchemaError(#[source] serde_json::Error),
}

impl Error {
    /// Maps an IO error while reading `path` into either [`Error::NotFound`]
    /// or [`Error::IoError`]
    pub(crate) fn read(path: impl Into<PathBuf>, e: std::io::Error) -> Self {
        let path = path.into();
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::NotFound(path)
        } else {
            Error::IoError { path, source: e }
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        use serde_json::error::Category;
        match e.classify() {
            Category::Syntax | Category::Eof => Error::ParseError(e),
            Category::Data => Error::SchemaError(e),
            // Unwraps to the underlying `io::Error`
            Category::Io => Error::StreamError(e.into()),
        }
    }
}
