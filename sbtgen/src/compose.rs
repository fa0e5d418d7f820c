//! Combining generated dispatch code with an existing shader source
use crate::{
    Error,
    dispatch::{DispatchFunction, Variant},
    table::SbtTable,
};
use std::path::Path;

/// Builds every dispatch function for the given variant, in output order
///
/// The texture-aware variant produces any-hit, hit, and miss dispatch; the
/// legacy variant produces only hit and miss dispatch.
pub fn generate(table: &SbtTable, variant: &Variant) -> Vec<DispatchFunction> {
    variant
        .kinds()
        .map(|kind| variant.spec(kind).build(table))
        .collect()
}

/// Appends dispatch functions to a base shader source
///
/// The base source is copied verbatim; each function is preceded by a single
/// blank line.
pub fn compose(base: &str, functions: &[DispatchFunction]) -> String {
    let mut out = base.to_owned();
    for f in functions {
        out += "\n";
        out += &f.to_string();
    }
    out
}

/// Reads a base shader source from disk
pub fn read_source<P: AsRef<Path>>(path: P) -> Result<String, Error> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|e| Error::read(path, e))
}

/// Writes a combined shader source to disk
///
/// Every failure is an [`Error::IoError`], including a missing parent
/// directory.
pub fn write_artifact<P: AsRef<Path>>(
    path: P,
    text: &str,
) -> Result<(), Error> {
    let path = path.as_ref();
    std::fs::write(path, text).map_err(|source| Error::IoError {
        path: path.to_owned(),
        source,
    })
}
