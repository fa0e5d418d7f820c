//! Shader binding table model and loader
//!
//! A shader binding table is stored on disk as a JSON array of records:
//! ```json
//! [
//!     { "raygen": "rgen", "closestHit": "hitA", "anyHit": null, "miss": "sky" },
//!     { "closestHit": "hitB" }
//! ]
//! ```
//! Each field is optional; absent, `null`, and empty strings are equivalent.
//! The position of a record in the array is its record index, which is the
//! value matched by the generated `switch` statements.
use crate::Error;
use serde::Deserialize;
use std::{io::Read, path::Path, str::FromStr};

/// Selects one of the shader fields of an [`SbtRecord`]
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    Hash,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
pub enum Stage {
    /// Ray generation shader (informational; never dispatched by index)
    #[strum(serialize = "raygen")]
    Raygen,
    /// Closest-hit shader
    #[strum(serialize = "closestHit")]
    ClosestHit,
    /// Any-hit shader
    #[strum(serialize = "anyHit")]
    AnyHit,
    /// Miss shader
    #[strum(serialize = "miss")]
    Miss,
}

impl Stage {
    /// Returns the JSON field name for this stage
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

/// One record in a shader binding table
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SbtRecord {
    /// Ray generation shader symbol
    pub raygen: Option<String>,
    /// Closest-hit shader symbol
    pub closest_hit: Option<String>,
    /// Any-hit shader symbol
    pub any_hit: Option<String>,
    /// Miss shader symbol
    pub miss: Option<String>,
}

impl SbtRecord {
    /// Returns the symbol bound to the given stage
    ///
    /// Returns `None` if the field is absent, `null`, or an empty string.
    pub fn symbol(&self, stage: Stage) -> Option<&str> {
        let s = match stage {
            Stage::Raygen => &self.raygen,
            Stage::ClosestHit => &self.closest_hit,
            Stage::AnyHit => &self.any_hit,
            Stage::Miss => &self.miss,
        };
        s.as_deref().filter(|s| !s.is_empty())
    }
}

impl std::fmt::Display for SbtRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use strum::IntoEnumIterator;
        for (i, stage) in Stage::iter().enumerate() {
            if i > 0 {
                write!(f, "  ")?;
            }
            let sym = self.symbol(stage).unwrap_or("-");
            write!(f, "{}. {}: {sym}", i + 1, stage.name())?;
        }
        Ok(())
    }
}

/// An ordered shader binding table
///
/// The table is immutable once loaded; record `i` is always the `i`'th element
/// of the source array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct SbtTable {
    records: Vec<SbtRecord>,
}

impl SbtTable {
    /// Builds a table from a list of records, in record-index order
    pub fn new(records: Vec<SbtRecord>) -> Self {
        Self { records }
    }

    /// Parses a JSON table from a reader
    ///
    /// A failure to read is an [`Error::StreamError`].
    pub fn from_reader<R: Read>(r: R) -> Result<Self, Error> {
        Ok(serde_json::from_reader(r)?)
    }

    /// Loads a JSON table from a file
    ///
    /// A missing file is reported as [`Error::NotFound`]; any other failure to
    /// read is an [`Error::IoError`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|e| Error::read(path, e))?;
        text.parse()
    }

    /// Returns the number of records in the table
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Checks whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the record at the given index
    pub fn get(&self, index: usize) -> Option<&SbtRecord> {
        self.records.get(index)
    }

    /// Iterates over records in index order
    pub fn iter(&self) -> impl Iterator<Item = &SbtRecord> {
        self.records.iter()
    }

    /// Iterates over `(index, symbol)` pairs for records which bind `stage`
    pub fn bindings(
        &self,
        stage: Stage,
    ) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.records
            .iter()
            .enumerate()
            .filter_map(move |(i, r)| r.symbol(stage).map(|s| (i, s)))
    }
}

impl FromStr for SbtTable {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(s)?)
    }
}

impl<'a> IntoIterator for &'a SbtTable {
    type Item = &'a SbtRecord;
    type IntoIter = std::slice::Iter<'a, SbtRecord>;
    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
