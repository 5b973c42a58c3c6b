use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Name of a record collection in the underlying store (a table, a content
/// path, a bucket).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Target(String);

impl Target {
    /// Create a target. Surrounding whitespace is trimmed.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(TypeError::EmptyTarget);
        }
        if trimmed.contains('/') {
            return Err(TypeError::InvalidTarget(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Store-assigned identifier of a row within a [`Target`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowId(pub u64);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Address of a single inserted row, rendered as `target/row_id`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub target: Target,
    pub row_id: RowId,
}

impl Location {
    pub fn new(target: Target, row_id: RowId) -> Self {
        Self { target, row_id }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.target, self.row_id)
    }
}

impl FromStr for Location {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (target, row) = s
            .rsplit_once('/')
            .ok_or_else(|| TypeError::InvalidLocation(s.to_string()))?;
        let row_id = row
            .parse::<u64>()
            .map_err(|_| TypeError::InvalidLocation(s.to_string()))?;
        Ok(Self {
            target: Target::new(target)?,
            row_id: RowId(row_id),
        })
    }
}
