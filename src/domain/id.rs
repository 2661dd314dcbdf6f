//! Project identifiers
//!
//! Freshly created projects get ids of the form `p-{12-char-hash}`
//! (e.g. `p-7f2b4c19e0aa`). The hash is derived from name, path, creation
//! timestamp and a process-local sequence number, so two projects created
//! in the same nanosecond still get distinct ids.
//!
//! Ids read back from a catalog file are treated as opaque: any non-empty
//! string is accepted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Project ID cannot be empty")]
    Empty,
}

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generates a 12-character hash from name, path and timestamp
fn generate_hash(name: &str, path: &Path, timestamp: DateTime<Utc>) -> String {
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let input = format!(
        "{}\0{}\0{}\0{}",
        name,
        path.display(),
        timestamp.timestamp_nanos_opt().unwrap_or(0),
        seq
    );
    let hash = blake3::hash(input.as_bytes());
    hash.to_hex()[..12].to_string()
}

/// Opaque, immutable project identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectId(String);

impl ProjectId {
    /// Generates a new id for a project created at `timestamp`
    pub fn generate(name: &str, path: &Path, timestamp: DateTime<Utc>) -> Self {
        Self(format!("p-{}", generate_hash(name, path, timestamp)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProjectId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(IdError::Empty);
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for ProjectId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ProjectId> for String {
    fn from(id: ProjectId) -> Self {
        id.0
    }
}

impl AsRef<str> for ProjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn generated_id_format() {
        let id = ProjectId::generate("booster", Path::new("/tmp/booster"), Utc::now());
        let s = id.to_string();

        assert!(s.starts_with("p-"));
        assert_eq!(s.len(), 14);
        assert!(s[2..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn same_inputs_produce_different_ids() {
        let now = Utc::now();
        let path = PathBuf::from("/tmp/same");

        let a = ProjectId::generate("same", &path, now);
        let b = ProjectId::generate("same", &path, now);

        assert_ne!(a, b);
    }

    #[test]
    fn parse_opaque_id() {
        let id: ProjectId = "test-id".parse().unwrap();
        assert_eq!(id.as_str(), "test-id");

        let id: ProjectId = "  padded  ".parse().unwrap();
        assert_eq!(id.as_str(), "padded");
    }

    #[test]
    fn reject_empty_id() {
        assert_eq!("".parse::<ProjectId>(), Err(IdError::Empty));
        assert_eq!("   ".parse::<ProjectId>(), Err(IdError::Empty));
    }

    #[test]
    fn serde_rejects_empty_id() {
        let result: Result<ProjectId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());

        let id: ProjectId = serde_json::from_str("\"abc123\"").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc123\"");
    }
}
