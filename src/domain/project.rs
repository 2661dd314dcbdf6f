//! Project domain model
//!
//! A project is a directory on disk tracked by the catalog. Records are
//! values: `with_*` builders return fresh copies and never touch the
//! receiver, while `touch` and the tag helpers mutate in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

use super::id::ProjectId;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("project name cannot be empty")]
    EmptyName,

    #[error("project path must be absolute: got {0:?}")]
    RelativePath(PathBuf),

    #[error("project path does not exist: {}", .0.display())]
    PathNotExist(PathBuf),

    #[error("cannot access path {path:?}: {source}")]
    PathAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid project status: {0:?}")]
    InvalidStatus(String),
}

/// Lifecycle status of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Status {
    Active,
    Archived,
    Abandoned,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Archived => "archived",
            Status::Abandoned => "abandoned",
        }
    }

    /// Returns all valid status values
    pub fn all() -> &'static [Status] {
        &[Status::Active, Status::Archived, Status::Abandoned]
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ProjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(Status::Active),
            "archived" => Ok(Status::Archived),
            "abandoned" => Ok(Status::Abandoned),
            _ => Err(ProjectError::InvalidStatus(s.to_string())),
        }
    }
}

impl TryFrom<String> for Status {
    type Error = ProjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        status.as_str().to_string()
    }
}

/// Unset status is written as an empty string rather than omitted
mod status_field {
    use super::Status;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(status: &Option<Status>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(status.map(|st| st.as_str()).unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Status>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
        }
    }
}

/// Technology tag attached to a project
///
/// Unrecognized names read from disk are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProjectType {
    Go,
    Rust,
    Node,
    Python,
    Elixir,
    Ruby,
    Java,
    Generic,
    Unknown,
    Other(String),
}

impl ProjectType {
    pub fn as_str(&self) -> &str {
        match self {
            ProjectType::Go => "go",
            ProjectType::Rust => "rust",
            ProjectType::Node => "node",
            ProjectType::Python => "python",
            ProjectType::Elixir => "elixir",
            ProjectType::Ruby => "ruby",
            ProjectType::Java => "java",
            ProjectType::Generic => "generic",
            ProjectType::Unknown => "unknown",
            ProjectType::Other(s) => s,
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ProjectType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "go" => ProjectType::Go,
            "rust" => ProjectType::Rust,
            "node" => ProjectType::Node,
            "python" => ProjectType::Python,
            "elixir" => ProjectType::Elixir,
            "ruby" => ProjectType::Ruby,
            "java" => ProjectType::Java,
            "generic" => ProjectType::Generic,
            "unknown" => ProjectType::Unknown,
            _ => ProjectType::Other(value),
        }
    }
}

impl From<&str> for ProjectType {
    fn from(value: &str) -> Self {
        ProjectType::from(value.to_string())
    }
}

impl From<ProjectType> for String {
    fn from(t: ProjectType) -> Self {
        match t {
            ProjectType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

/// A tracked project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier, fixed at creation
    pub id: ProjectId,

    /// Display name
    pub name: String,

    /// Absolute path to the project directory; unique within a catalog
    pub path: PathBuf,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<ProjectType>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default, with = "status_field")]
    pub status: Option<Status>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,

    #[serde(default)]
    pub added_at: DateTime<Utc>,

    #[serde(default)]
    pub last_accessed: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub git_remote: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl Project {
    /// Creates an active project with a fresh id
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let name = name.into();
        let path = path.into();
        let now = Utc::now();

        Self {
            id: ProjectId::generate(&name, &path, now),
            name,
            path,
            types: Vec::new(),
            tags: Vec::new(),
            status: Some(Status::Active),
            notes: String::new(),
            added_at: now,
            last_accessed: now,
            git_remote: String::new(),
            description: String::new(),
        }
    }

    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    pub fn with_path(&self, path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..self.clone()
        }
    }

    pub fn with_types<I>(&self, types: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ProjectType>,
    {
        Self {
            types: types.into_iter().map(Into::into).collect(),
            ..self.clone()
        }
    }

    pub fn with_tags<I>(&self, tags: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            ..self.clone()
        }
    }

    pub fn with_status(&self, status: Option<Status>) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    pub fn with_notes(&self, notes: impl Into<String>) -> Self {
        Self {
            notes: notes.into(),
            ..self.clone()
        }
    }

    pub fn with_git_remote(&self, remote: impl Into<String>) -> Self {
        Self {
            git_remote: remote.into(),
            ..self.clone()
        }
    }

    pub fn with_description(&self, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..self.clone()
        }
    }

    /// Marks the project as accessed now. Never moves `last_accessed` backwards.
    pub fn touch(&mut self) {
        self.last_accessed = Utc::now().max(self.last_accessed);
    }

    pub fn has_type(&self, t: &ProjectType) -> bool {
        self.types.contains(t)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Appends a tag unless already present
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.has_tag(&tag) {
            self.tags.push(tag);
        }
    }

    /// Removes the first occurrence of a tag
    pub fn remove_tag(&mut self, tag: &str) {
        if let Some(pos) = self.tags.iter().position(|t| t == tag) {
            self.tags.remove(pos);
        }
    }

    /// Checks the record can be stored and normalizes its tags.
    ///
    /// Tags are trimmed and empty entries dropped, keeping order.
    /// Running this twice yields the same record.
    pub fn validate_and_normalize(&mut self) -> Result<(), ProjectError> {
        if self.name.trim().is_empty() {
            return Err(ProjectError::EmptyName);
        }

        if !self.path.is_absolute() {
            return Err(ProjectError::RelativePath(self.path.clone()));
        }

        if let Err(e) = fs::metadata(&self.path) {
            return Err(match e.kind() {
                io::ErrorKind::NotFound => ProjectError::PathNotExist(self.path.clone()),
                _ => ProjectError::PathAccess {
                    path: self.path.clone(),
                    source: e,
                },
            });
        }

        self.tags = self
            .tags
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        Ok(())
    }
}
