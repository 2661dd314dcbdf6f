//! The catalog contract
//!
//! [`Catalog`] is the operation set every catalog engine implements.
//! Engines own their indices; callers only ever go through this trait.

use std::cmp::Ordering;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Project, ProjectError, ProjectId, ProjectType, Status};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Invalid(#[from] ProjectError),

    #[error("project not found: {0}")]
    NotFound(String),

    #[error("project already exists at path: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("project ID already in use: {0}")]
    DuplicateId(ProjectId),

    #[error("failed to access catalog file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse catalog file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("catalog file {} is corrupt: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("failed to serialize catalog: {0}")]
    Serialize(#[source] serde_yaml::Error),
}

impl CatalogError {
    pub(crate) fn io(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// True for lookups that found nothing
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound(_))
    }
}

/// Field to order filter results by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    Name,
    Path,
    LastAccessed,
    AddedAt,
    Types,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Name => "name",
            SortBy::Path => "path",
            SortBy::LastAccessed => "last_accessed",
            SortBy::AddedAt => "added_at",
            SortBy::Types => "types",
        }
    }

    /// Compares two projects on this field alone
    pub fn compare(self, a: &Project, b: &Project) -> Ordering {
        match self {
            SortBy::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortBy::Path => a.path.as_os_str().cmp(b.path.as_os_str()),
            SortBy::LastAccessed => a.last_accessed.cmp(&b.last_accessed),
            SortBy::AddedAt => a.added_at.cmp(&b.added_at),
            SortBy::Types => first_type(a).cmp(first_type(b)),
        }
    }
}

fn first_type(p: &Project) -> &str {
    p.types.first().map(ProjectType::as_str).unwrap_or("")
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "name" => Ok(SortBy::Name),
            "path" => Ok(SortBy::Path),
            "last_accessed" | "accessed" | "recent" => Ok(SortBy::LastAccessed),
            "added_at" | "added" => Ok(SortBy::AddedAt),
            "types" | "type" => Ok(SortBy::Types),
            _ => Err(format!("Unknown sort field: {}", s)),
        }
    }
}

/// Criteria for [`Catalog::filter`]
///
/// Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    /// Exact status match
    pub status: Option<Status>,

    /// Project has at least one of these types
    pub types: Vec<ProjectType>,

    /// Project has every one of these tags
    pub tags: Vec<String>,

    /// Case-insensitive substring of name, path or any tag
    pub query: String,

    pub sort_by: SortBy,

    /// Reverses the whole ordering, tie-break included
    pub descending: bool,
}

impl FilterOptions {
    pub fn matches(&self, project: &Project) -> bool {
        if let Some(status) = self.status {
            if project.status != Some(status) {
                return false;
            }
        }

        if !self.types.is_empty() && !self.types.iter().any(|t| project.has_type(t)) {
            return false;
        }

        if !self.tags.iter().all(|t| project.has_tag(t)) {
            return false;
        }

        self.query.is_empty() || matches_query(project, &self.query.to_lowercase())
    }

    /// Sorts by the selected field with ties broken by id
    pub fn sort(&self, projects: &mut [Project]) {
        let by = self.sort_by;
        projects.sort_by(|a, b| {
            let ord = by.compare(a, b).then_with(|| a.id.cmp(&b.id));
            if self.descending {
                ord.reverse()
            } else {
                ord
            }
        });
    }
}

/// Matches an already lower-cased query against name, path and tags
pub(crate) fn matches_query(project: &Project, query: &str) -> bool {
    project.name.to_lowercase().contains(query)
        || project.path.to_string_lossy().to_lowercase().contains(query)
        || project.tags.iter().any(|t| t.to_lowercase().contains(query))
}

/// Operations every catalog engine provides.
///
/// Implementations must keep the id and path indices consistent: after
/// any successful call every project has a unique id and a unique path,
/// and failed calls leave the catalog unchanged.
pub trait Catalog: Send + Sync {
    /// Validates, normalizes and stores a new project
    fn add(&self, project: Project) -> Result<(), CatalogError>;

    fn get(&self, id: &ProjectId) -> Result<Project, CatalogError>;

    fn get_by_path(&self, path: &Path) -> Result<Project, CatalogError>;

    /// Replaces the stored project with the same id
    fn update(&self, project: Project) -> Result<(), CatalogError>;

    /// Removes a project, returning the stored record
    fn remove(&self, id: &ProjectId) -> Result<Project, CatalogError>;

    /// Snapshot of all projects in no particular order
    fn list(&self) -> Vec<Project>;

    /// Case-insensitive substring search over name, path and tags
    fn search(&self, query: &str) -> Vec<Project>;

    /// Projects matching `opts`, sorted deterministically
    fn filter(&self, opts: &FilterOptions) -> Vec<Project>;

    fn count(&self) -> usize;

    /// Writes the whole catalog to its backing file
    fn save(&self) -> Result<(), CatalogError>;

    /// Replaces in-memory state with the backing file's contents
    fn load(&self) -> Result<(), CatalogError>;
}
