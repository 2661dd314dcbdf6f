//! pj - a project catalog and launcher
//!
//! Keeps a YAML catalog of local project directories with tags, status and
//! access times, and exposes it through a thread-safe [`Catalog`] store.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{Project, ProjectId, ProjectType, Status};
pub use storage::{Catalog, CatalogError, FilterOptions, SortBy, YamlCatalog};
