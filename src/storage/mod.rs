//! # Storage Layer
//!
//! The catalog engine, its file format, and the configuration files
//! around it.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Catalog | YAML | `$XDG_DATA_HOME/pj/catalog.yaml` |
//! | Config | TOML | `$XDG_CONFIG_HOME/pj/config.toml` |
//!
//! ## Concurrency Safety
//!
//! - [`YamlCatalog`] guards both of its indices with one `RwLock`, so a
//!   single instance can be shared across threads
//! - Catalog writes are atomic (temp file + rename)
//! - Nothing coordinates separate processes writing the same catalog
//!
//! ## Key Types
//!
//! - [`Catalog`] - Operations every catalog engine provides
//! - [`YamlCatalog`] - The YAML-file-backed engine
//! - [`FilterOptions`] - Filtering and sorting for [`Catalog::filter`]
//! - [`Config`] - User configuration

mod catalog;
mod codec;
mod config;
mod paths;
mod yaml;

pub use catalog::{Catalog, CatalogError, FilterOptions, SortBy};
pub use codec::{CatalogFile, CURRENT_VERSION};
pub use config::{Config, ConfigError, GlobalConfig, OutputFormat};
pub use paths::{default_catalog_path, expand_path, shorten_path};
pub use yaml::YamlCatalog;
