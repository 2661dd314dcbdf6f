//! Catalog file format
//!
//! The catalog lives in a single YAML file:
//!
//! ```yaml
//! version: 1
//! projects:
//! - id: p-7f2b4c19e0aa
//!   name: booster
//!   path: /home/me/code/booster
//!   types:
//!   - rust
//!   status: active
//!   added_at: 2024-01-01T00:00:00Z
//!   last_accessed: 2024-01-01T00:00:00Z
//! ```
//!
//! Writes go to a temporary sibling file that is renamed over the target,
//! so readers only ever see a complete old or a complete new catalog.

use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use super::catalog::CatalogError;
use crate::domain::Project;

/// Format version written by this build
pub const CURRENT_VERSION: u32 = 1;

/// On-disk root of the catalog
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub version: u32,

    #[serde(default)]
    pub projects: Vec<Project>,
}

impl CatalogFile {
    /// Builds a current-version file with projects sorted by name, then id
    pub fn new(mut projects: Vec<Project>) -> Self {
        projects.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Self {
            version: CURRENT_VERSION,
            projects,
        }
    }
}

/// Serializes the catalog to YAML
pub fn encode(file: &CatalogFile) -> Result<String, CatalogError> {
    serde_yaml::to_string(file).map_err(CatalogError::Serialize)
}

/// Parses catalog bytes read from `path`.
///
/// Blank and null documents decode as an empty catalog. Anything that is
/// not a well-formed catalog becomes [`CatalogError::Parse`].
pub fn decode(path: &Path, bytes: &[u8]) -> Result<CatalogFile, CatalogError> {
    if is_blank(bytes) {
        return Ok(CatalogFile::default());
    }

    let file: Option<CatalogFile> =
        serde_yaml::from_slice(bytes).map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(file.unwrap_or_default())
}

/// Whitespace and comments only
fn is_blank(bytes: &[u8]) -> bool {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.lines().all(|line| {
            let line = line.trim();
            line.is_empty() || line.starts_with('#')
        }),
        Err(_) => false,
    }
}

/// Reads the raw catalog bytes. A missing file yields `None`.
pub fn read(path: &Path) -> Result<Option<Vec<u8>>, CatalogError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(CatalogError::io(path)(e)),
    }
}

static TEMP_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Unique temporary path in the same directory as `path`
fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "catalog".to_string());
    let seq = TEMP_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    path.with_file_name(format!(".{}.{}.{}.tmp", name, process::id(), seq))
}

/// Atomically replaces `path` with `contents`
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), CatalogError> {
    let temp_path = temp_path_for(path);

    if let Err(e) = write_temp(&temp_path, contents) {
        let _ = fs::remove_file(&temp_path);
        return Err(CatalogError::io(&temp_path)(e));
    }

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(CatalogError::io(path)(e));
    }

    Ok(())
}

fn write_temp(temp_path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }

    let file = options.open(temp_path)?;
    {
        let mut writer = BufWriter::new(&file);
        writer.write_all(contents)?;
        writer.flush()?;
    }
    file.sync_all()
}
