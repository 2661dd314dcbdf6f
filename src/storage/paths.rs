//! Path helpers: default locations, `~` expansion and display shortening

use std::env;
use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Context, Result};
use directories::BaseDirs;

fn home_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// Returns the default catalog file location.
///
/// Uses `$XDG_DATA_HOME/pj/catalog.yaml`, falling back to
/// `~/.local/share/pj/catalog.yaml`. Without a home directory the path is
/// relative to the working directory.
pub fn default_catalog_path() -> PathBuf {
    let data_home = env::var_os("XDG_DATA_HOME")
        .map(PathBuf::from)
        .filter(|p| p.is_absolute())
        .or_else(|| home_dir().map(|home| home.join(".local").join("share")))
        .unwrap_or_else(|| PathBuf::from(".local").join("share"));

    data_home.join("pj").join("catalog.yaml")
}

/// Expands `~` and makes `path` absolute.
///
/// `~user` forms are not supported. `.` and `..` components are resolved
/// lexically; symlinks are left alone.
pub fn expand_path(path: &str) -> Result<PathBuf> {
    if path.trim().is_empty() {
        bail!("path cannot be empty");
    }

    let expanded = if path == "~" || path.starts_with("~/") {
        let home = home_dir().context("cannot expand ~: no home directory")?;
        match path.strip_prefix("~/") {
            Some(rest) => home.join(rest),
            None => home,
        }
    } else if path.starts_with('~') {
        bail!("~username expansion is not supported: {}", path);
    } else {
        PathBuf::from(path)
    };

    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        env::current_dir()
            .context("cannot resolve relative path: current directory unavailable")?
            .join(expanded)
    };

    Ok(normalize(&absolute))
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Never pops past the root
                if out.parent().is_some() {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Replaces a leading home directory with `~` for display
pub fn shorten_path(path: &Path) -> String {
    if let Some(home) = home_dir() {
        if let Ok(rest) = path.strip_prefix(&home) {
            if rest.as_os_str().is_empty() {
                return "~".to_string();
            }
            return format!("~/{}", rest.display());
        }
    }
    path.display().to_string()
}
