//! Project type detection from marker files

use std::fs;
use std::path::Path;

use super::project::ProjectType;

const MARKERS: &[(&str, ProjectType)] = &[
    ("go.mod", ProjectType::Go),
    ("Cargo.toml", ProjectType::Rust),
    ("package.json", ProjectType::Node),
    ("pyproject.toml", ProjectType::Python),
    ("requirements.txt", ProjectType::Python),
    ("mix.exs", ProjectType::Elixir),
    ("Gemfile", ProjectType::Ruby),
    ("pom.xml", ProjectType::Java),
    ("build.gradle", ProjectType::Java),
    ("build.gradle.kts", ProjectType::Java),
];

/// Detects the technologies used by the project at `path`.
///
/// Falls back to `generic` for a bare git repository and `unknown`
/// otherwise, so the result is never empty.
pub fn detect_project_types(path: &Path) -> Vec<ProjectType> {
    let mut types: Vec<ProjectType> = Vec::new();

    for (file, typ) in MARKERS {
        if path.join(file).exists() && !types.contains(typ) {
            types.push(typ.clone());
        }
    }

    if !types.is_empty() {
        return types;
    }

    if path.join(".git").exists() {
        vec![ProjectType::Generic]
    } else {
        vec![ProjectType::Unknown]
    }
}

/// Reads the `origin` remote url from `.git/config`, if any
pub fn detect_git_remote(path: &Path) -> Option<String> {
    let config = fs::read_to_string(path.join(".git").join("config")).ok()?;

    let mut in_origin = false;
    for line in config.lines() {
        let line = line.trim();
        if line.starts_with('[') {
            in_origin = line == r#"[remote "origin"]"#;
            continue;
        }
        if !in_origin {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            if key.trim() == "url" {
                let url = value.trim();
                if !url.is_empty() {
                    return Some(url.to_string());
                }
            }
        }
    }

    None
}
