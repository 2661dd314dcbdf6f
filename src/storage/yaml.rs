//! YAML-backed catalog engine
//!
//! Projects are held in memory in two indices, id -> project and
//! path -> id, guarded together by a single reader/writer lock. Every
//! mutation updates both indices or neither.
//!
//! Readers (`get`, `get_by_path`, `list`, `search`, `filter`, `count`)
//! and `save` share the lock. `add`, `update`, `remove` and `load` take it
//! exclusively. File I/O in `save`/`load` happens while the lock is held.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use super::catalog::{matches_query, Catalog, CatalogError, FilterOptions};
use super::codec::{self, CatalogFile};
use crate::domain::{Project, ProjectId};

#[derive(Debug, Default)]
struct Indices {
    projects: HashMap<ProjectId, Project>,
    by_path: HashMap<PathBuf, ProjectId>,
}

impl Indices {
    /// Builds fresh indices, rejecting duplicate ids or paths
    fn rebuild(projects: Vec<Project>, source: &Path) -> Result<Self, CatalogError> {
        let mut indices = Self {
            projects: HashMap::with_capacity(projects.len()),
            by_path: HashMap::with_capacity(projects.len()),
        };

        for project in projects {
            if indices.projects.contains_key(&project.id) {
                return Err(CatalogError::Corrupt {
                    path: source.to_path_buf(),
                    reason: format!("duplicate project ID {}", project.id),
                });
            }
            if indices.by_path.contains_key(&project.path) {
                return Err(CatalogError::Corrupt {
                    path: source.to_path_buf(),
                    reason: format!("duplicate project path {}", project.path.display()),
                });
            }
            indices.insert(project);
        }

        Ok(indices)
    }

    fn insert(&mut self, project: Project) {
        self.by_path.insert(project.path.clone(), project.id.clone());
        self.projects.insert(project.id.clone(), project);
    }

    fn snapshot(&self) -> Vec<Project> {
        self.projects.values().cloned().collect()
    }
}

/// Catalog persisted as a single YAML file
#[derive(Debug)]
pub struct YamlCatalog {
    path: PathBuf,
    indices: RwLock<Indices>,
}

impl YamlCatalog {
    /// Creates an empty catalog backed by `path`, creating its parent
    /// directory if needed. Call [`Catalog::load`] to read existing data.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(CatalogError::io(parent))?;
        }

        Ok(Self {
            path,
            indices: RwLock::new(Indices::default()),
        })
    }

    /// Creates the catalog and loads it from disk in one step
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let catalog = Self::new(path)?;
        catalog.load()?;
        Ok(catalog)
    }

    /// Returns the backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Catalog for YamlCatalog {
    fn add(&self, mut project: Project) -> Result<(), CatalogError> {
        project.validate_and_normalize()?;

        let mut indices = self.indices.write();

        if indices.by_path.contains_key(&project.path) {
            return Err(CatalogError::AlreadyExists(project.path));
        }
        if indices.projects.contains_key(&project.id) {
            return Err(CatalogError::DuplicateId(project.id));
        }

        indices.insert(project);
        Ok(())
    }

    fn get(&self, id: &ProjectId) -> Result<Project, CatalogError> {
        self.indices
            .read()
            .projects
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    fn get_by_path(&self, path: &Path) -> Result<Project, CatalogError> {
        let indices = self.indices.read();

        indices
            .by_path
            .get(path)
            .and_then(|id| indices.projects.get(id))
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(path.display().to_string()))
    }

    fn update(&self, mut project: Project) -> Result<(), CatalogError> {
        project.validate_and_normalize()?;

        let mut indices = self.indices.write();

        let old_path = match indices.projects.get(&project.id) {
            Some(existing) => existing.path.clone(),
            None => return Err(CatalogError::NotFound(project.id.to_string())),
        };

        if old_path != project.path {
            // Check the new path before touching either index
            if let Some(owner) = indices.by_path.get(&project.path) {
                if *owner != project.id {
                    return Err(CatalogError::AlreadyExists(project.path));
                }
            }
            indices.by_path.remove(&old_path);
            indices
                .by_path
                .insert(project.path.clone(), project.id.clone());
        }

        indices.projects.insert(project.id.clone(), project);
        Ok(())
    }

    fn remove(&self, id: &ProjectId) -> Result<Project, CatalogError> {
        let mut indices = self.indices.write();

        let project = indices
            .projects
            .remove(id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        indices.by_path.remove(&project.path);

        Ok(project)
    }

    fn list(&self) -> Vec<Project> {
        self.indices.read().snapshot()
    }

    fn search(&self, query: &str) -> Vec<Project> {
        let indices = self.indices.read();

        if query.is_empty() {
            return indices.snapshot();
        }

        let query = query.to_lowercase();
        indices
            .projects
            .values()
            .filter(|p| matches_query(p, &query))
            .cloned()
            .collect()
    }

    fn filter(&self, opts: &FilterOptions) -> Vec<Project> {
        let mut results: Vec<Project> = {
            let indices = self.indices.read();
            indices
                .projects
                .values()
                .filter(|p| opts.matches(p))
                .cloned()
                .collect()
        };

        opts.sort(&mut results);
        results
    }

    fn count(&self) -> usize {
        self.indices.read().projects.len()
    }

    fn save(&self) -> Result<(), CatalogError> {
        let indices = self.indices.read();

        let file = CatalogFile::new(indices.snapshot());
        let yaml = codec::encode(&file)?;
        codec::write_atomic(&self.path, yaml.as_bytes())
    }

    fn load(&self) -> Result<(), CatalogError> {
        let mut indices = self.indices.write();

        let rebuilt = match codec::read(&self.path)? {
            Some(bytes) => {
                let file = codec::decode(&self.path, &bytes)?;
                Indices::rebuild(file.projects, &self.path)?
            }
            None => Indices::default(),
        };

        *indices = rebuilt;
        Ok(())
    }
}
