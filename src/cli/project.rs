//! Project CLI commands

use std::fs;
use std::process::Command;

use anyhow::{bail, Context, Result};
use clap::Args;

use super::output::Output;
use crate::domain::{detect_git_remote, detect_project_types, Project, ProjectType, Status};
use crate::storage::{expand_path, shorten_path, Catalog, FilterOptions, SortBy};

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Only projects with this status
    #[arg(long, short = 's')]
    pub status: Option<Status>,

    /// Only projects of any of these types (repeatable)
    #[arg(long = "type", short = 'T')]
    pub types: Vec<String>,

    /// Only projects carrying all of these tags (repeatable)
    #[arg(long = "tag", short = 't')]
    pub tags: Vec<String>,

    /// Only projects whose name, path or tags contain this text
    #[arg(long, short = 'q')]
    pub query: Option<String>,

    /// Sort field (name, path, last_accessed, added_at, types)
    #[arg(long)]
    pub sort: Option<SortBy>,

    /// Reverse the sort order
    #[arg(long)]
    pub desc: bool,

    /// Most recently accessed first
    #[arg(long, short = 'r', conflicts_with_all = ["sort", "desc"])]
    pub recent: bool,

    /// Output only project names (one per line)
    #[arg(long, short = 'n')]
    pub names: bool,
}

impl ListArgs {
    fn filter_options(&self, default_sort: SortBy) -> FilterOptions {
        let (sort_by, descending) = if self.recent {
            (SortBy::LastAccessed, true)
        } else {
            (self.sort.unwrap_or(default_sort), self.desc)
        };

        FilterOptions {
            status: self.status,
            types: self.types.iter().map(|t| ProjectType::from(t.as_str())).collect(),
            tags: self.tags.clone(),
            query: self.query.clone().unwrap_or_default(),
            sort_by,
            descending,
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct EditArgs {
    /// Project name, path or partial match
    pub name: String,

    /// Rename the project
    #[arg(long = "name")]
    pub new_name: Option<String>,

    /// Set status (active, archived, abandoned)
    #[arg(long, short = 's')]
    pub status: Option<Status>,

    /// Clear the status
    #[arg(long, conflicts_with = "status")]
    pub clear_status: bool,

    /// Add a tag (repeatable)
    #[arg(long)]
    pub add_tag: Vec<String>,

    /// Remove a tag (repeatable)
    #[arg(long)]
    pub rm_tag: Vec<String>,

    /// Set notes
    #[arg(long)]
    pub notes: Option<String>,

    /// Set description
    #[arg(long)]
    pub description: Option<String>,

    /// Move the project to another directory
    #[arg(long)]
    pub path: Option<String>,
}

impl EditArgs {
    /// Returns the edited copy of `project`
    fn apply(&self, project: &Project) -> Result<Project> {
        let mut edited = project.clone();

        if let Some(name) = &self.new_name {
            edited = edited.with_name(name);
        }
        if let Some(status) = self.status {
            edited = edited.with_status(Some(status));
        }
        if self.clear_status {
            edited = edited.with_status(None);
        }
        for tag in &self.add_tag {
            edited.add_tag(tag.trim());
        }
        for tag in &self.rm_tag {
            edited.remove_tag(tag.trim());
        }
        if let Some(notes) = &self.notes {
            edited = edited.with_notes(notes);
        }
        if let Some(description) = &self.description {
            edited = edited.with_description(description);
        }
        if let Some(path) = &self.path {
            edited = edited.with_path(expand_path(path).context("Invalid path")?);
        }

        Ok(edited)
    }
}

/// Resolves a user-supplied name, path or fragment to a single project.
///
/// An exact (case-insensitive) name wins, then an exact path, then a
/// unique search hit.
fn find_project(cat: &dyn Catalog, query: &str) -> Result<Project> {
    let all = cat.list();

    let mut exact: Vec<_> = all
        .iter()
        .filter(|p| p.name.eq_ignore_ascii_case(query))
        .collect();
    if exact.len() == 1 {
        return Ok(exact.remove(0).clone());
    }

    if query.contains('/') || query.starts_with('~') || query.starts_with('.') {
        if let Ok(path) = expand_path(query) {
            if let Ok(project) = cat.get_by_path(&path) {
                return Ok(project);
            }
        }
    }

    let mut matches = if exact.is_empty() {
        cat.search(query)
    } else {
        exact.into_iter().cloned().collect()
    };

    match matches.len() {
        0 => bail!("no project found matching: {}", query),
        1 => Ok(matches.remove(0)),
        _ => {
            FilterOptions::default().sort(&mut matches);
            let listing: Vec<_> = matches
                .iter()
                .map(|p| format!("  - {} ({})", p.name, shorten_path(&p.path)))
                .collect();
            bail!(
                "multiple projects match {:?}. Please be more specific:\n{}",
                query,
                listing.join("\n")
            )
        }
    }
}

fn save(cat: &dyn Catalog) -> Result<()> {
    cat.save().context("Failed to save catalog")
}

fn join_types(types: &[ProjectType]) -> String {
    types
        .iter()
        .map(ProjectType::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn status_str(status: Option<Status>) -> &'static str {
    status.map(|s| s.as_str()).unwrap_or("-")
}

pub fn add(
    cat: &dyn Catalog,
    output: &Output,
    path: &str,
    name: Option<String>,
    tags: Vec<String>,
    status: Option<Status>,
    description: Option<String>,
) -> Result<()> {
    let path = expand_path(path).context("Invalid path")?;

    let meta = fs::metadata(&path)
        .with_context(|| format!("Path does not exist: {}", path.display()))?;
    if !meta.is_dir() {
        bail!("Path is not a directory: {}", path.display());
    }

    let name = name.unwrap_or_else(|| {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    });

    let types = detect_project_types(&path);
    output.verbose_ctx("add", &format!("Detected types: {}", join_types(&types)));

    let mut project = Project::new(&name, &path).with_types(types).with_tags(tags);
    if let Some(status) = status {
        project = project.with_status(Some(status));
    }
    if let Some(description) = description {
        project = project.with_description(description);
    }
    if let Some(remote) = detect_git_remote(&path) {
        output.verbose_ctx("add", &format!("Git remote: {}", remote));
        project = project.with_git_remote(remote);
    }

    let id = project.id.clone();
    cat.add(project)
        .with_context(|| format!("Failed to add project {:?}", name))?;
    save(cat)?;

    let stored = cat.get(&id)?;
    if output.is_json() {
        output.data(&stored);
    } else {
        output.success(&format!(
            "Added: {} ({})",
            stored.name,
            shorten_path(&stored.path)
        ));
    }

    Ok(())
}

pub fn list(cat: &dyn Catalog, output: &Output, args: &ListArgs, default_sort: SortBy) -> Result<()> {
    let opts = args.filter_options(default_sort);
    output.verbose_ctx("list", &format!("Filter: {:?}", opts));

    let projects = cat.filter(&opts);

    if output.is_json() {
        output.data(&projects);
        return Ok(());
    }

    if args.names {
        for p in &projects {
            output.line(&p.name);
        }
        return Ok(());
    }

    if projects.is_empty() {
        output.line("No projects found.");
        return Ok(());
    }

    output.row(&["NAME", "PATH", "TYPES", "STATUS", "TAGS"]);
    for p in &projects {
        let path = shorten_path(&p.path);
        let types = join_types(&p.types);
        let tags = p.tags.join(", ");
        output.row(&[
            p.name.as_str(),
            path.as_str(),
            if types.is_empty() { "unknown" } else { types.as_str() },
            status_str(p.status),
            tags.as_str(),
        ]);
    }

    Ok(())
}

pub fn search(cat: &dyn Catalog, output: &Output, query: &str) -> Result<()> {
    let mut projects = cat.search(query);
    FilterOptions::default().sort(&mut projects);
    output.verbose_ctx("search", &format!("{} matches for {:?}", projects.len(), query));

    if output.is_json() {
        output.data(&projects);
    } else if projects.is_empty() {
        output.line("No projects found.");
    } else {
        for p in &projects {
            output.line(&format!("{}  {}", p.name, shorten_path(&p.path)));
        }
    }

    Ok(())
}

pub fn show(cat: &dyn Catalog, output: &Output, name: &str, path_only: bool) -> Result<()> {
    let p = find_project(cat, name)?;

    if output.is_json() {
        output.data(&p);
        return Ok(());
    }

    if path_only {
        output.line(&p.path.display().to_string());
        return Ok(());
    }

    output.line(&format!("Name:          {}", p.name));
    output.line(&format!("ID:            {}", p.id));
    output.line(&format!("Path:          {}", p.path.display()));
    if !p.types.is_empty() {
        output.line(&format!("Types:         {}", join_types(&p.types)));
    }
    output.line(&format!("Status:        {}", status_str(p.status)));
    if !p.tags.is_empty() {
        output.line(&format!("Tags:          {}", p.tags.join(", ")));
    }
    if !p.description.is_empty() {
        output.line(&format!("Description:   {}", p.description));
    }
    if !p.notes.is_empty() {
        output.line(&format!("Notes:         {}", p.notes));
    }
    if !p.git_remote.is_empty() {
        output.line(&format!("Git remote:    {}", p.git_remote));
    }
    output.line(&format!(
        "Added:         {}",
        p.added_at.format("%Y-%m-%d %H:%M")
    ));
    output.line(&format!(
        "Last accessed: {}",
        p.last_accessed.format("%Y-%m-%d %H:%M")
    ));

    Ok(())
}

pub fn edit(cat: &dyn Catalog, output: &Output, args: &EditArgs) -> Result<()> {
    let project = find_project(cat, &args.name)?;
    let edited = args.apply(&project)?;

    if edited == project {
        output.success(&format!("No changes: {}", project.name));
        return Ok(());
    }

    let id = edited.id.clone();
    cat.update(edited)
        .with_context(|| format!("Failed to update project {:?}", project.name))?;
    save(cat)?;

    let stored = cat.get(&id)?;
    if output.is_json() {
        output.data(&stored);
    } else {
        output.success(&format!("Updated: {}", stored.name));
    }

    Ok(())
}

pub fn remove(cat: &dyn Catalog, output: &Output, name: &str) -> Result<()> {
    let project = find_project(cat, name)?;

    let removed = cat
        .remove(&project.id)
        .with_context(|| format!("Failed to remove project {:?}", project.name))?;
    save(cat)?;

    output.success(&format!("Removed: {}", removed.name));
    Ok(())
}

/// Bumps `last_accessed` and persists it
fn touch_and_save(cat: &dyn Catalog, mut project: Project) -> Result<Project> {
    project.touch();
    cat.update(project.clone())
        .with_context(|| format!("Failed to update project {:?}", project.name))?;
    save(cat)?;
    Ok(project)
}

pub fn touch(cat: &dyn Catalog, output: &Output, name: &str) -> Result<()> {
    let project = find_project(cat, name)?;
    let project = touch_and_save(cat, project)?;

    output.success(&format!("Touched: {}", project.name));
    Ok(())
}

/// Splits an editor command line, honouring single and double quotes
fn split_command(s: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in s.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => quote = Some(c),
            (None, c) if c.is_whitespace() => {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
            }
            (None, c) => current.push(c),
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }

    parts
}

fn resolve_editor(configured: Option<&str>) -> Result<Vec<String>> {
    let editor = configured
        .map(str::to_string)
        .filter(|e| !e.trim().is_empty())
        .or_else(|| std::env::var("EDITOR").ok().filter(|e| !e.trim().is_empty()))
        .unwrap_or_else(|| "vim".to_string());

    let parts = split_command(&editor);
    if parts.is_empty() {
        bail!("editor {:?} is empty after parsing", editor);
    }
    Ok(parts)
}

pub fn open(
    cat: &dyn Catalog,
    output: &Output,
    name: &str,
    configured_editor: Option<&str>,
) -> Result<()> {
    let project = find_project(cat, name)?;

    if !project.path.exists() {
        bail!(
            "project path no longer exists: {}\nRun 'pj rm {}' to remove it from the catalog",
            project.path.display(),
            project.name
        );
    }

    let editor = resolve_editor(configured_editor)?;
    let project = touch_and_save(cat, project)?;

    output.verbose_ctx(
        "open",
        &format!("Running {:?} in {}", editor, project.path.display()),
    );

    let status = Command::new(&editor[0])
        .args(&editor[1..])
        .arg(&project.path)
        .status()
        .with_context(|| format!("Failed to launch editor {:?}", editor[0]))?;

    if !status.success() {
        bail!("editor {:?} exited with {}", editor[0], status);
    }

    Ok(())
}
