//! Main CLI application structure

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::project::{self, EditArgs, ListArgs};
use crate::domain::Status;
use crate::storage::{Catalog, Config, YamlCatalog};

#[derive(Parser)]
#[command(name = "pj")]
#[command(author, version, about = "Project tracker and launcher")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the catalog file
    #[arg(long, short = 'c', global = true, env = "PJ_CATALOG")]
    pub catalog: Option<String>,

    /// Path to the config file
    #[arg(long, global = true, env = "PJ_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format (defaults to the configured format)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a project directory to the catalog
    #[command(visible_alias = "a")]
    Add {
        /// Path to the project directory
        path: String,

        /// Project name (defaults to the directory name)
        #[arg(long, short = 'n')]
        name: Option<String>,

        /// Tag to attach (repeatable)
        #[arg(long = "tag", short = 't')]
        tags: Vec<String>,

        /// Initial status (active, archived, abandoned)
        #[arg(long, short = 's')]
        status: Option<Status>,

        /// Short description
        #[arg(long, short = 'd')]
        description: Option<String>,
    },

    /// List projects, optionally filtered and sorted
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Search projects by name, path or tag
    Search {
        /// Search query (case-insensitive substring)
        query: String,
    },

    /// Show project details
    Show {
        /// Project name, path or partial match
        name: String,

        /// Output only the path (for scripting)
        #[arg(long)]
        path: bool,
    },

    /// Edit project metadata
    #[command(visible_alias = "e")]
    Edit(EditArgs),

    /// Remove a project from the catalog
    Rm {
        /// Project name, path or partial match
        name: String,
    },

    /// Mark a project as accessed now
    Touch {
        /// Project name, path or partial match
        name: String,
    },

    /// Open a project in the editor
    #[command(visible_alias = "o")]
    Open {
        /// Project name, path or partial match
        name: String,
    },
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let output = Output::new(
        cli.format.unwrap_or(config.global.default_format),
        cli.verbose,
    );

    output.verbose("pj starting");
    if let Some(path) = &config.path {
        output.verbose_ctx("config", &format!("Config file: {}", path.display()));
    }

    let catalog_path = config.catalog_path(cli.catalog.as_deref())?;
    output.verbose_ctx("catalog", &format!("Loading catalog: {}", catalog_path.display()));

    let catalog = YamlCatalog::open(&catalog_path).context("Failed to load catalog")?;
    output.verbose_ctx("catalog", &format!("Loaded {} projects", catalog.count()));

    let cat: &dyn Catalog = &catalog;

    match cli.command {
        Commands::Add {
            path,
            name,
            tags,
            status,
            description,
        } => project::add(cat, &output, &path, name, tags, status, description)?,
        Commands::List(args) => {
            project::list(cat, &output, &args, config.global.default_sort)?
        }
        Commands::Search { query } => project::search(cat, &output, &query)?,
        Commands::Show { name, path } => project::show(cat, &output, &name, path)?,
        Commands::Edit(args) => project::edit(cat, &output, &args)?,
        Commands::Rm { name } => project::remove(cat, &output, &name)?,
        Commands::Touch { name } => project::touch(cat, &output, &name)?,
        Commands::Open { name } => {
            project::open(cat, &output, &name, config.global.editor.as_deref())?
        }
    }

    Ok(())
}
