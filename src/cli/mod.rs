//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `add` | Register a project directory |
//! | `list` | List projects with filters and sorting |
//! | `search` | Substring search over name, path and tags |
//! | `show` | Show one project (or just its path) |
//! | `edit` | Change name, status, tags, notes or path |
//! | `rm` | Remove a project from the catalog |
//! | `touch` | Mark a project as accessed |
//! | `open` | Open a project in the editor |
//!
//! Commands that take a project accept its name, its path, or any
//! fragment that matches exactly one project.
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output on stderr:
//! ```bash
//! pj --verbose list --recent
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod project;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
