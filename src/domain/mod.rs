//! Domain models for pj
//!
//! The project record and its validation rules. Apart from the
//! existence check in validation and marker-file detection, nothing here
//! touches the filesystem.

mod detect;
mod id;
mod project;

pub use detect::{detect_git_remote, detect_project_types};
pub use id::{IdError, ProjectId};
pub use project::{Project, ProjectError, ProjectType, Status};
