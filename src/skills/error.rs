// Skill store error types

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors returned by [`super::SkillStore`] operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Skill '{0}' not found")]
    NotFound(String),

    #[error("Skill '{0}' already exists")]
    AlreadyExists(String),

    #[error("Skill name is required")]
    NameRequired,

    #[error("Invalid skill name '{0}'")]
    InvalidName(String),

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
