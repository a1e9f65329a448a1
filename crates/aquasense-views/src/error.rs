//! Error types for the views crate.

use std::path::PathBuf;

/// Errors that can occur while rendering views.
#[derive(thiserror::Error, Debug)]
pub enum ViewError {
    /// Template is neither built in nor present in the template directory.
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    /// Template failed to compile or render.
    #[error("template render error: {0}")]
    TemplateRenderError(String),

    /// Template directory does not exist or is not a directory.
    #[error("template directory not found: {0}")]
    TemplateDirectoryNotFound(PathBuf),

    /// Template directory listing failed.
    #[error("failed to list templates in {path}")]
    TemplateListError {
        /// Path to the template directory.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for view operations.
pub type Result<T> = std::result::Result<T, ViewError>;
