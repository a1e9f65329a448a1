//! View engine trait.

use crate::error::Result;
use serde::Serialize;

/// Renders named templates with a serializable context.
pub trait ViewEngine {
    /// Renders `template` (name without extension) with `ctx`.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::TemplateNotFound` if the template does not exist
    /// and `ViewError::TemplateRenderError` if rendering fails.
    fn render<T: Serialize>(&self, template: &str, ctx: &T) -> Result<String>;

    /// Lists available template names (without extension), sorted.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::TemplateListError` if the template directory
    /// cannot be read.
    fn list_templates(&self) -> Result<Vec<String>>;
}
