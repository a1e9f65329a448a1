//! View manager implementation using minijinja.

use crate::{
    engine::ViewEngine,
    error::{Result, ViewError},
};
use serde::Serialize;
use std::path::PathBuf;

/// Templates compiled into the crate.
const BUILTIN_TEMPLATES: [(&str, &str); 4] = [
    ("alert.j2", include_str!("../templates/alert.j2")),
    ("dashboard.j2", include_str!("../templates/dashboard.j2")),
    ("outcome.j2", include_str!("../templates/outcome.j2")),
    ("sidebar.j2", include_str!("../templates/sidebar.j2")),
];

/// Manager for loading and rendering view templates.
#[derive(Debug)]
pub struct ViewManager {
    /// Directory the templates are loaded from, or `None` for built-ins.
    pub templates_dir: Option<PathBuf>,
    env: minijinja::Environment<'static>,
}

impl ViewManager {
    /// Creates a manager with the built-in templates.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::TemplateRenderError` if a built-in template does
    /// not compile.
    pub fn builtin() -> Result<Self> {
        let mut env = minijinja::Environment::new();
        for (name, source) in BUILTIN_TEMPLATES {
            env.add_template(name, source)
                .map_err(|e| ViewError::TemplateRenderError(format!("{name}: {e}")))?;
        }

        Ok(Self {
            templates_dir: None,
            env,
        })
    }

    /// Creates a manager loading `.j2` files from `templates_dir`.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::TemplateDirectoryNotFound` if the directory does
    /// not exist or is not a directory.
    pub fn new(templates_dir: PathBuf) -> Result<Self> {
        if !templates_dir.is_dir() {
            return Err(ViewError::TemplateDirectoryNotFound(templates_dir));
        }

        let mut env = minijinja::Environment::new();
        env.set_loader(minijinja::path_loader(&templates_dir));

        Ok(Self {
            templates_dir: Some(templates_dir),
            env,
        })
    }

    fn load_template(&self, name: &str) -> Result<minijinja::Template<'_, '_>> {
        let template_name = format!("{name}.j2");
        self.env
            .get_template(&template_name)
            .map_err(|e| ViewError::TemplateNotFound(format!("{name}: {e}")))
    }
}

impl ViewEngine for ViewManager {
    fn render<T: Serialize>(&self, template: &str, ctx: &T) -> Result<String> {
        let tmpl = self.load_template(template)?;
        tmpl.render(ctx)
            .map_err(|e| ViewError::TemplateRenderError(format!("{template}: {e}")))
    }

    fn list_templates(&self) -> Result<Vec<String>> {
        let Some(dir) = &self.templates_dir else {
            return Ok(BUILTIN_TEMPLATES
                .iter()
                .filter_map(|(name, _)| name.strip_suffix(".j2"))
                .map(str::to_string)
                .collect());
        };

        let entries = std::fs::read_dir(dir).map_err(|source| ViewError::TemplateListError {
            path: dir.clone(),
            source,
        })?;

        let mut templates = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| ViewError::TemplateListError {
                path: dir.clone(),
                source,
            })?;

            let path = entry.path();
            if path.is_file()
                && let Some(ext) = path.extension()
                && ext == "j2"
                && let Some(name) = path.file_stem().and_then(|n| n.to_str())
            {
                templates.push(name.to_string());
            }
        }

        templates.sort();
        Ok(templates)
    }
}
