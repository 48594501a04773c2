//! Template loading and rendering using Tera.
//!
//! Prompts are embedded in the binary. A `templates/` directory inside the
//! data directory may override any of them by name.

use crate::error::{Error, Result};
use crate::paths;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tera::{Context, Tera};

/// Override directory name inside the data directory.
const TEMPLATES_DIR: &str = "templates";

/// Name of the task-extraction system prompt.
pub const TASK_EXTRACTION: &str = "prompts/task_extraction.tera";

/// Embedded default templates for fallback when files don't exist.
static EMBEDDED_TEMPLATES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert(TASK_EXTRACTION, include_str!("../templates/prompts/task_extraction.tera"));
    m
});

/// Global template engine with caching.
static TERA: Lazy<RwLock<Option<Tera>>> = Lazy::new(|| RwLock::new(None));

fn default_templates_dir() -> Option<PathBuf> {
    paths::data_dir().map(|dir| dir.join(TEMPLATES_DIR))
}

/// Build an engine from `templates_dir` (or the data directory's
/// `templates/`), filling gaps with the embedded defaults.
fn build_engine(templates_dir: Option<&Path>) -> Result<Tera> {
    let dir = templates_dir.map(Path::to_path_buf).or_else(default_templates_dir);

    let mut tera = Tera::default();

    if let Some(dir) = dir.filter(|d| d.exists()) {
        let glob_pattern = format!("{}/**/*.tera", dir.display());
        tera = Tera::new(&glob_pattern).map_err(|e| {
            Error::Template(format!("Failed to load templates from {}: {e}", dir.display()))
        })?;
    }

    for (name, content) in EMBEDDED_TEMPLATES.iter() {
        if tera.get_template(name).is_err() {
            tera.add_raw_template(name, content)
                .map_err(|e| Error::Template(format!("Embedded template {name} is invalid: {e}")))?;
        }
    }

    Ok(tera)
}

/// Initialize the template engine with templates from the specified directory.
///
/// Without a directory, `templates/` inside the data directory is used. If it
/// doesn't exist, templates are loaded from embedded defaults.
///
/// # Errors
///
/// Returns an error if the templates directory exists but contains invalid
/// templates.
pub fn init_templates(templates_dir: Option<&Path>) -> Result<()> {
    let tera = build_engine(templates_dir)?;
    *TERA.write().map_err(|e| Error::Template(e.to_string()))? = Some(tera);
    Ok(())
}

fn render_with(tera: &Tera, name: &str, context: &Context) -> Result<String> {
    tera.render(name, context)
        .map_err(|e| Error::Template(format!("Failed to render template {name}: {e}")))
}

/// Render a template with the given context.
///
/// Templates are lazy-loaded on first use, with embedded defaults as
/// fallback.
///
/// # Errors
///
/// Returns an error if the template doesn't exist or rendering fails.
pub fn render(name: &str, context: &Context) -> Result<String> {
    {
        let guard = TERA.read().map_err(|e| Error::Template(e.to_string()))?;
        if let Some(tera) = guard.as_ref() {
            return render_with(tera, name, context);
        }
    }

    let mut guard = TERA.write().map_err(|e| Error::Template(e.to_string()))?;
    if guard.is_none() {
        *guard = Some(build_engine(None)?);
    }
    let tera = guard.as_ref().ok_or_else(|| Error::Template("Templates not initialized".into()))?;
    render_with(tera, name, context)
}

/// Reset the template cache, forcing re-initialization on next use.
///
/// # Errors
///
/// Returns an error if the write lock cannot be acquired.
pub fn reset_cache() -> Result<()> {
    *TERA.write().map_err(|e| Error::Template(e.to_string()))? = None;
    Ok(())
}

/// Get the list of all embedded template names.
#[must_use]
pub fn embedded_template_names() -> Vec<&'static str> {
    EMBEDDED_TEMPLATES.keys().copied().collect()
}
