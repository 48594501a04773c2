//! Category registry.
//!
//! Categories are user-editable labels with a display color. The list is
//! persisted as a JSON array; an unreadable or empty list is replaced by the
//! default set.

use crate::error::{Error, Result};
use crate::storage::keys;
use crate::tasks::id::generate_category_id;
use crate::traits::KeyValueStore;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Color used for tasks whose category no longer exists.
pub const FALLBACK_COLOR: &str = "#94A3B8";

/// Category used when the registry has nothing to offer.
pub const DEFAULT_CATEGORY_ID: &str = "work";

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("hex color regex is valid"));

/// A task category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Slug derived from the name at creation; never changes.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Display color as `#RRGGBB`.
    pub color: String,
}

impl Category {
    fn new(id: &str, name: &str, color: &str) -> Self {
        Self { id: id.to_string(), name: name.to_string(), color: color.to_string() }
    }
}

/// Fields that can be changed on a category.
#[derive(Debug, Default, Clone)]
pub struct CategoryUpdate {
    /// New display name (if Some).
    pub name: Option<String>,
    /// New color (if Some).
    pub color: Option<String>,
}

/// The categories a fresh planner starts with.
#[must_use]
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new("work", "Work", "#3B82F6"),
        Category::new("personal", "Personal", "#8B5CF6"),
        Category::new("health", "Health", "#10B981"),
        Category::new("learning", "Learning", "#F59E0B"),
    ]
}

/// Read the stored list; `None` when missing, unreadable or empty.
fn load_stored(kv: &dyn KeyValueStore) -> Result<Option<Vec<Category>>> {
    let Some(raw) = kv.get(keys::CATEGORIES)? else {
        return Ok(None);
    };
    match serde_json::from_str::<Vec<Category>>(&raw) {
        Ok(list) if !list.is_empty() => Ok(Some(list)),
        Ok(_) => Ok(None),
        Err(e) => {
            tracing::warn!(error = %e, "failed to load categories, using defaults");
            Ok(None)
        }
    }
}

/// The ID new tasks fall back to: the first stored category, or `work`.
///
/// # Errors
///
/// Returns an error if the storage cannot be read.
pub fn default_category_id(kv: &dyn KeyValueStore) -> Result<String> {
    let first = load_stored(kv)?
        .unwrap_or_else(default_categories)
        .into_iter()
        .next()
        .map(|c| c.id);
    Ok(first.unwrap_or_else(|| DEFAULT_CATEGORY_ID.to_string()))
}

/// Per-category display rules for a stylesheet.
///
/// One rule for the filter-bar dot and one for the task-card dot of each
/// category, in list order.
#[must_use]
pub fn style_rules(categories: &[Category]) -> String {
    let mut css = String::new();
    for cat in categories {
        let _ = writeln!(css, ".cat-dot--{} {{ background: {}; }}", cat.id, cat.color);
        let _ = writeln!(css, ".task-dot--{} {{ background: {}; }}", cat.id, cat.color);
    }
    css
}

fn validate_color(color: &str) -> Result<()> {
    if HEX_COLOR.is_match(color) {
        Ok(())
    } else {
        Err(Error::Validation(format!("invalid color '{color}' (expected #RRGGBB)")))
    }
}

fn validate_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation("category name must not be empty".to_string()));
    }
    Ok(name)
}

type Listener<'a> = Box<dyn Fn(&[Category]) + 'a>;

/// The ordered list of categories, with change notification.
pub struct CategoryRegistry<'a> {
    kv: &'a dyn KeyValueStore,
    categories: Vec<Category>,
    listeners: Vec<Listener<'a>>,
}

impl std::fmt::Debug for CategoryRegistry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryRegistry")
            .field("categories", &self.categories)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl<'a> CategoryRegistry<'a> {
    /// Load the registry, seeding the defaults if nothing valid is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read or written.
    pub fn new(kv: &'a dyn KeyValueStore) -> Result<Self> {
        let mut registry = Self { kv, categories: Vec::new(), listeners: Vec::new() };
        if let Some(stored) = load_stored(kv)? {
            registry.categories = stored;
        } else {
            registry.categories = default_categories();
            registry.save()?;
        }
        Ok(registry)
    }

    fn save(&self) -> Result<()> {
        let raw = serde_json::to_string(&self.categories)?;
        self.kv.set(keys::CATEGORIES, &raw)
    }

    fn commit(&self) -> Result<()> {
        self.save()?;
        for listener in &self.listeners {
            listener(&self.categories);
        }
        Ok(())
    }

    /// Register a listener called with the new list after every change.
    pub fn subscribe(&mut self, listener: impl Fn(&[Category]) + 'a) {
        self.listeners.push(Box::new(listener));
    }

    /// All categories, in display order.
    #[must_use]
    pub fn all(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a category by ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// The color of a category, or [`FALLBACK_COLOR`] for unknown IDs.
    #[must_use]
    pub fn color(&self, id: &str) -> &str {
        self.get(id).map_or(FALLBACK_COLOR, |c| c.color.as_str())
    }

    /// The display name of a category, or the raw ID for unknown IDs.
    #[must_use]
    pub fn name<'s>(&'s self, id: &'s str) -> &'s str {
        self.get(id).map_or(id, |c| c.name.as_str())
    }

    /// Add a category. Its ID is derived from the name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for a blank name or a malformed color, or
    /// an error if the storage cannot be written.
    pub fn add(&mut self, name: &str, color: &str) -> Result<Category> {
        let name = validate_name(name)?;
        validate_color(color)?;

        let id = generate_category_id(name, self.categories.iter().map(|c| c.id.as_str()));
        let category = Category::new(&id, name, color);
        self.categories.push(category.clone());
        self.commit()?;

        tracing::debug!(id = %category.id, "category added");
        Ok(category)
    }

    /// Rename or recolor a category. Returns `None` for unknown IDs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for a blank name or a malformed color, or
    /// an error if the storage cannot be written.
    pub fn update(&mut self, id: &str, update: CategoryUpdate) -> Result<Option<Category>> {
        let name = update.name.as_deref().map(validate_name).transpose()?.map(str::to_string);
        if let Some(color) = &update.color {
            validate_color(color)?;
        }

        let Some(category) = self.categories.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        if let Some(name) = name {
            category.name = name;
        }
        if let Some(color) = update.color {
            category.color = color;
        }
        let updated = category.clone();
        self.commit()?;

        tracing::debug!(id, "category updated");
        Ok(Some(updated))
    }

    /// Delete a category. Tasks that use it keep the dangling ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be written.
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        let before = self.categories.len();
        self.categories.retain(|c| c.id != id);
        if self.categories.len() == before {
            return Ok(false);
        }
        self.commit()?;

        tracing::debug!(id, "category removed");
        Ok(true)
    }
}
