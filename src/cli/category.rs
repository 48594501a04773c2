//! Category CLI subcommands.

use clap::Subcommand;

/// Category management commands.
///
/// Deleting a category leaves its tasks alone; they show in the fallback
/// color until moved.
#[derive(Subcommand, Debug, Clone)]
pub enum CategoryCommand {
    /// List categories in display order.
    List,

    /// Add a category. Its id is derived from the name.
    Add {
        /// Display name
        name: String,

        /// Color as #RRGGBB
        #[arg(short, long)]
        color: String,
    },

    /// Rename or recolor a category.
    Update {
        /// Category ID
        id: String,

        /// New display name
        #[arg(short, long)]
        name: Option<String>,

        /// New color as #RRGGBB
        #[arg(short, long)]
        color: Option<String>,
    },

    /// Delete a category.
    Delete {
        /// Category ID
        id: String,
    },

    /// Print the CSS rules for category colors.
    Css,
}
