//! API key CLI subcommands.

use clap::Subcommand;

/// API key commands.
///
/// The key is kept in the planner's local storage and only sent to the
/// configured API endpoint.
#[derive(Subcommand, Debug, Clone)]
pub enum KeyCommand {
    /// Store a key. A blank key clears the stored one.
    Set {
        /// The API key
        key: String,
    },

    /// Remove the stored key.
    Clear,

    /// Report whether a key is stored.
    Status,
}
