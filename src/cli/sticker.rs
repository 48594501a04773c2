//! Sticker CLI subcommands.

use clap::Subcommand;

/// Weekly sticker commands.
#[derive(Subcommand, Debug, Clone)]
pub enum StickerCommand {
    /// List earned stickers, oldest first.
    List,

    /// Remove the sticker of one week.
    Remove {
        /// Monday of the week as YYYY-MM-DD
        week_key: String,
    },
}
