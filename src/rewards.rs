//! Weekly completion stickers.
//!
//! A week earns a sticker once at least [`THRESHOLD`] of its tasks are done.
//! Each week (keyed by its Monday) earns at most one sticker, and a sticker
//! stays earned even if tasks are later un-completed.

use crate::calendar::{format_week_range, to_date_key};
use crate::error::Result;
use crate::storage::keys;
use crate::tasks::id::{now_utc, random_u64};
use crate::tasks::Task;
use crate::traits::KeyValueStore;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Fraction of a week's tasks that must be completed to earn a sticker.
pub const THRESHOLD: f64 = 0.8;

/// How many of the most recent stickers' emoji a new sticker avoids.
const RECENT_WINDOW: usize = 10;

/// Emoji a sticker is drawn from.
pub const STICKER_POOL: [&str; 32] = [
    "⭐", "🌟", "🏆", "🎯", "🔥", "💪", "🚀", "🎉", "✨", "💎", "🦄", "🌈", "🍀", "🎨", "🧠", "💡",
    "🐝", "🦋", "🌸", "🍕", "🎵", "🎸", "🐶", "🐱", "🦊", "🐼", "🐨", "🐙", "🌊", "⚡", "🌻", "🍭",
];

/// A reward for one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sticker {
    /// Date key of the week's Monday.
    pub week_key: String,
    /// Human-readable week range, e.g. `Feb 10 - 16, 2025`.
    pub week_label: String,
    /// The emoji awarded. Stickers stored without one show the first pool emoji.
    #[serde(default = "default_emoji")]
    pub emoji: String,
    /// Completion percentage when earned, 0 to 100.
    pub pct: u8,
    /// When the sticker was earned.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub earned_at: DateTime<Utc>,
}

fn default_emoji() -> String {
    STICKER_POOL[0].to_string()
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StickerData {
    stickers: Vec<Sticker>,
}

/// Round a completion fraction to a whole percentage.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn fraction_to_pct(fraction: f64) -> u8 {
    (fraction.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// Pick an emoji not used by the last ten stickers.
fn pick_emoji(existing: &[Sticker]) -> String {
    let recent: Vec<&str> =
        existing.iter().rev().take(RECENT_WINDOW).map(|s| s.emoji.as_str()).collect();
    let available: Vec<&str> =
        STICKER_POOL.iter().copied().filter(|e| !recent.contains(e)).collect();
    let pool: &[&str] = if available.is_empty() { &STICKER_POOL } else { &available };

    let index = usize::try_from(random_u64() % pool.len() as u64).unwrap_or_default();
    pool[index].to_string()
}

/// The persisted collection of earned stickers.
pub struct StickerBook<'a> {
    kv: &'a dyn KeyValueStore,
}

impl<'a> StickerBook<'a> {
    /// Create a sticker book over the given key-value storage.
    pub fn new(kv: &'a dyn KeyValueStore) -> Self {
        Self { kv }
    }

    fn load(&self) -> Result<StickerData> {
        let Some(raw) = self.kv.get(keys::STICKERS)? else {
            return Ok(StickerData::default());
        };
        match serde_json::from_str(&raw) {
            Ok(data) => Ok(data),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load stickers, resetting");
                Ok(StickerData::default())
            }
        }
    }

    fn save(&self, data: &StickerData) -> Result<()> {
        let raw = serde_json::to_string(data)?;
        self.kv.set(keys::STICKERS, &raw)
    }

    /// All earned stickers, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    pub fn all(&self) -> Result<Vec<Sticker>> {
        Ok(self.load()?.stickers)
    }

    /// Whether the week starting on this Monday already has a sticker.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    pub fn has_sticker(&self, week_key: &str) -> Result<bool> {
        Ok(self.load()?.stickers.iter().any(|s| s.week_key == week_key))
    }

    /// Award a sticker for a week. Returns `None` if the week already has one.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read or written.
    pub fn award(&self, week_key: &str, week_label: &str, fraction: f64) -> Result<Option<Sticker>> {
        let mut data = self.load()?;
        if data.stickers.iter().any(|s| s.week_key == week_key) {
            return Ok(None);
        }

        let sticker = Sticker {
            week_key: week_key.to_string(),
            week_label: week_label.to_string(),
            emoji: pick_emoji(&data.stickers),
            pct: fraction_to_pct(fraction),
            earned_at: now_utc(),
        };
        data.stickers.push(sticker.clone());
        self.save(&data)?;

        tracing::info!(week = %sticker.week_key, pct = sticker.pct, "sticker awarded");
        Ok(Some(sticker))
    }

    /// Award the week's sticker if enough of its tasks are done.
    ///
    /// `tasks` may contain tasks outside the week; only those dated inside
    /// `week` count. Returns the new sticker, or `None` when the week has no
    /// tasks, is below the threshold, or was already rewarded.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read or written.
    pub fn check_and_award(&self, tasks: &[Task], week: &[NaiveDate; 7]) -> Result<Option<Sticker>> {
        let in_week: Vec<&Task> = tasks.iter().filter(|t| week.contains(&t.date)).collect();
        if in_week.is_empty() {
            return Ok(None);
        }

        let done = in_week.iter().filter(|t| t.completed).count();
        #[allow(clippy::cast_precision_loss)]
        let fraction = done as f64 / in_week.len() as f64;
        if fraction < THRESHOLD {
            return Ok(None);
        }

        self.award(&to_date_key(week[0]), &format_week_range(week), fraction)
    }

    /// Remove a week's sticker. Returns `false` if it had none.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read or written.
    pub fn remove(&self, week_key: &str) -> Result<bool> {
        let mut data = self.load()?;
        let before = data.stickers.len();
        data.stickers.retain(|s| s.week_key != week_key);
        if data.stickers.len() == before {
            return Ok(false);
        }
        self.save(&data)?;
        Ok(true)
    }
}
