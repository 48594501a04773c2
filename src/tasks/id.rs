//! Identifier generation for tasks and categories.
//!
//! Task IDs look like `task_<unix millis>_<6 base36 chars>`. Category IDs are
//! slugs derived from the category name:
//! 1. Converting to lowercase
//! 2. Replacing runs of non-alphanumeric characters with one hyphen
//! 3. Trimming leading/trailing hyphens

use std::cell::Cell;

thread_local! {
    /// Counter for deterministic ID generation in tests.
    static TEST_COUNTER: Cell<u64> = const { Cell::new(0) };

    /// Whether to use deterministic IDs on this thread (for testing).
    static USE_DETERMINISTIC_IDS: Cell<bool> = const { Cell::new(false) };
}

/// Length of the random part of a task ID.
const RANDOM_SUFFIX_LEN: usize = 6;

/// Enable deterministic ID generation for testing.
///
/// When enabled, the random part of an ID comes from a counter. The switch
/// is per thread, so parallel tests do not disturb each other's sequence.
pub fn enable_deterministic_ids() {
    USE_DETERMINISTIC_IDS.with(|flag| flag.set(true));
    TEST_COUNTER.with(|counter| counter.set(0));
}

/// Disable deterministic ID generation.
pub fn disable_deterministic_ids() {
    USE_DETERMINISTIC_IDS.with(|flag| flag.set(false));
}

/// Convert a name to a slug.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true; // Start true to avoid leading hyphen

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    if slug.ends_with('-') {
        slug.pop();
    }

    slug
}

/// Encode a number in lowercase base 36.
#[must_use]
pub fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[usize::try_from(value % 36).unwrap_or_default()]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Milliseconds since the Unix epoch.
#[must_use]
pub fn now_millis() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default()
}

/// The current time, truncated to the millisecond precision it is stored with.
pub(crate) fn now_utc() -> chrono::DateTime<chrono::Utc> {
    use chrono::SubsecRound;
    chrono::Utc::now().trunc_subsecs(3)
}

/// A non-cryptographic random number from the std hasher's random keys.
pub(crate) fn random_u64() -> u64 {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let mut hasher = RandomState::new().build_hasher();
    hasher.write_u64(now_millis());
    hasher.finish()
}

/// Generate the random part of an ID.
fn random_suffix() -> String {
    let value = if USE_DETERMINISTIC_IDS.with(Cell::get) {
        TEST_COUNTER.with(|counter| {
            let value = counter.get();
            counter.set(value + 1);
            value
        })
    } else {
        random_u64()
    };
    // 36^6 keeps the suffix at exactly six characters once padded
    let encoded = to_base36(value % 36u64.pow(6));
    format!("{encoded:0>width$}", width = RANDOM_SUFFIX_LEN)
}

/// Generate a new task ID.
#[must_use]
pub fn generate_task_id() -> String {
    format!("task_{}_{}", now_millis(), random_suffix())
}

/// Derive a category ID from its name, avoiding `taken` IDs.
///
/// On collision a `-<base36 millis>` suffix is appended. Names without any
/// ASCII alphanumerics slug to `category`.
#[must_use]
pub fn generate_category_id<'a>(name: &str, taken: impl IntoIterator<Item = &'a str>) -> String {
    let mut id = slugify(name);
    if id.is_empty() {
        id = "category".to_string();
    }

    let taken: Vec<&str> = taken.into_iter().collect();
    if !taken.contains(&id.as_str()) {
        return id;
    }

    let mut stamp = now_millis();
    loop {
        let candidate = format!("{id}-{}", to_base36(stamp));
        if !taken.contains(&candidate.as_str()) {
            return candidate;
        }
        stamp += 1;
    }
}
