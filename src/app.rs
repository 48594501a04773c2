//! The planner facade.
//!
//! [`Planner`] ties the stores to one key-value storage and runs the
//! cross-component flows: rendering a week runs the sticker check, and the
//! assistant's requests are checked, sent and logged.

use crate::categories::CategoryRegistry;
use crate::config::PlannerConfig;
use crate::error::Result;
use crate::event_log::EventLog;
use crate::planner::{self, AnthropicClient, PlanRequest, PlannerError, Review};
use crate::rewards::{Sticker, StickerBook};
use crate::tasks::TaskStore;
use crate::traits::{ChatClient, KeyValueStore};
use crate::view::{AppState, MonthView, WeekView};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use serde_json::json;

/// A rendered week plus the reward state.
#[derive(Debug, Clone, Serialize)]
pub struct WeekScreen {
    /// The week view model.
    #[serde(flatten)]
    pub view: WeekView,
    /// A sticker earned by this render, if any.
    pub new_sticker: Option<Sticker>,
    /// Stickers earned so far.
    pub sticker_count: usize,
}

/// A rendered month plus the reward state.
#[derive(Debug, Clone, Serialize)]
pub struct MonthScreen {
    /// The month view model.
    #[serde(flatten)]
    pub view: MonthView,
    /// Stickers earned so far.
    pub sticker_count: usize,
}

/// Tasks, categories, stickers and the assistant over one storage.
pub struct Planner<'a> {
    kv: &'a dyn KeyValueStore,
    categories: CategoryRegistry<'a>,
    config: PlannerConfig,
    events: EventLog,
}

impl<'a> Planner<'a> {
    /// Open the planner over `kv` with the default config.
    ///
    /// # Errors
    ///
    /// Returns an error if the category registry cannot be loaded or seeded.
    pub fn new(kv: &'a dyn KeyValueStore) -> Result<Self> {
        Ok(Self {
            kv,
            categories: CategoryRegistry::new(kv)?,
            config: PlannerConfig::default(),
            events: EventLog::disabled(),
        })
    }

    /// Use the given config and event log.
    #[must_use]
    pub fn with_config(mut self, config: PlannerConfig, events: EventLog) -> Self {
        self.config = config;
        self.events = events;
        self
    }

    /// The active config.
    #[must_use]
    pub const fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// The task store.
    #[must_use]
    pub fn tasks(&self) -> TaskStore<'a> {
        TaskStore::new(self.kv)
    }

    /// The category registry.
    #[must_use]
    pub const fn categories(&self) -> &CategoryRegistry<'a> {
        &self.categories
    }

    /// The category registry, for changes and subscriptions.
    pub fn categories_mut(&mut self) -> &mut CategoryRegistry<'a> {
        &mut self.categories
    }

    /// The sticker book.
    #[must_use]
    pub fn stickers(&self) -> StickerBook<'a> {
        StickerBook::new(self.kv)
    }

    /// Build the week shown by `state` and award its sticker if earned.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read or written.
    pub fn week_view(&self, state: &AppState, today: NaiveDate) -> Result<WeekScreen> {
        let week = state.week_dates();
        let tasks = self.tasks().by_dates(&week)?;
        let view = WeekView::build(&week, &tasks, self.categories.all(), &state.filter, today);

        let stickers = self.stickers();
        let new_sticker = stickers.check_and_award(&tasks, &week)?;
        if let Some(sticker) = &new_sticker {
            self.events.record(
                "sticker_awarded",
                &json!({"week": sticker.week_key, "pct": sticker.pct, "emoji": sticker.emoji}),
            );
        }

        Ok(WeekScreen { view, new_sticker, sticker_count: stickers.all()?.len() })
    }

    /// Build the month shown by `state`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    pub fn month_view(&self, state: &AppState, today: NaiveDate) -> Result<MonthScreen> {
        let (year, month) = (state.month_date.year(), state.month_date.month());
        let grid = crate::calendar::month_grid_dates(year, month).unwrap_or_default();
        let tasks = match (grid.first(), grid.last()) {
            (Some(&start), Some(&end)) => self.tasks().by_date_range(start, end)?,
            _ => Vec::new(),
        };

        let view = MonthView::build(year, month, &tasks, self.categories.all(), &state.filter, today)
            .ok_or_else(|| crate::error::Error::Validation(format!("invalid month {year}-{month:02}")))?;

        Ok(MonthScreen { view, sticker_count: self.stickers().all()?.len() })
    }

    /// The stored API key, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    pub fn api_key(&self) -> Result<Option<String>> {
        planner::api_key(self.kv)
    }

    /// Store an API key; blank input clears it. Returns whether a key is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be written.
    pub fn set_api_key(&self, key: &str) -> Result<bool> {
        planner::set_api_key(self.kv, key)
    }

    /// Remove the stored API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be written.
    pub fn clear_api_key(&self) -> Result<()> {
        planner::clear_api_key(self.kv)
    }

    /// Ask the hosted model for tasks, using the stored API key.
    ///
    /// Input is checked before the key, and the key before any network call.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::MissingCredential`] without a stored key, or
    /// any error of [`Planner::plan_with`].
    pub fn plan(&self, request: &PlanRequest, today: NaiveDate) -> Result<Review> {
        request.validate()?;
        let key = self.api_key()?.ok_or(PlannerError::MissingCredential)?;
        let client = AnthropicClient::new(&key, &self.config)?;
        self.plan_with(&client, request, today)
    }

    /// Ask `client` for tasks and open a review of its proposals.
    ///
    /// # Errors
    ///
    /// Returns a planner error for invalid input, transport or API failures
    /// and replies without usable tasks.
    pub fn plan_with(
        &self,
        client: &dyn ChatClient,
        request: &PlanRequest,
        today: NaiveDate,
    ) -> Result<Review> {
        self.events.record(
            "plan_request",
            &json!({
                "text_len": request.text.len(),
                "attachments": request.attachments.iter().map(|a| &a.name).collect::<Vec<_>>(),
                "date_hint": request.date_hint.prompt_text(),
            }),
        );

        let result =
            planner::extract_tasks(client, request, self.categories.all(), &self.config, today);
        match &result {
            Ok(review) => self.events.record("plan_proposed", &json!({"count": review.len()})),
            Err(e) => self.events.record("plan_failed", &json!({"error": e.to_string()})),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::parse_date_key;
    use crate::error::Error;
    use crate::tasks::TaskDraft;
    use crate::testing::{FailingStore, MemoryStore, MockChatClient};
    use crate::view::ViewMode;
    use tempfile::TempDir;

    fn d(s: &str) -> NaiveDate {
        parse_date_key(s).unwrap()
    }

    #[test]
    fn test_week_view_awards_sticker_once() {
        let kv = MemoryStore::new();
        let planner = Planner::new(&kv).unwrap();
        let task = planner.tasks().add(TaskDraft::new("Only task", d("2025-02-12"))).unwrap();
        let state = AppState::new(d("2025-02-12"));

        let first = planner.week_view(&state, d("2025-02-12")).unwrap();
        assert!(first.new_sticker.is_none());
        assert_eq!(first.view.progress.label, "0 of 1 tasks");

        planner.tasks().toggle_complete(&task.id).unwrap();
        let second = planner.week_view(&state, d("2025-02-12")).unwrap();
        assert_eq!(second.new_sticker.map(|s| s.week_key), Some("2025-02-10".to_string()));
        assert_eq!(second.sticker_count, 1);

        let third = planner.week_view(&state, d("2025-02-12")).unwrap();
        assert!(third.new_sticker.is_none());
        assert_eq!(third.sticker_count, 1);
    }

    #[test]
    fn test_sticker_survives_uncompleting() {
        let kv = MemoryStore::new();
        let planner = Planner::new(&kv).unwrap();
        let task = planner.tasks().add(TaskDraft::new("Only task", d("2025-02-12"))).unwrap();
        planner.tasks().toggle_complete(&task.id).unwrap();
        let state = AppState::new(d("2025-02-12"));
        planner.week_view(&state, d("2025-02-12")).unwrap();

        planner.tasks().toggle_complete(&task.id).unwrap();
        planner.week_view(&state, d("2025-02-12")).unwrap();
        assert!(planner.stickers().has_sticker("2025-02-10").unwrap());
    }

    #[test]
    fn test_month_view_uses_state_month() {
        let kv = MemoryStore::new();
        let planner = Planner::new(&kv).unwrap();
        planner.tasks().add(TaskDraft::new("Leading day", d("2026-01-26"))).unwrap();
        planner.tasks().add(TaskDraft::new("In month", d("2026-02-20"))).unwrap();

        let mut state = AppState::new(d("2026-02-20"));
        state.set_view(ViewMode::Month);
        let screen = planner.month_view(&state, d("2026-02-20")).unwrap();

        assert_eq!(screen.view.label, "February 2026");
        assert_eq!(screen.view.rows[0][0].dots.len(), 1);
        assert_eq!(screen.view.progress.total, 1);
    }

    #[test]
    fn test_plan_requires_key_before_network() {
        let kv = MemoryStore::new();
        let planner = Planner::new(&kv).unwrap();

        let err = planner.plan(&PlanRequest::new("call the plumber"), d("2025-02-12")).unwrap_err();
        assert!(matches!(err, Error::Planner(PlannerError::MissingCredential)));

        let err = planner.plan(&PlanRequest::new("  "), d("2025-02-12")).unwrap_err();
        assert!(matches!(err, Error::Planner(PlannerError::EmptyInput)));
    }

    #[test]
    #[serial_test::serial]
    fn test_plan_with_logs_events() {
        let dir = TempDir::new().unwrap();
        let kv = MemoryStore::new();
        let planner = Planner::new(&kv)
            .unwrap()
            .with_config(PlannerConfig::default(), EventLog::enabled(dir.path()));

        let client = MockChatClient::new();
        client.push_reply(Ok(r#"[{"title":"Call plumber","date":"2025-02-13","priority":"high"}]"#.into()));
        client.push_reply(Err(PlannerError::InvalidCredential));

        let review = planner.plan_with(&client, &PlanRequest::new("plumber!"), d("2025-02-12")).unwrap();
        let added = review.confirm(&planner.tasks()).unwrap();
        assert_eq!(added[0].category, "work");

        assert!(planner.plan_with(&client, &PlanRequest::new("again"), d("2025-02-12")).is_err());

        let log = std::fs::read_to_string(crate::paths::events_path(dir.path())).unwrap();
        let types: Vec<String> = log
            .lines()
            .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap()["event_type"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(types, ["plan_request", "plan_proposed", "plan_request", "plan_failed"]);
    }

    #[test]
    fn test_api_key_helpers() {
        let kv = MemoryStore::new();
        let planner = Planner::new(&kv).unwrap();

        assert!(planner.set_api_key(" sk-1 ").unwrap());
        assert_eq!(planner.api_key().unwrap().as_deref(), Some("sk-1"));
        planner.clear_api_key().unwrap();
        assert!(planner.api_key().unwrap().is_none());
    }

    #[test]
    fn test_storage_failure_propagates() {
        let kv = FailingStore::new("disk unavailable");
        assert!(Planner::new(&kv).is_err());
    }
}
