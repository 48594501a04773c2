//! Planner assistant: turn free text and attached files into proposed tasks.
//!
//! One extraction is a single request to a hosted language model. The reply
//! is parsed into [`TaskDraft`](crate::tasks::TaskDraft)s, which the user reviews (edit, remove)
//! before they are inserted into the task store. Nothing is retried.

pub mod attachments;
pub mod client;
pub mod credential;
pub mod parse;
pub mod prompt;
pub mod review;

pub use attachments::{Attachment, AttachmentKind};
pub use client::AnthropicClient;
pub use credential::{api_key, clear_api_key, set_api_key};
pub use review::{DraftEdit, Review};

use crate::calendar;
use crate::categories::Category;
use crate::config::PlannerConfig;
use crate::error::Result;
use crate::traits::ChatClient;
use chrono::NaiveDate;
use serde::Serialize;

/// Most tasks taken from one reply.
pub const MAX_TASKS: usize = 20;

/// Most attachments accepted in one request.
pub const MAX_ATTACHMENTS: usize = 10;

/// Why an extraction failed. The messages are shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlannerError {
    /// No API key is stored.
    #[error("Please set your API key first.")]
    MissingCredential,

    /// The API rejected the key (401).
    #[error("Invalid API key. Check your key and try again.")]
    InvalidCredential,

    /// Too many requests (429).
    #[error("Rate limit exceeded. Please wait a moment and try again.")]
    RateLimited,

    /// The API rejected the request (400).
    #[error("Bad request. Your input may be too long.")]
    BadRequest,

    /// Any other non-success status.
    #[error("API error ({0}). Please try again.")]
    Api(u16),

    /// The request never got a response. Holds the transport error.
    #[error("Network error. Check your internet connection and try again.")]
    Network(String),

    /// The reply held no usable tasks.
    #[error("No actionable tasks found. Try pasting more detailed text.")]
    NoActionableTasks,

    /// Neither text nor attachments were given.
    #[error("Please paste some text to analyze.")]
    EmptyInput,

    /// More than [`MAX_ATTACHMENTS`] files were attached.
    #[error("Too many attachments ({0}). At most 10 files can be attached.")]
    TooManyAttachments(usize),

    /// A file type the API cannot read.
    #[error("Unsupported attachment: {0}")]
    UnsupportedAttachment(String),
}

/// Scheduling hint passed along to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateHint {
    /// Let the model decide.
    #[default]
    Auto,
    /// Everything today.
    Today,
    /// Somewhere in the current week.
    ThisWeek,
    /// Somewhere in the following week.
    NextWeek,
    /// A specific day.
    Date(NaiveDate),
}

impl DateHint {
    /// The phrase quoted in the system prompt, `None` for [`DateHint::Auto`].
    #[must_use]
    pub fn prompt_text(self) -> Option<String> {
        match self {
            Self::Auto => None,
            Self::Today => Some("today".to_string()),
            Self::ThisWeek => Some("this week".to_string()),
            Self::NextWeek => Some("next week".to_string()),
            Self::Date(date) => Some(calendar::to_date_key(date)),
        }
    }
}

impl std::str::FromStr for DateHint {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "auto" | "" => Ok(Self::Auto),
            "today" => Ok(Self::Today),
            "this week" => Ok(Self::ThisWeek),
            "next week" => Ok(Self::NextWeek),
            _ => calendar::parse_date_key(s.trim()).map(Self::Date).ok_or_else(|| {
                format!("invalid date hint '{s}' (auto, today, this-week, next-week or YYYY-MM-DD)")
            }),
        }
    }
}

/// What the user asked the assistant to plan.
#[derive(Debug, Clone, Default)]
pub struct PlanRequest {
    /// Free text to extract tasks from.
    pub text: String,
    /// Files sent along with the text.
    pub attachments: Vec<Attachment>,
    /// Scheduling hint.
    pub date_hint: DateHint,
}

impl PlanRequest {
    /// A request with only text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), ..Default::default() }
    }

    /// Reject requests that cannot be sent.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::EmptyInput`] when there is neither text nor an
    /// attachment, or [`PlannerError::TooManyAttachments`].
    pub fn validate(&self) -> std::result::Result<(), PlannerError> {
        if self.text.trim().is_empty() && self.attachments.is_empty() {
            return Err(PlannerError::EmptyInput);
        }
        if self.attachments.len() > MAX_ATTACHMENTS {
            return Err(PlannerError::TooManyAttachments(self.attachments.len()));
        }
        Ok(())
    }
}

/// Base64 payload of an image or document block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaSource {
    /// Always `base64`.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// MIME type of the data.
    pub media_type: String,
    /// Base64-encoded file contents.
    pub data: String,
}

/// One block of the user message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    /// Plain text.
    Text {
        /// The text.
        text: String,
    },
    /// An image.
    Image {
        /// Encoded image.
        source: MediaSource,
    },
    /// A PDF document.
    Document {
        /// Encoded document.
        source: MediaSource,
    },
}

/// A chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    /// Always `user` for extraction requests.
    pub role: String,
    /// Message body.
    pub content: Vec<ContentBlock>,
}

/// The body of a Messages API request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    /// Model name.
    pub model: String,
    /// Response token budget.
    pub max_tokens: u32,
    /// System prompt.
    pub system: String,
    /// Conversation, a single user message here.
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    /// Build the request for a plan: attachments first, then the text.
    #[must_use]
    pub fn for_plan(request: &PlanRequest, system: String, config: &PlannerConfig) -> Self {
        let mut content: Vec<ContentBlock> =
            request.attachments.iter().map(Attachment::to_content_block).collect();
        let text = request.text.trim();
        if !text.is_empty() {
            content.push(ContentBlock::Text { text: text.to_string() });
        }

        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            system,
            messages: vec![ChatMessage { role: "user".to_string(), content }],
        }
    }
}

/// Ask the model for tasks and open a review of its proposals.
///
/// `categories` are the IDs the model may choose from; `today` anchors the
/// prompt and replaces unusable dates.
///
/// # Errors
///
/// Returns a planner error for invalid input, transport or API failures and
/// replies without usable tasks, or a template error if the prompt cannot be
/// rendered.
pub fn extract_tasks(
    client: &dyn ChatClient,
    request: &PlanRequest,
    categories: &[Category],
    config: &PlannerConfig,
    today: NaiveDate,
) -> Result<Review> {
    request.validate()?;

    let category_ids: Vec<&str> = categories.iter().map(|c| c.id.as_str()).collect();
    let system = prompt::build_system_prompt(today, request.date_hint, &category_ids)?;
    let chat = ChatRequest::for_plan(request, system, config);

    tracing::debug!(
        attachments = request.attachments.len(),
        text_len = request.text.len(),
        "requesting task extraction"
    );
    let reply = client.complete(&chat)?;
    let drafts = parse::parse_response(&reply, &category_ids, today)?;

    tracing::info!(count = drafts.len(), "tasks proposed");
    Ok(Review::new(drafts))
}
