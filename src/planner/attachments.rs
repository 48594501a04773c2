//! Files sent along with a plan request.

use super::{ContentBlock, MediaSource, PlannerError};
use crate::error::Result;
use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use std::path::Path;

/// How an attachment is sent to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    /// Inlined as a text block.
    Text,
    /// Sent as a base64 image block.
    Image,
    /// Sent as a base64 document block.
    Pdf,
}

/// A loaded attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// File name shown to the model for text files.
    pub name: String,
    /// How the file is sent.
    pub kind: AttachmentKind,
    /// MIME type.
    pub media_type: String,
    /// File contents: plain text for [`AttachmentKind::Text`], base64 otherwise.
    pub data: String,
}

/// Map a file extension to its kind and MIME type.
fn classify(extension: &str) -> Option<(AttachmentKind, &'static str)> {
    let kind = match extension.to_ascii_lowercase().as_str() {
        "txt" | "md" | "markdown" | "csv" | "json" | "log" | "text" => {
            (AttachmentKind::Text, "text/plain")
        }
        "png" => (AttachmentKind::Image, "image/png"),
        "jpg" | "jpeg" => (AttachmentKind::Image, "image/jpeg"),
        "gif" => (AttachmentKind::Image, "image/gif"),
        "webp" => (AttachmentKind::Image, "image/webp"),
        "pdf" => (AttachmentKind::Pdf, "application/pdf"),
        _ => return None,
    };
    Some(kind)
}

impl Attachment {
    /// A text attachment from a string.
    #[must_use]
    pub fn text(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttachmentKind::Text,
            media_type: "text/plain".to_string(),
            data: content.into(),
        }
    }

    /// Build an attachment from raw bytes, choosing the kind by extension.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::UnsupportedAttachment`] for unknown extensions
    /// and text files that are not UTF-8.
    pub fn from_bytes(name: &str, bytes: &[u8]) -> std::result::Result<Self, PlannerError> {
        let extension = Path::new(name).extension().and_then(|e| e.to_str()).unwrap_or_default();
        let Some((kind, media_type)) = classify(extension) else {
            return Err(PlannerError::UnsupportedAttachment(name.to_string()));
        };

        let data = match kind {
            AttachmentKind::Text => std::str::from_utf8(bytes)
                .map_err(|_| PlannerError::UnsupportedAttachment(format!("{name} is not UTF-8 text")))?
                .to_string(),
            AttachmentKind::Image | AttachmentKind::Pdf => B64.encode(bytes),
        };

        Ok(Self { name: name.to_string(), kind, media_type: media_type.to_string(), data })
    }

    /// Read an attachment from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its type is not
    /// supported.
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let bytes = std::fs::read(path)?;
        Ok(Self::from_bytes(&name, &bytes)?)
    }

    /// The message block carrying this attachment.
    #[must_use]
    pub fn to_content_block(&self) -> ContentBlock {
        let source = || MediaSource {
            kind: "base64",
            media_type: self.media_type.clone(),
            data: self.data.clone(),
        };
        match self.kind {
            AttachmentKind::Text => {
                ContentBlock::Text { text: format!("--- {} ---\n{}", self.name, self.data) }
            }
            AttachmentKind::Image => ContentBlock::Image { source: source() },
            AttachmentKind::Pdf => ContentBlock::Document { source: source() },
        }
    }
}
