//! Message types for multimodal chat requests.
//!
//! A [`Message`] carries a role and either plain text or a list of
//! [`ContentPart`]s. Vision requests mix text parts with image parts:
//!
//! ```rust
//! use llm::messages::{ContentPart, Message};
//!
//! let msg = Message::human(vec![
//!     ContentPart::text("Please score the following images."),
//!     ContentPart::image_base64("image/png", "iVBORw0KGgo="),
//! ]);
//! assert_eq!(msg.text(), "Please score the following images.");
//! assert_eq!(msg.images().count(), 1);
//! ```
//!
//! # Serialization Format
//!
//! ```json
//! // Text content
//! "Hello"
//!
//! // Parts content
//! [
//!   {"type": "text", "text": "Hello"},
//!   {"type": "image", "source": {"type": "base64", "media_type": "image/png", "data": "..."}}
//! ]
//! ```

use serde::{Deserialize, Serialize};

/// Role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Instructions and output format for the model.
    System,

    /// End-user input, including images.
    Human,

    /// Model output.
    Assistant,
}

/// Where the bytes of an image part come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImageSource {
    /// Image fetched by the provider from a URL.
    Url { url: String },

    /// Inline base64-encoded image data.
    Base64 { media_type: String, data: String },
}

impl ImageSource {
    /// Render this source as a URL usable in OpenAI-style `image_url` parts.
    ///
    /// Inline data becomes a `data:` URL.
    pub fn data_url(&self) -> String {
        match self {
            ImageSource::Url { url } => url.clone(),
            ImageSource::Base64 { media_type, data } => {
                format!("data:{};base64,{}", media_type, data)
            }
        }
    }
}

/// Individual content part in a multimodal message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Text content.
    Text { text: String },

    /// Image content.
    Image { source: ImageSource },
}

impl ContentPart {
    /// Create a text content part
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create an image content part from URL
    pub fn image_url(url: impl Into<String>) -> Self {
        Self::Image {
            source: ImageSource::Url { url: url.into() },
        }
    }

    /// Create an image content part from base64 data
    pub fn image_base64(media_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self::Image {
            source: ImageSource::Base64 {
                media_type: media_type.into(),
                data: data.into(),
            },
        }
    }
}

/// Message content: plain text or a list of parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Simple text-only content.
    Text(String),

    /// Multimodal content.
    Parts(Vec<ContentPart>),
}

impl From<String> for MessageContent {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for MessageContent {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<Vec<ContentPart>> for MessageContent {
    fn from(parts: Vec<ContentPart>) -> Self {
        Self::Parts(parts)
    }
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: MessageRole,

    /// Message content
    pub content: MessageContent,
}

impl Message {
    /// Create a new message with the given role and content
    pub fn new(role: MessageRole, content: impl Into<MessageContent>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message
    pub fn system(content: impl Into<MessageContent>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Create a human message
    pub fn human(content: impl Into<MessageContent>) -> Self {
        Self::new(MessageRole::Human, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<MessageContent>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    /// All text in this message. Text parts are joined with newlines.
    pub fn text(&self) -> String {
        match &self.content {
            MessageContent::Text(s) => s.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    ContentPart::Text { text } => Some(text.as_str()),
                    ContentPart::Image { .. } => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Image sources attached to this message, in order.
    pub fn images(&self) -> impl Iterator<Item = &ImageSource> {
        let parts: &[ContentPart] = match &self.content {
            MessageContent::Text(_) => &[],
            MessageContent::Parts(parts) => parts,
        };
        parts.iter().filter_map(|p| match p {
            ContentPart::Image { source } => Some(source),
            ContentPart::Text { .. } => None,
        })
    }

    /// Whether this message carries any image parts.
    pub fn has_images(&self) -> bool {
        self.images().next().is_some()
    }
}
