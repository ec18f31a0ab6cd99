//! Chat panel state: transcript, quick actions and open flag

use serde::{Deserialize, Serialize};

/// Suggested questions shown until the first message is sent
pub const QUICK_ACTIONS: &[&str] = &[
    "Can I recycle batteries?",
    "Where is the nearest center?",
    "How do I earn points?",
    "Contact support",
];

/// Who wrote a chat message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatSender {
    /// The person using the app
    User,
    /// EcoBot
    Bot,
}

/// One line of the transcript
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message body
    pub text: String,
    /// Author
    pub sender: ChatSender,
}

/// Chat panel model
#[derive(Clone, Debug)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
    quick_actions_visible: bool,
    open: bool,
}

impl Default for ChatTranscript {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            quick_actions_visible: true,
            open: false,
        }
    }
}

impl ChatTranscript {
    /// Empty, closed panel with quick actions visible
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the panel open/closed. Returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// Whether the panel is open
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether quick actions are still offered
    #[must_use]
    pub fn quick_actions_visible(&self) -> bool {
        self.quick_actions_visible
    }

    /// Append a user message. Whitespace-only input is ignored and `None`
    /// returned; otherwise the trimmed text is returned.
    pub fn push_user(&mut self, text: &str) -> Option<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        self.push(ChatMessage {
            text: trimmed.to_string(),
            sender: ChatSender::User,
        });
        Some(trimmed.to_string())
    }

    /// Append a bot reply
    pub fn push_bot(&mut self, text: impl Into<String>) {
        self.push(ChatMessage {
            text: text.into(),
            sender: ChatSender::Bot,
        });
    }

    fn push(&mut self, message: ChatMessage) {
        self.quick_actions_visible = false;
        self.messages.push(message);
    }

    /// All messages, oldest first
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}
