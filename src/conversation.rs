//! Session-scoped conversation log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Assistant,
}

/// A single chat message. Never modified after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn user(text: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            created_at,
        }
    }

    pub fn assistant(text: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            sender: Sender::Assistant,
            text: text.into(),
            created_at,
        }
    }
}

/// Identity of a conversation within one widget session.
///
/// A new id is handed out every time the conversation is replaced, so
/// deferred replies can tell whether their target is still current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(pub u64);

impl ConversationId {
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conv-{}", self.0)
    }
}

/// Ordered, append-only message log
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Conversation {
    id: ConversationId,
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new(id: ConversationId) -> Self {
        Self {
            id,
            messages: Vec::new(),
        }
    }

    pub fn with_messages(id: ConversationId, messages: Vec<Message>) -> Self {
        Self { id, messages }
    }

    pub fn id(&self) -> ConversationId {
        self.id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }
}

/// A canned earlier conversation offered in the tabbed layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PastConversation {
    pub id: String,
    pub title: String,
    pub messages: Vec<SeedMessage>,
}

/// Message text without a timestamp; stamped when the conversation is opened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedMessage {
    pub sender: Sender,
    pub text: String,
}

impl PastConversation {
    /// Materialize into a live conversation under a fresh id
    pub fn open(&self, id: ConversationId, now: DateTime<Utc>) -> Conversation {
        let messages = self
            .messages
            .iter()
            .map(|m| Message {
                sender: m.sender,
                text: m.text.clone(),
                created_at: now,
            })
            .collect();
        Conversation::with_messages(id, messages)
    }

    /// Text of the last message, for list previews
    pub fn preview(&self) -> Option<&str> {
        self.messages.last().map(|m| m.text.as_str())
    }
}
