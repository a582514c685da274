//! Support widget core
//!
//! Interaction state machine for an embeddable chat and help-center
//! widget: visual modes and their transitions, the session conversation
//! with simulated assistant replies, and help-article browsing.

pub mod catalog;
pub mod config;
pub mod conversation;
pub mod responder;
pub mod runtime;
pub mod state_machine;
pub mod view;

pub use catalog::{ArticleCatalog, CatalogError, HelpArticle};
pub use config::{ConfigError, WidgetConfig};
pub use conversation::{Conversation, ConversationId, Message, Sender};
pub use responder::{generate, KeywordResponder, ReplySource};
pub use runtime::{spawn_widget, WidgetError, WidgetHandle, WidgetUpdate};
pub use state_machine::{Event, HelpViewState, ModeSet, Tab, WidgetMode, WidgetState};
pub use view::{WidgetSnapshot, WidgetView};
