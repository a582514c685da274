//! Events that can occur in a widget session

use super::state::{ReplyTicket, Tab};
use serde::{Deserialize, Serialize};

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    // Lifecycle
    Mount,

    // Frame controls
    MinimizeClick,
    ExpandClick,
    CloseClick,
    HelpClick,
    BackClick,

    // Message input
    InputClick,
    InputChange { text: String },
    SubmitMessage,
    PromptSuggestionClick { text: String },

    // Help center
    SearchQueryChange { text: String },
    CategoryClick { category: String },
    ArticleClick { article_id: String },
    BackToCatalogClick,

    // Tabbed home
    TabSelect { tab: Tab },
    StartChatClick,
    PastChatClick { conversation_id: String },

    // Deferred reply landed
    ReplyReady { ticket: ReplyTicket, text: String },
}
