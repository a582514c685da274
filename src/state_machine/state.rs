//! Widget state types

use crate::catalog::{ArticleCatalog, HelpArticle};
use crate::conversation::{Conversation, ConversationId, PastConversation};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Modes
// ============================================================================

/// Top-level visual mode. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetMode {
    Minimized,
    #[default]
    Collapsed,
    Expanded,
    Help,
    Chat,
    Tabbed,
}

impl WidgetMode {
    pub const ALL: [WidgetMode; 6] = [
        WidgetMode::Minimized,
        WidgetMode::Collapsed,
        WidgetMode::Expanded,
        WidgetMode::Help,
        WidgetMode::Chat,
        WidgetMode::Tabbed,
    ];

    /// Modes with a message input field
    pub fn has_message_input(self) -> bool {
        matches!(
            self,
            WidgetMode::Collapsed | WidgetMode::Chat | WidgetMode::Expanded
        )
    }
}

/// Layout family the widget is mounted with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeSet {
    /// Collapsed card with suggestions, chat and help as separate modes
    #[default]
    Classic,
    /// Home screen with chat and help tabs
    Tabbed,
}

impl ModeSet {
    pub fn default_initial_mode(self) -> WidgetMode {
        match self {
            ModeSet::Classic => WidgetMode::Collapsed,
            ModeSet::Tabbed => WidgetMode::Tabbed,
        }
    }

    /// Where back-click from a chat lands
    pub fn chat_back_target(self) -> WidgetMode {
        match self {
            ModeSet::Classic => WidgetMode::Collapsed,
            ModeSet::Tabbed => WidgetMode::Tabbed,
        }
    }
}

/// Sub-tab of `Tabbed` mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    Chat,
    Help,
}

// ============================================================================
// Help Navigation
// ============================================================================

/// Coarse help panel state, as exposed to the view layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HelpViewState {
    Catalog,
    Article,
}

/// Help panel contents. An article view always carries its article.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HelpView {
    #[default]
    Catalog,
    Article { article: HelpArticle },
}

/// Catalog/article navigation inside the help surface
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HelpNavigation {
    view: HelpView,
}

impl HelpNavigation {
    pub fn view(&self) -> &HelpView {
        &self.view
    }

    pub fn view_state(&self) -> HelpViewState {
        match self.view {
            HelpView::Catalog => HelpViewState::Catalog,
            HelpView::Article { .. } => HelpViewState::Article,
        }
    }

    pub fn selected_article(&self) -> Option<&HelpArticle> {
        match &self.view {
            HelpView::Catalog => None,
            HelpView::Article { article } => Some(article),
        }
    }

    pub fn open(&mut self, article: HelpArticle) {
        self.view = HelpView::Article { article };
    }

    pub fn back_to_catalog(&mut self) {
        self.view = HelpView::Catalog;
    }
}

// ============================================================================
// Deferred Replies
// ============================================================================

/// Tags a scheduled reply with its conversation and send order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReplyTicket {
    pub conversation_id: ConversationId,
    pub seq: u64,
}

/// A reply that has been scheduled but not yet appended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingReply {
    pub ticket: ReplyTicket,
    /// Filled when the reply arrives ahead of an earlier one
    #[serde(default)]
    pub text: Option<String>,
}

// ============================================================================
// Widget State
// ============================================================================

/// Everything the widget remembers while mounted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetState {
    pub mode: WidgetMode,
    pub active_tab: Tab,
    pub help: HelpNavigation,
    pub conversation: Conversation,
    /// Text in the message input field
    pub input: String,
    pub search_query: String,
    /// Replies owed to the current conversation, in send order
    pub pending_replies: VecDeque<PendingReply>,
    pub next_reply_seq: u64,
}

impl WidgetState {
    /// Fresh state for a newly mounted widget
    pub fn mounted(context: &WidgetContext) -> Self {
        Self::in_mode(context.initial_mode)
    }

    pub fn in_mode(mode: WidgetMode) -> Self {
        Self {
            mode,
            active_tab: Tab::default(),
            help: HelpNavigation::default(),
            conversation: Conversation::default(),
            input: String::new(),
            search_query: String::new(),
            pending_replies: VecDeque::new(),
            next_reply_seq: 0,
        }
    }

    /// Whether the help catalog/article surface is on screen
    pub fn help_visible(&self) -> bool {
        match self.mode {
            WidgetMode::Help => true,
            WidgetMode::Tabbed => self.active_tab == Tab::Help,
            _ => false,
        }
    }

    /// Whether an assistant reply is still owed
    pub fn awaiting_reply(&self) -> bool {
        !self.pending_replies.is_empty()
    }
}

// ============================================================================
// Context
// ============================================================================

/// Immutable configuration a widget session runs with
#[derive(Debug, Clone)]
pub struct WidgetContext {
    pub session_id: String,
    pub mode_set: ModeSet,
    pub initial_mode: WidgetMode,
    pub assistant_name: String,
    pub greeting: String,
    pub teaser: String,
    pub prompt_suggestions: Vec<String>,
    pub reply_delay: Duration,
    pub catalog: Arc<ArticleCatalog>,
    pub past_conversations: Arc<Vec<PastConversation>>,
}

impl WidgetContext {
    pub fn find_past_conversation(&self, id: &str) -> Option<&PastConversation> {
        self.past_conversations.iter().find(|c| c.id == id)
    }
}
