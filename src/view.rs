//! Read model for the presentation layer
//!
//! `render` builds a per-mode description of what is on screen, one builder
//! per [`WidgetMode`] variant. `snapshot` wraps it together with the flat
//! fields every surface may need. Neither touches transition logic.

use crate::catalog::{CategorySummary, HelpArticle};
use crate::conversation::Message;
use crate::state_machine::{HelpView, HelpViewState, Tab, WidgetContext, WidgetMode, WidgetState};
use serde::Serialize;

/// What a single mode shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum WidgetView {
    Minimized {
        teaser: String,
    },
    Collapsed {
        assistant_name: String,
        prompt_suggestions: Vec<String>,
        input: String,
    },
    Expanded(ChatPanel),
    Chat(ChatPanel),
    Help(HelpPanel),
    Tabbed {
        active_tab: Tab,
        past_conversations: Vec<PastConversationSummary>,
        /// Present while the help tab is active
        help: Option<HelpPanel>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatPanel {
    pub assistant_name: String,
    pub messages: Vec<Message>,
    pub input: String,
    /// Show a typing indicator
    pub awaiting_reply: bool,
    pub can_go_back: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum HelpPanel {
    Catalog {
        search_query: String,
        categories: Vec<CategorySummary>,
        articles: Vec<HelpArticle>,
    },
    Article {
        /// Breadcrumb label
        category: String,
        article: HelpArticle,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PastConversationSummary {
    pub id: String,
    pub title: String,
    pub preview: Option<String>,
}

/// Flat outbound read model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetSnapshot {
    pub mode: WidgetMode,
    pub help_view_state: HelpViewState,
    pub conversation: Vec<Message>,
    pub filtered_articles: Vec<HelpArticle>,
    pub categories: Vec<String>,
    pub selected_article: Option<HelpArticle>,
    pub input: String,
    pub search_query: String,
    pub awaiting_reply: bool,
    pub view: WidgetView,
}

pub fn snapshot(state: &WidgetState, context: &WidgetContext) -> WidgetSnapshot {
    WidgetSnapshot {
        mode: state.mode,
        help_view_state: state.help.view_state(),
        conversation: state.conversation.messages().to_vec(),
        filtered_articles: context.catalog.search(&state.search_query),
        categories: context.catalog.list_categories(),
        selected_article: state.help.selected_article().cloned(),
        input: state.input.clone(),
        search_query: state.search_query.clone(),
        awaiting_reply: state.awaiting_reply(),
        view: render(state, context),
    }
}

pub fn render(state: &WidgetState, context: &WidgetContext) -> WidgetView {
    match state.mode {
        WidgetMode::Minimized => WidgetView::Minimized {
            teaser: context.teaser.clone(),
        },
        WidgetMode::Collapsed => WidgetView::Collapsed {
            assistant_name: context.assistant_name.clone(),
            prompt_suggestions: context.prompt_suggestions.clone(),
            input: state.input.clone(),
        },
        WidgetMode::Expanded => WidgetView::Expanded(chat_panel(state, context, false)),
        WidgetMode::Chat => WidgetView::Chat(chat_panel(state, context, true)),
        WidgetMode::Help => WidgetView::Help(help_panel(state, context)),
        WidgetMode::Tabbed => WidgetView::Tabbed {
            active_tab: state.active_tab,
            past_conversations: context
                .past_conversations
                .iter()
                .map(|c| PastConversationSummary {
                    id: c.id.clone(),
                    title: c.title.clone(),
                    preview: c.preview().map(str::to_string),
                })
                .collect(),
            help: (state.active_tab == Tab::Help).then(|| help_panel(state, context)),
        },
    }
}

fn chat_panel(state: &WidgetState, context: &WidgetContext, can_go_back: bool) -> ChatPanel {
    ChatPanel {
        assistant_name: context.assistant_name.clone(),
        messages: state.conversation.messages().to_vec(),
        input: state.input.clone(),
        awaiting_reply: state.awaiting_reply(),
        can_go_back,
    }
}

fn help_panel(state: &WidgetState, context: &WidgetContext) -> HelpPanel {
    match state.help.view() {
        HelpView::Catalog => HelpPanel::Catalog {
            search_query: state.search_query.clone(),
            categories: context.catalog.category_summaries(),
            articles: context.catalog.search(&state.search_query),
        },
        HelpView::Article { article } => HelpPanel::Article {
            category: article.category.clone(),
            article: article.clone(),
        },
    }
}
