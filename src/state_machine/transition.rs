//! Pure state transition function
//!
//! Every (mode, event) pair is handled: pairs without a listed transition
//! return the state unchanged with no effects. The only failures are
//! lookups of ids that do not exist in the seed data.

use super::state::{PendingReply, ReplyTicket, WidgetContext, WidgetMode, WidgetState};
use super::{Effect, Event};
use crate::conversation::{Conversation, Message};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: WidgetState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: WidgetState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }

    /// Whether the transition changed nothing
    pub fn is_noop(&self) -> bool {
        self.effects.is_empty()
    }
}

/// Errors that can occur during transition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Help article not found: {0}")]
    ArticleNotFound(String),
    #[error("Past conversation not found: {0}")]
    ConversationNotFound(String),
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs; `now` is
/// only used to stamp messages appended by this transition.
#[allow(clippy::too_many_lines)]
pub fn transition(
    state: &WidgetState,
    context: &WidgetContext,
    event: Event,
    now: DateTime<Utc>,
) -> Result<TransitionResult, TransitionError> {
    let mut next = state.clone();
    let mut effects = Vec::new();

    match (state.mode, event) {
        // ============================================================
        // Lifecycle
        // ============================================================
        (_, Event::Mount) => {
            effects.push(Effect::cancel_replies(state.conversation.id()));
            next = WidgetState::mounted(context);
            next.conversation = Conversation::new(state.conversation.id().next());
            next.next_reply_seq = state.next_reply_seq;
        }

        // ============================================================
        // Frame controls
        // ============================================================
        (WidgetMode::Minimized, Event::ExpandClick) => {
            next.mode = WidgetMode::Collapsed;
        }

        (WidgetMode::Collapsed, Event::MinimizeClick) => {
            next.mode = WidgetMode::Minimized;
        }

        (WidgetMode::Collapsed, Event::HelpClick) => {
            next.mode = WidgetMode::Help;
        }

        (WidgetMode::Chat, Event::BackClick) => {
            next.mode = context.mode_set.chat_back_target();
        }

        (mode, Event::CloseClick) if mode != WidgetMode::Minimized => {
            next.mode = WidgetMode::Collapsed;
        }

        // ============================================================
        // Messaging
        // ============================================================
        (WidgetMode::Collapsed, Event::InputClick) => {
            next.mode = WidgetMode::Chat;
        }

        (mode, Event::InputChange { text }) if mode.has_message_input() => {
            next.input = text;
        }

        (WidgetMode::Collapsed, Event::SubmitMessage) => {
            let text = state.input.clone();
            if send_message(&mut next, context, text, now, &mut effects) {
                next.mode = WidgetMode::Chat;
            }
        }

        (WidgetMode::Chat | WidgetMode::Expanded, Event::SubmitMessage) => {
            let text = state.input.clone();
            send_message(&mut next, context, text, now, &mut effects);
        }

        (WidgetMode::Collapsed, Event::PromptSuggestionClick { text }) => {
            if !text.trim().is_empty() {
                let seed = vec![
                    Message::assistant(context.greeting.clone(), now),
                    Message::user(text.clone(), now),
                ];
                let fresh = Conversation::with_messages(next.conversation.id().next(), seed);
                replace_conversation(&mut next, fresh, &mut effects);
                schedule_reply(&mut next, context, text, &mut effects);
                next.input.clear();
                next.mode = WidgetMode::Chat;
            }
        }

        // ============================================================
        // Tabbed home
        // ============================================================
        (WidgetMode::Tabbed, Event::TabSelect { tab }) => {
            next.active_tab = tab;
        }

        (WidgetMode::Tabbed, Event::StartChatClick) => {
            let seed = vec![Message::assistant(context.greeting.clone(), now)];
            let fresh = Conversation::with_messages(next.conversation.id().next(), seed);
            replace_conversation(&mut next, fresh, &mut effects);
            next.mode = WidgetMode::Chat;
        }

        (WidgetMode::Tabbed, Event::PastChatClick { conversation_id }) => {
            let past = context
                .find_past_conversation(&conversation_id)
                .ok_or(TransitionError::ConversationNotFound(conversation_id))?;
            let loaded = past.open(next.conversation.id().next(), now);
            replace_conversation(&mut next, loaded, &mut effects);
            next.mode = WidgetMode::Chat;
        }

        // ============================================================
        // Help center (Help mode, or the help tab of Tabbed)
        // ============================================================
        (_, Event::SearchQueryChange { text }) if state.help_visible() => {
            next.search_query = text;
        }

        (_, Event::CategoryClick { category }) if state.help_visible() => {
            next.search_query = category;
        }

        (_, Event::ArticleClick { article_id }) if state.help_visible() => {
            let article = context
                .catalog
                .get(&article_id)
                .ok_or(TransitionError::ArticleNotFound(article_id))?;
            next.help.open(article.clone());
        }

        (_, Event::BackToCatalogClick) if state.help_visible() => {
            next.help.back_to_catalog();
        }

        // ============================================================
        // Deferred replies land regardless of mode
        // ============================================================
        (_, Event::ReplyReady { ticket, text }) => {
            deliver_reply(&mut next, ticket, text, now);
        }

        // ============================================================
        // Everything else is a no-op
        // ============================================================
        _ => {}
    }

    // Help navigation only lives while the help surface is on screen
    if !next.help_visible() {
        next.help = Default::default();
    }

    if next != *state {
        effects.push(Effect::NotifyView);
    }

    Ok(TransitionResult::new(next).with_effects(effects))
}

// Helper functions

/// Append a user message and schedule its reply. Blank text is ignored.
fn send_message(
    next: &mut WidgetState,
    context: &WidgetContext,
    text: String,
    now: DateTime<Utc>,
    effects: &mut Vec<Effect>,
) -> bool {
    if text.trim().is_empty() {
        return false;
    }
    next.conversation.push(Message::user(text.clone(), now));
    next.input.clear();
    schedule_reply(next, context, text, effects);
    true
}

fn schedule_reply(
    next: &mut WidgetState,
    context: &WidgetContext,
    prompt: String,
    effects: &mut Vec<Effect>,
) {
    let ticket = ReplyTicket {
        conversation_id: next.conversation.id(),
        seq: next.next_reply_seq,
    };
    next.next_reply_seq += 1;
    next.pending_replies.push_back(PendingReply { ticket, text: None });
    effects.push(Effect::schedule_reply(ticket, prompt, context.reply_delay));
}

/// Swap in `conversation`, abandoning whatever the old one was still owed.
///
/// Cancellation is emitted even with nothing pending so the runtime can
/// release the old conversation's token.
fn replace_conversation(
    next: &mut WidgetState,
    conversation: Conversation,
    effects: &mut Vec<Effect>,
) {
    effects.push(Effect::cancel_replies(next.conversation.id()));
    next.pending_replies.clear();
    next.conversation = conversation;
}

/// Record an arrived reply and flush every reply that is now in order.
///
/// Tickets for another conversation, or ones no longer pending, are dropped.
fn deliver_reply(next: &mut WidgetState, ticket: ReplyTicket, text: String, now: DateTime<Utc>) {
    if ticket.conversation_id != next.conversation.id() {
        return;
    }
    let Some(slot) = next
        .pending_replies
        .iter_mut()
        .find(|p| p.ticket == ticket && p.text.is_none())
    else {
        return;
    };
    slot.text = Some(text);

    while next
        .pending_replies
        .front()
        .is_some_and(|p| p.text.is_some())
    {
        if let Some(PendingReply {
            text: Some(text), ..
        }) = next.pending_replies.pop_front()
        {
            next.conversation.push(Message::assistant(text, now));
        }
    }
}
