//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

#![allow(clippy::collapsible_if)]

use super::state::*;
use super::transition::*;
use super::*;
use crate::config::WidgetConfig;
use crate::conversation::{Message, Sender};
use chrono::Utc;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context(mode_set: ModeSet) -> WidgetContext {
    WidgetConfig {
        mode_set,
        ..WidgetConfig::default()
    }
    .into_context()
    .unwrap()
}

fn scheduled_tickets(effects: &[Effect]) -> Vec<ReplyTicket> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::ScheduleReply { ticket, .. } => Some(*ticket),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_mode() -> impl Strategy<Value = WidgetMode> {
    prop_oneof![
        Just(WidgetMode::Minimized),
        Just(WidgetMode::Collapsed),
        Just(WidgetMode::Expanded),
        Just(WidgetMode::Help),
        Just(WidgetMode::Chat),
        Just(WidgetMode::Tabbed),
    ]
}

fn arb_mode_set() -> impl Strategy<Value = ModeSet> {
    prop_oneof![Just(ModeSet::Classic), Just(ModeSet::Tabbed)]
}

fn arb_tab() -> impl Strategy<Value = Tab> {
    prop_oneof![Just(Tab::Chat), Just(Tab::Help)]
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("   ".to_string()),
        "[a-zA-Z ?]{1,30}",
    ]
}

fn arb_state() -> impl Strategy<Value = WidgetState> {
    (
        arb_mode(),
        arb_tab(),
        arb_text(),
        "[a-z]{0,6}",
        proptest::option::of(0usize..4),
        0u64..4,
    )
        .prop_map(|(mode, tab, input, search_query, article, owed)| {
            let ctx = test_context(ModeSet::Classic);
            let mut state = WidgetState::in_mode(mode);
            state.active_tab = tab;
            state.input = input;
            state.search_query = search_query;
            for seq in 0..owed {
                state
                    .conversation
                    .push(Message::user(format!("question {seq}"), Utc::now()));
                state.pending_replies.push_back(PendingReply {
                    ticket: ReplyTicket {
                        conversation_id: state.conversation.id(),
                        seq,
                    },
                    text: None,
                });
            }
            state.next_reply_seq = owed;
            if let Some(index) = article {
                if state.help_visible() {
                    state.help.open(ctx.catalog.articles()[index].clone());
                }
            }
            state
        })
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        Just(Event::Mount),
        Just(Event::MinimizeClick),
        Just(Event::ExpandClick),
        Just(Event::CloseClick),
        Just(Event::HelpClick),
        Just(Event::BackClick),
        Just(Event::InputClick),
        arb_text().prop_map(|text| Event::InputChange { text }),
        Just(Event::SubmitMessage),
        arb_text().prop_map(|text| Event::PromptSuggestionClick { text }),
        "[a-z]{0,6}".prop_map(|text| Event::SearchQueryChange { text }),
        "(Getting started|Troubleshooting|Nope)".prop_map(|category| Event::CategoryClick { category }),
        "(1|2|3|4|99)".prop_map(|article_id| Event::ArticleClick { article_id }),
        Just(Event::BackToCatalogClick),
        arb_tab().prop_map(|tab| Event::TabSelect { tab }),
        Just(Event::StartChatClick),
        "(past-1|past-2|missing)".prop_map(|conversation_id| Event::PastChatClick { conversation_id }),
        (0u64..3, 0u64..5, "[a-z]{1,10}").prop_map(|(conv, seq, text)| Event::ReplyReady {
            ticket: ReplyTicket {
                conversation_id: crate::conversation::ConversationId(conv),
                seq,
            },
            text,
        }),
    ]
}

// ============================================================================
// Oracles
// ============================================================================

fn is_valid_state(state: &WidgetState) -> bool {
    // Article view only while the help surface is showing
    if state.help.view_state() == HelpViewState::Article && !state.help_visible() {
        return false;
    }

    // Owed replies belong to the current conversation, in send order
    let current = state.conversation.id();
    let mut previous: Option<u64> = None;
    for pending in &state.pending_replies {
        if pending.ticket.conversation_id != current || pending.ticket.seq >= state.next_reply_seq {
            return false;
        }
        if let Some(prev) = previous {
            if pending.ticket.seq <= prev {
                return false;
            }
        }
        previous = Some(pending.ticket.seq);
    }

    // An arrived reply at the head would already have been flushed
    !state
        .pending_replies
        .front()
        .is_some_and(|p| p.text.is_some())
}

/// Expected mode after a successful transition, written independently of
/// the transition function
fn expected_mode(state: &WidgetState, ctx: &WidgetContext, event: &Event) -> WidgetMode {
    use WidgetMode::{Chat, Collapsed, Help, Minimized, Tabbed};

    match (state.mode, event) {
        (_, Event::Mount) => ctx.initial_mode,
        (Minimized, Event::ExpandClick) => Collapsed,
        (Collapsed, Event::MinimizeClick) => Minimized,
        (Collapsed, Event::InputClick) => Chat,
        (Collapsed, Event::SubmitMessage) if !state.input.trim().is_empty() => Chat,
        (Collapsed, Event::PromptSuggestionClick { text }) if !text.trim().is_empty() => Chat,
        (Collapsed, Event::HelpClick) => Help,
        (Chat, Event::BackClick) => ctx.mode_set.chat_back_target(),
        (Tabbed, Event::StartChatClick | Event::PastChatClick { .. }) => Chat,
        (mode, Event::CloseClick) if mode != Minimized => Collapsed,
        (mode, _) => mode,
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Invariant 1: Valid state after any sequence of transitions
    #[test]
    fn prop_transitions_preserve_validity(
        mode_set in arb_mode_set(),
        events in proptest::collection::vec(arb_event(), 0..30)
    ) {
        let ctx = test_context(mode_set);
        let mut state = WidgetState::mounted(&ctx);

        for event in events {
            match transition(&state, &ctx, event, Utc::now()) {
                Ok(result) => {
                    state = result.new_state;
                    prop_assert!(is_valid_state(&state), "Invalid state: {:?}", state);
                }
                Err(e) => {
                    prop_assert!(matches!(
                        e,
                        TransitionError::ArticleNotFound(_) | TransitionError::ConversationNotFound(_)
                    ));
                }
            }
        }
    }

    // Invariant 2: Every (mode, event) pair lands in the tabled mode
    #[test]
    fn prop_modes_follow_transition_table(
        mode_set in arb_mode_set(),
        state in arb_state(),
        event in arb_event()
    ) {
        let ctx = test_context(mode_set);
        let expected = expected_mode(&state, &ctx, &event);
        if let Ok(result) = transition(&state, &ctx, event.clone(), Utc::now()) {
            prop_assert_eq!(
                result.new_state.mode,
                expected,
                "{:?} + {:?}",
                state.mode,
                event
            );
        }
    }

    // Invariant 3: NotifyView is emitted exactly when something changed
    #[test]
    fn prop_view_notified_iff_state_changes(state in arb_state(), event in arb_event()) {
        let ctx = test_context(ModeSet::Classic);
        if let Ok(result) = transition(&state, &ctx, event, Utc::now()) {
            let notified = result.effects.contains(&Effect::NotifyView);
            prop_assert_eq!(notified, result.new_state != state);
        }
    }

    // Invariant 4: Failed transitions only come from unknown ids
    #[test]
    fn prop_errors_only_for_unknown_ids(state in arb_state(), event in arb_event()) {
        let ctx = test_context(ModeSet::Tabbed);
        if let Err(e) = transition(&state, &ctx, event.clone(), Utc::now()) {
            let unknown_id = match &event {
                Event::ArticleClick { article_id } => ctx.catalog.get(article_id).is_none(),
                Event::PastChatClick { conversation_id } => {
                    ctx.find_past_conversation(conversation_id).is_none()
                }
                _ => false,
            };
            prop_assert!(unknown_id, "Unexpected error {:?} for {:?}", e, event);
        }
    }

    // Invariant 5: Blank submissions never touch the conversation
    #[test]
    fn prop_blank_submit_is_noop(state in arb_state(), blank in "[ \t\n]{0,5}") {
        let ctx = test_context(ModeSet::Classic);
        let mut state = state;
        state.input = blank;
        let result = transition(&state, &ctx, Event::SubmitMessage, Utc::now()).unwrap();
        prop_assert_eq!(result.new_state.conversation.len(), state.conversation.len());
        prop_assert!(scheduled_tickets(&result.effects).is_empty());
    }

    // Invariant 6: N sends, each answered before the next, alternate user/assistant
    #[test]
    fn prop_interleaved_sends_alternate(texts in proptest::collection::vec("[a-z]{1,12}", 1..8)) {
        let ctx = test_context(ModeSet::Classic);
        let mut state = WidgetState::in_mode(WidgetMode::Chat);

        for text in &texts {
            state.input = text.clone();
            let result = transition(&state, &ctx, Event::SubmitMessage, Utc::now()).unwrap();
            let tickets = scheduled_tickets(&result.effects);
            prop_assert_eq!(tickets.len(), 1);
            state = transition(
                &result.new_state,
                &ctx,
                Event::ReplyReady { ticket: tickets[0], text: format!("re: {text}") },
                Utc::now(),
            )
            .unwrap()
            .new_state;
        }

        prop_assert_eq!(state.conversation.len(), texts.len() * 2);
        for (i, message) in state.conversation.messages().iter().enumerate() {
            let expected = if i % 2 == 0 { Sender::User } else { Sender::Assistant };
            prop_assert_eq!(message.sender, expected);
        }
    }

    // Invariant 7: Batched sends get all replies, in send order, whatever the arrival order
    #[test]
    fn prop_replies_delivered_in_send_order(
        (texts, order) in proptest::collection::vec("[a-z]{1,12}", 1..8).prop_flat_map(|texts| {
            let indices: Vec<usize> = (0..texts.len()).collect();
            (Just(texts), Just(indices).prop_shuffle())
        })
    ) {
        let ctx = test_context(ModeSet::Classic);
        let mut state = WidgetState::in_mode(WidgetMode::Chat);
        let mut tickets = vec![];

        for text in &texts {
            state.input = text.clone();
            let result = transition(&state, &ctx, Event::SubmitMessage, Utc::now()).unwrap();
            tickets.extend(scheduled_tickets(&result.effects));
            state = result.new_state;
        }

        for index in order {
            state = transition(
                &state,
                &ctx,
                Event::ReplyReady { ticket: tickets[index], text: format!("re: {}", texts[index]) },
                Utc::now(),
            )
            .unwrap()
            .new_state;
        }

        prop_assert_eq!(state.conversation.len(), texts.len() * 2);
        prop_assert!(!state.awaiting_reply());
        let replies: Vec<&str> = state
            .conversation
            .messages()
            .iter()
            .filter(|m| m.sender == Sender::Assistant)
            .map(|m| m.text.as_str())
            .collect();
        let expected: Vec<String> = texts.iter().map(|t| format!("re: {t}")).collect();
        prop_assert_eq!(replies, expected.iter().map(String::as_str).collect::<Vec<_>>());
    }
}
