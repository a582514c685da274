//! Effects produced by state transitions

use super::state::ReplyTicket;
use crate::conversation::ConversationId;
use std::time::Duration;

/// Effects to be executed after a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Generate a reply to `prompt` and deliver it after `delay`
    ScheduleReply {
        ticket: ReplyTicket,
        prompt: String,
        delay: Duration,
    },

    /// Abandon every reply still owed to a conversation
    CancelReplies { conversation_id: ConversationId },

    /// Publish the new read model to the view layer
    NotifyView,
}

impl Effect {
    pub fn schedule_reply(ticket: ReplyTicket, prompt: impl Into<String>, delay: Duration) -> Self {
        Effect::ScheduleReply {
            ticket,
            prompt: prompt.into(),
            delay,
        }
    }

    pub fn cancel_replies(conversation_id: ConversationId) -> Self {
        Effect::CancelReplies { conversation_id }
    }
}
