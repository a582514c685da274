//! Widget runtime executor

use super::WidgetUpdate;
use crate::conversation::ConversationId;
use crate::responder::ReplySource;
use crate::state_machine::{
    transition, Effect, Event, ReplyTicket, TransitionError, WidgetContext, WidgetState,
};
use crate::view::{self, WidgetSnapshot};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};
use tokio_util::sync::CancellationToken;

/// Event loop for one mounted widget, generic over the reply backend
pub struct WidgetRuntime<R>
where
    R: ReplySource + 'static,
{
    context: WidgetContext,
    state: WidgetState,
    responder: Arc<R>,
    event_rx: mpsc::Receiver<Event>,
    /// Weak so the loop ends once every handle is dropped
    event_tx: mpsc::WeakSender<Event>,
    broadcast_tx: broadcast::Sender<WidgetUpdate>,
    snapshot_tx: watch::Sender<Arc<WidgetSnapshot>>,
    /// One token per conversation with replies in flight
    reply_tokens: HashMap<ConversationId, CancellationToken>,
}

impl<R> WidgetRuntime<R>
where
    R: ReplySource + 'static,
{
    pub fn new(
        context: WidgetContext,
        state: WidgetState,
        responder: R,
        event_rx: mpsc::Receiver<Event>,
        event_tx: mpsc::WeakSender<Event>,
        broadcast_tx: broadcast::Sender<WidgetUpdate>,
        snapshot_tx: watch::Sender<Arc<WidgetSnapshot>>,
    ) -> Self {
        Self {
            context,
            state,
            responder: Arc::new(responder),
            event_rx,
            event_tx,
            broadcast_tx,
            snapshot_tx,
            reply_tokens: HashMap::new(),
        }
    }

    pub async fn run(mut self) {
        tracing::info!(
            session_id = %self.context.session_id,
            mode = ?self.state.mode,
            "Starting widget runtime"
        );

        while let Some(event) = self.event_rx.recv().await {
            if let Err(e) = self.process_event(event) {
                tracing::warn!(session_id = %self.context.session_id, error = %e, "Event rejected");
                let _ = self.broadcast_tx.send(WidgetUpdate::Error {
                    message: e.to_string(),
                });
            }
        }

        for (_, token) in self.reply_tokens.drain() {
            token.cancel();
        }
        tracing::info!(session_id = %self.context.session_id, "Widget runtime stopped");
    }

    fn process_event(&mut self, event: Event) -> Result<(), TransitionError> {
        let reply_ticket = match &event {
            Event::ReplyReady { ticket, .. } => Some(*ticket),
            _ => None,
        };
        let result = transition(&self.state, &self.context, event, Utc::now())?;

        if let Some(ticket) = reply_ticket.filter(|_| result.is_noop()) {
            let reason = dropped_reply_reason(ticket, self.state.conversation.id());
            tracing::debug!(
                conversation_id = %ticket.conversation_id,
                seq = ticket.seq,
                reason,
                "Dropped reply"
            );
        }

        let old_state = std::mem::replace(&mut self.state, result.new_state);
        if old_state.mode != self.state.mode {
            tracing::info!(
                session_id = %self.context.session_id,
                from = ?old_state.mode,
                to = ?self.state.mode,
                "Mode changed"
            );
        }

        for effect in result.effects {
            self.execute_effect(effect);
        }

        // Nothing owed to the current conversation: its token has no tasks left
        if !self.state.awaiting_reply() {
            if let Some(token) = self.reply_tokens.remove(&self.state.conversation.id()) {
                token.cancel();
            }
        }
        Ok(())
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::ScheduleReply {
                ticket,
                prompt,
                delay,
            } => {
                let token = self
                    .reply_tokens
                    .entry(ticket.conversation_id)
                    .or_default()
                    .clone();
                let responder = Arc::clone(&self.responder);
                let event_tx = self.event_tx.clone();

                tokio::spawn(async move {
                    tokio::select! {
                        () = token.cancelled() => {
                            tracing::debug!(
                                conversation_id = %ticket.conversation_id,
                                seq = ticket.seq,
                                "Scheduled reply cancelled"
                            );
                        }
                        text = async {
                            tokio::time::sleep(delay).await;
                            responder.reply(&prompt).await
                        } => {
                            if let Some(tx) = event_tx.upgrade() {
                                let _ = tx.send(Event::ReplyReady { ticket, text }).await;
                            }
                        }
                    }
                });
            }

            Effect::CancelReplies { conversation_id } => {
                if let Some(token) = self.reply_tokens.remove(&conversation_id) {
                    tracing::debug!(%conversation_id, "Cancelling pending replies");
                    token.cancel();
                }
            }

            Effect::NotifyView => {
                let snapshot = Arc::new(view::snapshot(&self.state, &self.context));
                self.snapshot_tx.send_replace(Arc::clone(&snapshot));
                // No subscribers is fine
                let _ = self.broadcast_tx.send(WidgetUpdate::Snapshot(snapshot));
            }
        }
    }
}

fn dropped_reply_reason(ticket: ReplyTicket, current: ConversationId) -> &'static str {
    if ticket.conversation_id == current {
        "already delivered"
    } else {
        "abandoned conversation"
    }
}
