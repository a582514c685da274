//! Runtime for executing a widget session
//!
//! Owns the single event loop that applies transitions and carries out
//! their effects. The presentation layer talks to it through a
//! [`WidgetHandle`].

mod executor;

#[cfg(test)]
pub mod testing;

pub use executor::WidgetRuntime;

use crate::config::{ConfigError, WidgetConfig};
use crate::responder::ReplySource;
use crate::state_machine::{Event, WidgetContext, WidgetState};
use crate::view::{self, WidgetSnapshot};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, watch};

const EVENT_CHANNEL_CAPACITY: usize = 64;
const UPDATE_CHANNEL_CAPACITY: usize = 128;

#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("Widget runtime has stopped")]
    Closed,
}

/// Updates pushed to subscribers
#[derive(Debug, Clone)]
pub enum WidgetUpdate {
    /// State changed; full read model attached
    Snapshot(Arc<WidgetSnapshot>),
    /// An event was rejected
    Error { message: String },
}

/// Handle to interact with a running widget
#[derive(Clone)]
pub struct WidgetHandle {
    event_tx: mpsc::Sender<Event>,
    broadcast_tx: broadcast::Sender<WidgetUpdate>,
    snapshot_rx: watch::Receiver<Arc<WidgetSnapshot>>,
}

impl WidgetHandle {
    /// Queue an event for the widget
    pub async fn dispatch(&self, event: Event) -> Result<(), WidgetError> {
        self.event_tx
            .send(event)
            .await
            .map_err(|_| WidgetError::Closed)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WidgetUpdate> {
        self.broadcast_tx.subscribe()
    }

    /// Latest published read model
    pub fn snapshot(&self) -> Arc<WidgetSnapshot> {
        Arc::clone(&self.snapshot_rx.borrow())
    }

    /// Wait until the published read model satisfies `predicate`
    pub async fn wait_for(
        &self,
        mut predicate: impl FnMut(&WidgetSnapshot) -> bool,
    ) -> Result<Arc<WidgetSnapshot>, WidgetError> {
        let mut rx = self.snapshot_rx.clone();
        let snapshot = rx
            .wait_for(|s| predicate(s.as_ref()))
            .await
            .map_err(|_| WidgetError::Closed)?;
        Ok(Arc::clone(&snapshot))
    }
}

/// Validate `config`, mount a widget and start its runtime.
///
/// Must be called from within a tokio runtime.
pub fn spawn_widget<R: ReplySource + 'static>(
    config: WidgetConfig,
    responder: R,
) -> Result<WidgetHandle, ConfigError> {
    let context = config.into_context()?;
    Ok(spawn_with_context(context, responder))
}

pub fn spawn_with_context<R: ReplySource + 'static>(
    context: WidgetContext,
    responder: R,
) -> WidgetHandle {
    let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let (broadcast_tx, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);

    let state = WidgetState::mounted(&context);
    let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(view::snapshot(&state, &context)));

    let runtime = WidgetRuntime::new(
        context,
        state,
        responder,
        event_rx,
        event_tx.downgrade(),
        broadcast_tx.clone(),
        snapshot_tx,
    );
    tokio::spawn(runtime.run());

    WidgetHandle {
        event_tx,
        broadcast_tx,
        snapshot_rx,
    }
}
