//! Core widget state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions:
//! the runtime feeds events in, swaps in the returned state and executes
//! the returned effects.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{
    HelpNavigation, HelpView, HelpViewState, ModeSet, PendingReply, ReplyTicket, Tab,
    WidgetContext, WidgetMode, WidgetState,
};
pub use transition::{transition, TransitionError, TransitionResult};
