//! Mock reply sources for testing
//!
//! These mocks let runtime tests control reply text and latency.

use crate::responder::ReplySource;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

// ============================================================================
// Recording Responder
// ============================================================================

/// Echoes prompts back and remembers every prompt it was asked about
#[derive(Default)]
pub struct RecordingResponder {
    prompts: Mutex<Vec<String>>,
}

impl RecordingResponder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prompts received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReplySource for RecordingResponder {
    async fn reply(&self, user_text: &str) -> String {
        self.prompts.lock().unwrap().push(user_text.to_string());
        format!("echo: {user_text}")
    }
}

// ============================================================================
// Delayed Responder (for ordering tests)
// ============================================================================

/// Adds extra per-prompt latency on top of the widget's reply delay
#[derive(Default)]
pub struct DelayedResponder {
    delays: HashMap<String, Duration>,
}

impl DelayedResponder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, prompt: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(prompt.into(), delay);
        self
    }
}

#[async_trait]
impl ReplySource for DelayedResponder {
    async fn reply(&self, user_text: &str) -> String {
        if let Some(delay) = self.delays.get(user_text) {
            tokio::time::sleep(*delay).await;
        }
        format!("re: {user_text}")
    }
}
