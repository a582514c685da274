//! Simulated assistant replies
//!
//! `generate` is a pure keyword responder. The runtime talks to it through
//! the `ReplySource` trait so a real backend can be plugged in instead.

use async_trait::async_trait;
use std::sync::Arc;

const SERVICES_KEYWORDS: &[&str] = &["service", "offer"];

const GETTING_STARTED_KEYWORDS: &[&str] = &[
    "getting started",
    "get started",
    "set up",
    "setup",
    "start",
    "begin",
];

const SERVICES_REPLY: &str = "We're a full-service digital marketing agency. Our core services are \
Web Design, Digital Marketing and Brand Strategy, and we tailor each engagement to your goals. \
Which of these would you like to hear more about?";

const GETTING_STARTED_REPLY: &str = "Getting started is easy! Book a free consultation and we'll \
review your current online presence, agree on goals and put together a plan. You can also browse \
the Help Center for step-by-step guides.";

/// Produce the assistant reply for a user message.
///
/// Rules are checked in order and the first match wins: services, then
/// getting started, then a fallback that quotes the message back.
pub fn generate(user_text: &str) -> String {
    let lowered = user_text.to_lowercase();

    if contains_any(&lowered, SERVICES_KEYWORDS) {
        return SERVICES_REPLY.to_string();
    }
    if contains_any(&lowered, GETTING_STARTED_KEYWORDS) {
        return GETTING_STARTED_REPLY.to_string();
    }

    format!(
        "Thanks for your question about \"{user_text}\". I'm here to help! We offer \
comprehensive solutions for your business needs. Would you like more specific information \
about any particular area?"
    )
}

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| haystack.contains(k))
}

/// Anything that can answer a user message
#[async_trait]
pub trait ReplySource: Send + Sync {
    async fn reply(&self, user_text: &str) -> String;
}

/// Deterministic local responder backed by [`generate`]
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordResponder;

#[async_trait]
impl ReplySource for KeywordResponder {
    async fn reply(&self, user_text: &str) -> String {
        generate(user_text)
    }
}

#[async_trait]
impl<T: ReplySource + ?Sized> ReplySource for Arc<T> {
    async fn reply(&self, user_text: &str) -> String {
        (**self).reply(user_text).await
    }
}
