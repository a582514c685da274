//! Widget configuration
//!
//! Seed data (articles, prompt suggestions, past conversations) and
//! tunables live here rather than in the state machine. Defaults match the
//! marketing site; `from_env` layers environment overrides on top.

use crate::catalog::{ArticleCatalog, CatalogError, HelpArticle};
use crate::conversation::{PastConversation, SeedMessage, Sender};
use crate::state_machine::state::{ModeSet, WidgetContext, WidgetMode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Simulated assistant latency
pub const DEFAULT_REPLY_DELAY_MS: u64 = 1000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub assistant_name: String,
    pub greeting: String,
    /// Label shown on the minimized pill
    pub teaser: String,
    pub prompt_suggestions: Vec<String>,
    pub reply_delay_ms: u64,
    pub mode_set: ModeSet,
    /// Overrides the mode set's default starting mode
    pub initial_mode: Option<WidgetMode>,
    pub articles: Vec<HelpArticle>,
    pub past_conversations: Vec<PastConversation>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            assistant_name: "Digi Labs Assistant".to_string(),
            greeting: "Hi there! I'm the Digi Labs assistant. How can I help you today?"
                .to_string(),
            teaser: "Ask me anything...".to_string(),
            prompt_suggestions: vec![
                "What services do you offer?".to_string(),
                "How do I get started?".to_string(),
                "Can I see examples of your work?".to_string(),
                "How much does a website cost?".to_string(),
            ],
            reply_delay_ms: DEFAULT_REPLY_DELAY_MS,
            mode_set: ModeSet::Classic,
            initial_mode: None,
            articles: default_articles(),
            past_conversations: default_past_conversations(),
        }
    }
}

impl WidgetConfig {
    /// Defaults overridden by `WIDGET_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`WidgetConfig::from_env`] with an injectable variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(name) = lookup("WIDGET_ASSISTANT_NAME") {
            config.assistant_name = name;
        }

        if let Some(raw) = lookup("WIDGET_REPLY_DELAY_MS") {
            config.reply_delay_ms =
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: "WIDGET_REPLY_DELAY_MS",
                        value: raw.clone(),
                    })?;
        }

        if let Some(raw) = lookup("WIDGET_MODE_SET") {
            config.mode_set = parse_enum("WIDGET_MODE_SET", &raw)?;
        }

        if let Some(raw) = lookup("WIDGET_INITIAL_MODE") {
            config.initial_mode = Some(parse_enum("WIDGET_INITIAL_MODE", &raw)?);
        }

        if let Some(path) = lookup("WIDGET_CATALOG_PATH") {
            tracing::info!(path = %path, "Loading help catalog from file");
            config.articles = ArticleCatalog::from_path(&path)?.articles().to_vec();
        }

        Ok(config)
    }

    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }

    /// Validate seed data and freeze it into a transition context
    pub fn into_context(self) -> Result<WidgetContext, ConfigError> {
        let catalog = ArticleCatalog::new(self.articles)?;
        let initial_mode = self
            .initial_mode
            .unwrap_or_else(|| self.mode_set.default_initial_mode());

        Ok(WidgetContext {
            session_id: uuid::Uuid::new_v4().to_string(),
            mode_set: self.mode_set,
            initial_mode,
            assistant_name: self.assistant_name,
            greeting: self.greeting,
            teaser: self.teaser,
            prompt_suggestions: self.prompt_suggestions,
            reply_delay: Duration::from_millis(self.reply_delay_ms),
            catalog: Arc::new(catalog),
            past_conversations: Arc::new(self.past_conversations),
        })
    }
}

/// Parse a snake_case enum name through its serde representation
fn parse_enum<T: DeserializeOwned>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    let normalized = raw.trim().to_lowercase();
    serde_json::from_value(serde_json::Value::String(normalized)).map_err(|_| {
        ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
        }
    })
}

fn default_articles() -> Vec<HelpArticle> {
    vec![
        HelpArticle::new(
            "1",
            "Getting Started with Digi Labs",
            "Getting started",
            "Learn the basics of working with Digi Labs to grow your business. This guide walks \
you through your onboarding call, sharing access to your existing accounts, and what to expect \
in the first month of your engagement.",
        ),
        HelpArticle::new(
            "2",
            "Customizing Your Dashboard",
            "Getting started",
            "Personalize your reporting dashboard to show the metrics that matter most to your \
business. You can add, remove, and rearrange widgets to create the perfect view of your data.",
        ),
        HelpArticle::new(
            "3",
            "Managing Contact Properties",
            "Troubleshooting",
            "Learn how to create, edit, and manage contact properties. Contact properties help \
you store and organize important information about your contacts.",
        ),
        HelpArticle::new(
            "4",
            "Email Marketing Best Practices",
            "Best Practices",
            "Discover proven strategies for creating effective email campaigns that engage your \
audience and drive results. From subject lines to call-to-actions, we cover it all.",
        ),
    ]
}

fn default_past_conversations() -> Vec<PastConversation> {
    let seed = |sender: Sender, text: &str| SeedMessage {
        sender,
        text: text.to_string(),
    };
    vec![
        PastConversation {
            id: "past-1".to_string(),
            title: "Website redesign timeline".to_string(),
            messages: vec![
                seed(Sender::User, "How long does a website redesign take?"),
                seed(
                    Sender::Assistant,
                    "Most redesigns take six to ten weeks from kickoff to launch.",
                ),
            ],
        },
        PastConversation {
            id: "past-2".to_string(),
            title: "SEO audit".to_string(),
            messages: vec![
                seed(Sender::User, "Do you run SEO audits?"),
                seed(
                    Sender::Assistant,
                    "Yes. An audit is the first step of every digital marketing engagement.",
                ),
            ],
        },
    ]
}
