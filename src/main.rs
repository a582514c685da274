//! Support widget demo
//!
//! Mounts a widget with the keyword responder and plays a short scripted
//! visit, printing each published view as a JSON line.

use std::sync::Arc;
use std::time::Duration;
use support_widget::{
    spawn_widget, Event, HelpViewState, KeywordResponder, WidgetConfig, WidgetHandle,
    WidgetMode, WidgetSnapshot, WidgetUpdate,
};
use std::io::Write;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const STEP_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "support_widget=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = WidgetConfig::from_env()?;
    let first_prompt = config
        .prompt_suggestions
        .first()
        .cloned()
        .unwrap_or_else(|| "What services do you offer?".to_string());

    let handle = spawn_widget(config, KeywordResponder)?;
    let printer = tokio::spawn(print_updates(handle.subscribe()));

    tracing::info!("Playing scripted visit");

    handle
        .dispatch(Event::PromptSuggestionClick { text: first_prompt })
        .await?;
    wait(&handle, |s| s.conversation.len() >= 3).await?;

    handle
        .dispatch(Event::InputChange {
            text: "How do I get started?".to_string(),
        })
        .await?;
    handle.dispatch(Event::SubmitMessage).await?;
    wait(&handle, |s| s.conversation.len() >= 5).await?;

    handle.dispatch(Event::CloseClick).await?;
    handle.dispatch(Event::HelpClick).await?;
    handle
        .dispatch(Event::SearchQueryChange {
            text: "dashboard".to_string(),
        })
        .await?;
    let snapshot = wait(&handle, |s| s.search_query == "dashboard").await?;

    if let Some(article) = snapshot.filtered_articles.first() {
        handle
            .dispatch(Event::ArticleClick {
                article_id: article.id.clone(),
            })
            .await?;
        wait(&handle, |s| s.help_view_state == HelpViewState::Article).await?;
        handle.dispatch(Event::BackToCatalogClick).await?;
    }

    handle.dispatch(Event::CloseClick).await?;
    handle.dispatch(Event::MinimizeClick).await?;
    wait(&handle, |s| s.mode == WidgetMode::Minimized).await?;

    tracing::info!("Scripted visit finished");
    printer.abort();
    Ok(())
}

async fn wait(
    handle: &WidgetHandle,
    predicate: impl FnMut(&WidgetSnapshot) -> bool,
) -> Result<Arc<WidgetSnapshot>, Box<dyn std::error::Error>> {
    let snapshot = tokio::time::timeout(STEP_TIMEOUT, handle.wait_for(predicate)).await??;
    Ok(snapshot)
}

async fn print_updates(updates: broadcast::Receiver<WidgetUpdate>) {
    write_updates(updates, std::io::stdout()).await;
}

/// Write each published view as a JSON line until the widget stops
async fn write_updates(mut updates: broadcast::Receiver<WidgetUpdate>, mut out: impl Write) {
    loop {
        match updates.recv().await {
            Ok(WidgetUpdate::Snapshot(snapshot)) => match serde_json::to_string(&snapshot.view) {
                Ok(line) => {
                    if let Err(e) = writeln!(out, "{line}") {
                        tracing::error!(error = %e, "Failed to write view");
                        break;
                    }
                }
                Err(e) => tracing::error!(error = %e, "Failed to serialize view"),
            },
            Ok(WidgetUpdate::Error { message }) => tracing::warn!(%message, "Widget error"),
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "View printer lagged behind");
            }
            Err(RecvError::Closed) => break,
        }
    }
}
