//! Advisor service for routine generation and follow-up chat.
//!
//! Each request runs Idle → Sending → {Success → Rendered, Failure →
//! ErrorRendered}. There is no retry and no cancellation: the caller awaits
//! one [`Outcome`] and renders it as a single bot bubble.

use askama::Template;
use tracing::instrument;

use routine_advisor_core::Product;

use crate::proxy::{ChatMessage, ProxyClient, ProxyResponse};

/// Warning shown instead of calling the proxy when nothing is selected.
pub const EMPTY_SELECTION_WARNING: &str = "Please select at least one product.";

/// System prompt for routine generation.
#[derive(Template)]
#[template(path = "prompts/routine_system.txt")]
struct RoutineSystemPrompt;

/// System prompt for follow-up questions.
#[derive(Template)]
#[template(path = "prompts/follow_up_system.txt")]
struct FollowUpSystemPrompt;

/// Routine instruction, used if the template ever fails to render.
const ROUTINE_SYSTEM_FALLBACK: &str =
    "You are a L'Oréal advisor helping customers build routines using only the products listed.";

/// Follow-up instruction, used if the template ever fails to render.
const FOLLOW_UP_SYSTEM_FALLBACK: &str = "You are a skincare routine assistant specialized in L'Oréal Paris products. Only answer questions related to skincare routines, product ingredients, application steps, and L'Oréal products. Politely decline any unrelated topics, such as politics, history, entertainment, or general trivia, and remind the user to ask about skincare.";

fn render_prompt(template: &impl Template, fallback: &str) -> String {
    // Static templates with no variables cannot fail to render; the fallback
    // carries the same text.
    template
        .render()
        .map(|text| text.trim_end().to_string())
        .unwrap_or_else(|_| fallback.to_string())
}

/// The two kinds of advisor request. Each has its own fixed bubble texts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Routine,
    FollowUp,
}

impl RequestKind {
    /// Placeholder bubble rendered before the request is sent.
    #[must_use]
    pub const fn pending_text(self) -> &'static str {
        match self {
            Self::Routine => "Generating your personalized routine…",
            Self::FollowUp => "Thinking…",
        }
    }

    /// Bubble rendered when the proxy answers with an unknown shape.
    #[must_use]
    pub const fn unrecognized_text(self) -> &'static str {
        match self {
            Self::Routine => "⚠️ Something went wrong with the response format.",
            Self::FollowUp => "⚠️ AI did not return a valid message.",
        }
    }

    /// Bubble rendered when the request fails outright.
    #[must_use]
    pub const fn failure_text(self) -> &'static str {
        match self {
            Self::Routine => "❌ Could not connect to the AI service.",
            Self::FollowUp => "❌ Error processing your message.",
        }
    }
}

/// Result of one advisor request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The proxy answered with text.
    Reply(String),
    /// The proxy answered, but with no recognizable text.
    Unrecognized,
    /// Transport or decode failure.
    Failed,
}

impl Outcome {
    /// Text of the bot bubble for this outcome.
    #[must_use]
    pub fn into_bubble_text(self, kind: RequestKind) -> String {
        match self {
            Self::Reply(text) => text,
            Self::Unrecognized => kind.unrecognized_text().to_string(),
            Self::Failed => kind.failure_text().to_string(),
        }
    }
}

/// Routine generation was requested with nothing selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no products selected")]
pub struct EmptySelection;

/// Build the routine prompt for the selected products.
///
/// # Errors
///
/// Returns [`EmptySelection`] if `products` is empty.
pub fn routine_messages(products: &[&Product]) -> Result<Vec<ChatMessage>, EmptySelection> {
    if products.is_empty() {
        return Err(EmptySelection);
    }

    let listing = products
        .iter()
        .map(|p| format!("- {} by {}: {}", p.name, p.brand, p.description))
        .collect::<Vec<_>>()
        .join("\n\n");

    Ok(vec![
        ChatMessage::system(render_prompt(
            &RoutineSystemPrompt,
            ROUTINE_SYSTEM_FALLBACK,
        )),
        ChatMessage::user(format!(
            "Here are the selected products:\n\n{listing}\n\nPlease generate a full routine using only these."
        )),
    ])
}

/// Build the follow-up prompt for one shopper message.
///
/// Returns `None` when the trimmed text is empty.
#[must_use]
pub fn follow_up_messages(text: &str) -> Option<Vec<ChatMessage>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    Some(vec![
        ChatMessage::system(render_prompt(
            &FollowUpSystemPrompt,
            FOLLOW_UP_SYSTEM_FALLBACK,
        )),
        ChatMessage::user(text),
    ])
}

/// Advisor service for sending prompts to the proxy.
pub struct AdvisorService<'a> {
    proxy: &'a ProxyClient,
}

impl<'a> AdvisorService<'a> {
    /// Create a new advisor service.
    #[must_use]
    pub const fn new(proxy: &'a ProxyClient) -> Self {
        Self { proxy }
    }

    /// Ask for a routine built from the selected products.
    ///
    /// # Errors
    ///
    /// Returns [`EmptySelection`] without calling the proxy if `products` is
    /// empty.
    pub async fn generate_routine(&self, products: &[&Product]) -> Result<Outcome, EmptySelection> {
        let messages = routine_messages(products)?;
        Ok(self.send(RequestKind::Routine, &messages).await)
    }

    /// Ask a free-form follow-up question.
    ///
    /// Returns `None` without calling the proxy when the trimmed text is
    /// empty.
    pub async fn follow_up(&self, text: &str) -> Option<Outcome> {
        let messages = follow_up_messages(text)?;
        Some(self.send(RequestKind::FollowUp, &messages).await)
    }

    #[instrument(skip(self, messages))]
    async fn send(&self, kind: RequestKind, messages: &[ChatMessage]) -> Outcome {
        match self.proxy.complete(messages).await {
            Ok(ProxyResponse::Unrecognized) => {
                tracing::warn!(?kind, "Proxy response had no reply text");
                Outcome::Unrecognized
            }
            Ok(response) => response.into_text().map_or(Outcome::Unrecognized, Outcome::Reply),
            Err(e) => {
                tracing::error!(?kind, error = %e, "Advisor request failed");
                Outcome::Failed
            }
        }
    }
}
