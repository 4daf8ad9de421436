//! Advisor route handlers.
//!
//! Both advisor flows are two HTMX round trips so the transcript updates
//! before the proxy answers:
//!
//! 1. The first request appends the immediate bubbles (the user's text, the
//!    placeholder) plus a hidden form that fires on load.
//! 2. That form posts to the `/reply` endpoint, which calls the proxy and
//!    replaces the hidden form with the reply bubble. The placeholder stays.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use routine_advisor_core::BubbleSender;

use crate::error::add_breadcrumb;
use crate::services::{
    AdvisorService, EMPTY_SELECTION_WARNING, EmptySelection, RequestKind, load_selection,
};
use crate::state::AppState;

const ROUTINE_REPLY_PATH: &str = "/advisor/routine/reply";
const CHAT_REPLY_PATH: &str = "/advisor/chat/reply";

/// Chat bubble display data for templates.
///
/// Text is kept as plain lines; the template escapes each line and joins
/// them with `<br>`.
#[derive(Clone)]
pub struct BubbleView {
    pub sender: &'static str,
    pub lines: Vec<String>,
}

impl BubbleView {
    #[must_use]
    pub fn new(sender: BubbleSender, text: &str) -> Self {
        Self {
            sender: sender.css_class(),
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    #[must_use]
    pub fn bot(text: &str) -> Self {
        Self::new(BubbleSender::Bot, text)
    }

    #[must_use]
    pub fn user(text: &str) -> Self {
        Self::new(BubbleSender::User, text)
    }
}

/// Hidden form that posts the follow-up request once it is swapped in.
#[derive(Clone)]
pub struct PendingRequest {
    pub action: &'static str,
    pub message: String,
}

/// Transcript fragment appended to the chat window (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/chat_fragment.html")]
pub struct ChatFragmentTemplate {
    pub bubbles: Vec<BubbleView>,
    pub pending: Option<PendingRequest>,
    pub clear_input: bool,
}

impl ChatFragmentTemplate {
    fn reply(text: &str) -> Self {
        Self {
            bubbles: vec![BubbleView::bot(text)],
            pending: None,
            clear_input: false,
        }
    }
}

/// Blocking warning dialog (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/alert.html")]
pub struct AlertTemplate {
    pub message: &'static str,
}

/// Follow-up chat form data.
#[derive(Debug, Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    pub message: String,
}

/// Retarget the response into the alert slot instead of the transcript.
fn empty_selection_warning() -> Response {
    tracing::info!("Routine requested with empty selection");
    (
        AppendHeaders([
            ("HX-Retarget", "#advisor-alert"),
            ("HX-Reswap", "innerHTML"),
        ]),
        AlertTemplate {
            message: EMPTY_SELECTION_WARNING,
        },
    )
        .into_response()
}

/// Start routine generation (HTMX).
///
/// Refuses with a warning dialog when nothing is selected; no request is
/// sent to the proxy in that case.
#[instrument(skip(state, session))]
pub async fn routine(State(state): State<AppState>, session: Session) -> Response {
    let selection = load_selection(&session).await;
    if state.catalog().resolve(&selection).is_empty() {
        return empty_selection_warning();
    }

    add_breadcrumb("advisor", "Routine requested", None);

    ChatFragmentTemplate {
        bubbles: vec![BubbleView::bot(RequestKind::Routine.pending_text())],
        pending: Some(PendingRequest {
            action: ROUTINE_REPLY_PATH,
            message: String::new(),
        }),
        clear_input: false,
    }
    .into_response()
}

/// Run routine generation and render the reply (HTMX).
#[instrument(skip(state, session))]
pub async fn routine_reply(State(state): State<AppState>, session: Session) -> Response {
    let selection = load_selection(&session).await;
    let products = state.catalog().resolve(&selection);

    match AdvisorService::new(state.proxy())
        .generate_routine(&products)
        .await
    {
        Ok(outcome) => {
            ChatFragmentTemplate::reply(&outcome.into_bubble_text(RequestKind::Routine))
                .into_response()
        }
        // Selection emptied between the two round trips.
        Err(EmptySelection) => empty_selection_warning(),
    }
}

/// Accept a follow-up message (HTMX).
///
/// Blank input is ignored with `204 No Content`, which HTMX does not swap.
#[instrument(skip(form))]
pub async fn chat(Form(form): Form<ChatForm>) -> Response {
    let text = form.message.trim();
    if text.is_empty() {
        return StatusCode::NO_CONTENT.into_response();
    }

    add_breadcrumb("advisor", "Follow-up asked", None);

    ChatFragmentTemplate {
        bubbles: vec![
            BubbleView::user(text),
            BubbleView::bot(RequestKind::FollowUp.pending_text()),
        ],
        pending: Some(PendingRequest {
            action: CHAT_REPLY_PATH,
            message: text.to_string(),
        }),
        clear_input: true,
    }
    .into_response()
}

/// Run the follow-up request and render the reply (HTMX).
#[instrument(skip(state, form))]
pub async fn chat_reply(State(state): State<AppState>, Form(form): Form<ChatForm>) -> Response {
    match AdvisorService::new(state.proxy())
        .follow_up(&form.message)
        .await
    {
        Some(outcome) => {
            ChatFragmentTemplate::reply(&outcome.into_bubble_text(RequestKind::FollowUp))
                .into_response()
        }
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
