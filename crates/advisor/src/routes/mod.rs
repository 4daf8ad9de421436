//! HTTP route handlers for the advisor.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Full page (category selector, grid, sidebar, chat)
//!
//! # Catalog (HTMX fragments)
//! GET  /catalog?category=...      - Product grid for a category
//!
//! # Selection (HTMX fragments)
//! GET  /selection                 - Sidebar list
//! POST /selection/{id}/toggle     - Flip membership (grid + OOB sidebar)
//! POST /selection/{id}/remove     - Remove (grid + OOB sidebar)
//!
//! # Advisor (HTMX fragments)
//! POST /advisor/routine           - Placeholder bubble + pending request
//! POST /advisor/routine/reply     - Routine reply bubble
//! POST /advisor/chat              - User bubble + placeholder + pending request
//! POST /advisor/chat/reply        - Follow-up reply bubble
//! ```

pub mod advisor;
pub mod catalog;
pub mod selection;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the selection routes router.
pub fn selection_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(selection::show))
        .route("/{id}/toggle", post(selection::toggle))
        .route("/{id}/remove", post(selection::remove))
}

/// Create the advisor routes router.
pub fn advisor_routes() -> Router<AppState> {
    Router::new()
        .route("/routine", post(advisor::routine))
        .route("/routine/reply", post(advisor::routine_reply))
        .route("/chat", post(advisor::chat))
        .route("/chat/reply", post(advisor::chat_reply))
}

/// Create all routes for the advisor.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::index))
        .route("/catalog", get(catalog::grid))
        .nest("/selection", selection_routes())
        .nest("/advisor", advisor_routes())
}
