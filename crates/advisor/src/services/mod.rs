//! Business logic services for the advisor.
//!
//! # Services
//!
//! - `advisor` - Prompt building and proxy request outcomes
//! - `catalog` - Loading the catalog document at startup
//! - `selection` - Persisting the selection in the visitor's session

pub mod advisor;
pub mod catalog;
pub mod selection;

pub use advisor::{
    AdvisorService, EMPTY_SELECTION_WARNING, EmptySelection, Outcome, RequestKind,
    follow_up_messages, routine_messages,
};
pub use catalog::{CatalogLoadError, load_catalog};
pub use selection::{SELECTED_PRODUCTS_KEY, load_selection, save_selection};
