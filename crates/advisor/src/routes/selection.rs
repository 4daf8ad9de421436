//! Selection route handlers.
//!
//! Toggling a card and removing a sidebar row go through the same path:
//! load the stored selection, mutate it, save it, then re-render the grid
//! (for the posted category) and, out of band, the sidebar.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
};
use tower_sessions::Session;
use tracing::instrument;

use routine_advisor_core::{Catalog, ProductId, SelectionSet};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::routes::catalog::{CategoryFilter, ProductGridView};
use crate::services::{load_selection, save_selection};
use crate::state::AppState;

/// Sidebar row display data for templates.
#[derive(Clone)]
pub struct SelectionItemView {
    pub id: ProductId,
    pub name: String,
}

/// Sidebar display data for templates.
#[derive(Clone)]
pub struct SelectionListView {
    pub items: Vec<SelectionItemView>,
}

impl SelectionListView {
    /// One row per selected product that exists in the catalog.
    #[must_use]
    pub fn build(catalog: &Catalog, selection: &SelectionSet) -> Self {
        let items = catalog
            .resolve(selection)
            .into_iter()
            .map(|product| SelectionItemView {
                id: product.id,
                name: product.name.clone(),
            })
            .collect();
        Self { items }
    }
}

/// Sidebar fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/selection_list.html")]
pub struct SelectionListTemplate {
    pub selection: SelectionListView,
}

/// Grid fragment plus out-of-band sidebar (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/selection_update.html")]
pub struct SelectionUpdateTemplate {
    pub grid: ProductGridView,
    pub selection: SelectionListView,
}

/// Display the sidebar (HTMX).
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> SelectionListTemplate {
    let selection = load_selection(&session).await;
    SelectionListTemplate {
        selection: SelectionListView::build(state.catalog(), &selection),
    }
}

/// Flip a product's membership (HTMX, card click).
#[instrument(skip(state, session))]
pub async fn toggle(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ProductId>,
    Form(filter): Form<CategoryFilter>,
) -> Result<SelectionUpdateTemplate> {
    update(&state, &session, id, &filter.category, |selection| {
        let selected = selection.toggle(id);
        tracing::info!(product_id = %id, selected, "Selection toggled");
    })
    .await
}

/// Remove a product from the selection (HTMX, sidebar button).
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ProductId>,
    Form(filter): Form<CategoryFilter>,
) -> Result<SelectionUpdateTemplate> {
    update(&state, &session, id, &filter.category, |selection| {
        if selection.remove(id) {
            tracing::info!(product_id = %id, "Selection removed");
        }
    })
    .await
}

async fn update(
    state: &AppState,
    session: &Session,
    id: ProductId,
    category: &str,
    mutate: impl FnOnce(&mut SelectionSet),
) -> Result<SelectionUpdateTemplate> {
    let catalog = state.catalog();
    if !catalog.contains(id) {
        return Err(AppError::UnknownProduct(id));
    }

    let mut selection = load_selection(session).await;
    mutate(&mut selection);
    save_selection(session, &selection).await?;

    let product_id = id.to_string();
    add_breadcrumb(
        "selection",
        "Selection changed",
        Some(&[("product_id", product_id.as_str())]),
    );

    Ok(SelectionUpdateTemplate {
        grid: ProductGridView::build(catalog, category, &selection),
        selection: SelectionListView::build(catalog, &selection),
    })
}

#[cfg(test)]
mod tests {
    use routine_advisor_core::Product;

    use super::*;

    fn catalog() -> Catalog {
        let product = |id: i64, name: &str| Product {
            id: ProductId::new(id),
            category: "moisturizer".to_string(),
            name: name.to_string(),
            brand: "La Roche-Posay".to_string(),
            image: String::new(),
            description: String::new(),
        };
        Catalog::new(vec![product(1, "Toleriane"), product(2, "Cicaplast")]).expect("catalog")
    }

    #[test]
    fn test_sidebar_lists_known_products_in_catalog_order() {
        let selection =
            SelectionSet::from_ids([ProductId::new(2), ProductId::new(42), ProductId::new(1)]);
        let view = SelectionListView::build(&catalog(), &selection);

        let names: Vec<&str> = view.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Toleriane", "Cicaplast"]);
    }

    #[test]
    fn test_update_fragment_swaps_sidebar_out_of_band() {
        let catalog = catalog();
        let selection = SelectionSet::from_ids([ProductId::new(2)]);
        let html = SelectionUpdateTemplate {
            grid: ProductGridView::build(&catalog, "moisturizer", &selection),
            selection: SelectionListView::build(&catalog, &selection),
        }
        .render()
        .expect("render");

        assert!(html.contains(r#"id="selected-products-list" hx-swap-oob="innerHTML""#));
        assert!(html.contains(r#"hx-post="/selection/2/remove""#));
        assert!(html.contains("Cicaplast"));
    }
}
