//! Catalog route handlers.
//!
//! The full page and the product grid fragment. The grid is re-rendered on
//! every category change and after every selection change so the selected
//! highlight always matches the stored selection.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use routine_advisor_core::{Catalog, ProductId, SelectionSet};

use crate::routes::selection::SelectionListView;
use crate::services::load_selection;
use crate::state::AppState;

/// Category filter carried by `GET` query strings and HTMX form posts.
///
/// A missing value is the empty filter, which matches no products.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryFilter {
    #[serde(default)]
    pub category: String,
}

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    pub image: String,
    pub description: String,
    pub selected: bool,
}

/// Product grid display data for templates.
#[derive(Clone)]
pub struct ProductGridView {
    pub cards: Vec<ProductCardView>,
}

impl ProductGridView {
    /// Cards for `category`, highlighted according to `selection`.
    #[must_use]
    pub fn build(catalog: &Catalog, category: &str, selection: &SelectionSet) -> Self {
        let cards = catalog
            .filter(category)
            .map(|product| ProductCardView {
                id: product.id,
                name: product.name.clone(),
                brand: product.brand.clone(),
                image: product.image.clone(),
                description: product.description.clone(),
                selected: selection.contains(product.id),
            })
            .collect();
        Self { cards }
    }
}

/// Category selector option.
#[derive(Clone)]
pub struct CategoryOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

fn category_options(catalog: &Catalog, current: &str) -> Vec<CategoryOption> {
    catalog
        .categories()
        .into_iter()
        .map(|category| CategoryOption {
            value: category.to_string(),
            label: category_label(category),
            selected: category == current,
        })
        .collect()
}

/// "sunscreen" -> "Sunscreen"
fn category_label(category: &str) -> String {
    let mut chars = category.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Full page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub categories: Vec<CategoryOption>,
    pub has_category: bool,
    pub grid: ProductGridView,
    pub selection: SelectionListView,
}

/// Product grid fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub grid: ProductGridView,
}

/// Display the full page.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(filter): Query<CategoryFilter>,
) -> IndexTemplate {
    let catalog = state.catalog();
    let selection = load_selection(&session).await;

    IndexTemplate {
        categories: category_options(catalog, &filter.category),
        has_category: catalog.categories().contains(&filter.category.as_str()),
        grid: ProductGridView::build(catalog, &filter.category, &selection),
        selection: SelectionListView::build(catalog, &selection),
    }
}

/// Product grid for a category (HTMX).
#[instrument(skip(state, session))]
pub async fn grid(
    State(state): State<AppState>,
    session: Session,
    Query(filter): Query<CategoryFilter>,
) -> ProductGridTemplate {
    let selection = load_selection(&session).await;

    ProductGridTemplate {
        grid: ProductGridView::build(state.catalog(), &filter.category, &selection),
    }
}
