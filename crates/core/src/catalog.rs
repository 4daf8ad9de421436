//! Product catalog and category filtering.
//!
//! The catalog is read-only: it is built once from the catalog document and
//! then shared by every request.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::selection::SelectionSet;
use crate::types::ProductId;

/// Errors raised while building a [`Catalog`].
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The document lists two products with the same id.
    #[error("duplicate product id {0}")]
    DuplicateId(ProductId),
}

/// A product offered by the advisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub category: String,
    pub name: String,
    pub brand: String,
    pub image: String,
    pub description: String,
}

/// Wire shape of the catalog document: `{ "products": [...] }`.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogDocument {
    pub products: Vec<Product>,
}

/// The full product collection, in document order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from a list of products.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] if two products share an id.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }
        }
        Ok(Self { products })
    }

    /// Parse a catalog document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not match [`CatalogDocument`] or
    /// lists duplicate ids.
    pub fn from_json(json: &str) -> Result<Self, CatalogParseError> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        Ok(Self::new(document.products)?)
    }

    /// All products, in document order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Whether a product with this id exists.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Products whose category equals `category` exactly.
    ///
    /// An empty filter matches nothing unless a product has an empty
    /// category.
    pub fn filter<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Product> + 'a {
        self.products.iter().filter(move |p| p.category == category)
    }

    /// Distinct categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.products
            .iter()
            .map(|p| p.category.as_str())
            .filter(|c| seen.insert(*c))
            .collect()
    }

    /// Resolve a selection against the catalog.
    ///
    /// Returns the selected products in catalog order. Ids that are not in
    /// the catalog are skipped.
    #[must_use]
    pub fn resolve(&self, selection: &SelectionSet) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| selection.contains(p.id))
            .collect()
    }
}

/// Errors raised by [`Catalog::from_json`].
#[derive(Debug, thiserror::Error)]
pub enum CatalogParseError {
    /// The document is not valid catalog JSON.
    #[error("invalid catalog document: {0}")]
    Json(#[from] serde_json::Error),

    /// The document is well-formed but inconsistent.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, category: &str) -> Product {
        Product {
            id: ProductId::new(id),
            category: category.to_string(),
            name: format!("Product {id}"),
            brand: "CeraVe".to_string(),
            image: format!("https://img.example/{id}.jpg"),
            description: format!("Description {id}"),
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![
            product(1, "cleanser"),
            product(2, "serum"),
            product(3, "cleanser"),
            product(4, "moisturizer"),
        ])
        .expect("valid catalog")
    }

    #[test]
    fn test_filter_exact_category_match() {
        let catalog = catalog();

        let ids: Vec<i64> = catalog.filter("cleanser").map(|p| p.id.as_i64()).collect();
        assert_eq!(ids, vec![1, 3]);

        let ids: Vec<i64> = catalog.filter("serum").map(|p| p.id.as_i64()).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_filter_is_case_sensitive_and_empty_matches_nothing() {
        let catalog = catalog();
        assert_eq!(catalog.filter("Cleanser").count(), 0);
        assert_eq!(catalog.filter("").count(), 0);
    }

    #[test]
    fn test_categories_first_seen_order() {
        assert_eq!(
            catalog().categories(),
            vec!["cleanser", "serum", "moisturizer"]
        );
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = Catalog::new(vec![product(1, "cleanser"), product(1, "serum")]);
        assert!(matches!(result, Err(CatalogError::DuplicateId(id)) if id.as_i64() == 1));
    }

    #[test]
    fn test_resolve_uses_catalog_order_and_skips_unknown_ids() {
        let catalog = catalog();
        let selection =
            SelectionSet::from_ids([ProductId::new(4), ProductId::new(99), ProductId::new(2)]);

        let names: Vec<&str> = catalog
            .resolve(&selection)
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["Product 2", "Product 4"]);
    }

    #[test]
    fn test_from_json_document_shape() {
        let json = r#"{
            "products": [
                {
                    "id": 1,
                    "category": "cleanser",
                    "name": "Hydrating Facial Cleanser",
                    "brand": "CeraVe",
                    "image": "https://img.example/1.jpg",
                    "description": "Gentle cleanser."
                }
            ]
        }"#;

        let catalog = Catalog::from_json(json).expect("parse catalog");
        assert_eq!(catalog.len(), 1);
        let first = catalog.get(ProductId::new(1)).expect("product 1");
        assert_eq!(first.brand, "CeraVe");
    }

    #[test]
    fn test_from_json_rejects_missing_products_key() {
        assert!(matches!(
            Catalog::from_json(r#"{"items": []}"#),
            Err(CatalogParseError::Json(_))
        ));
    }
}
