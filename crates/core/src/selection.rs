//! The shopper's selection of product ids.

use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// An ordered set of selected product ids.
///
/// Ids are kept in insertion order and never repeat. Only membership is
/// meaningful; order just keeps the persisted value stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ProductId>", into = "Vec<ProductId>")]
pub struct SelectionSet {
    ids: Vec<ProductId>,
}

impl SelectionSet {
    /// An empty selection.
    #[must_use]
    pub const fn new() -> Self {
        Self { ids: Vec::new() }
    }

    /// Build a selection from ids, dropping repeats.
    #[must_use]
    pub fn from_ids(ids: impl IntoIterator<Item = ProductId>) -> Self {
        let mut set = Self::new();
        for id in ids {
            set.insert(id);
        }
        set
    }

    /// Whether `id` is selected.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.ids.contains(&id)
    }

    /// Add `id`. Returns `false` if it was already selected.
    pub fn insert(&mut self, id: ProductId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Remove `id`. Returns `false` if it was not selected.
    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|existing| *existing != id);
        self.ids.len() != before
    }

    /// Flip membership of `id`. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, id: ProductId) -> bool {
        if self.remove(id) {
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    /// Selected ids in insertion order.
    #[must_use]
    pub fn ids(&self) -> &[ProductId] {
        &self.ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Encode as a JSON array of ids, e.g. `[3,1]`.
    #[must_use]
    pub fn encode(&self) -> String {
        // A Vec<i64> always serializes.
        serde_json::to_string(&self.ids).unwrap_or_else(|_| "[]".to_string())
    }

    /// Decode a stored JSON value.
    ///
    /// `null` decodes to the empty set and repeated ids are collapsed.
    ///
    /// # Errors
    ///
    /// Returns an error if `raw` is not a JSON array of integers or `null`.
    pub fn decode(raw: &str) -> Result<Self, serde_json::Error> {
        let ids: Option<Self> = serde_json::from_str(raw)?;
        Ok(ids.unwrap_or_default())
    }
}

impl From<Vec<ProductId>> for SelectionSet {
    fn from(ids: Vec<ProductId>) -> Self {
        Self::from_ids(ids)
    }
}

impl From<SelectionSet> for Vec<ProductId> {
    fn from(set: SelectionSet) -> Self {
        set.ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P1: ProductId = ProductId::new(1);
    const P2: ProductId = ProductId::new(2);

    #[test]
    fn test_toggle_parity() {
        for toggles in 0..7 {
            let mut set = SelectionSet::new();
            for _ in 0..toggles {
                set.toggle(P1);
            }
            assert_eq!(set.contains(P1), toggles % 2 == 1, "after {toggles} toggles");
            assert!(set.len() <= 1);
        }
    }

    #[test]
    fn test_toggle_does_not_affect_other_ids() {
        let mut set = SelectionSet::from_ids([P2]);
        assert!(set.toggle(P1));
        assert!(!set.toggle(P1));
        assert_eq!(set.ids(), &[P2]);
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut set = SelectionSet::new();
        assert!(set.insert(P1));
        assert!(!set.insert(P1));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_remove_and_toggle_off_converge() {
        let mut via_remove = SelectionSet::from_ids([P1, P2]);
        let mut via_toggle = via_remove.clone();

        assert!(via_remove.remove(P1));
        assert!(!via_toggle.toggle(P1));

        assert_eq!(via_remove, via_toggle);
        assert_eq!(via_remove.encode(), via_toggle.encode());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut set = SelectionSet::from_ids([P2]);
        assert!(!set.remove(P1));
        assert_eq!(set.ids(), &[P2]);
    }

    #[test]
    fn test_encode_keeps_insertion_order() {
        let set = SelectionSet::from_ids([P2, P1]);
        assert_eq!(set.encode(), "[2,1]");
    }

    #[test]
    fn test_decode_collapses_repeats() {
        let set = SelectionSet::decode("[1,2,1]").expect("decode");
        assert_eq!(set.ids(), &[P1, P2]);
    }

    #[test]
    fn test_decode_null_is_empty() {
        assert!(SelectionSet::decode("null").expect("decode").is_empty());
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(SelectionSet::decode("not json").is_err());
        assert!(SelectionSet::decode(r#"["a","b"]"#).is_err());
        assert!(SelectionSet::decode(r#"{"ids":[1]}"#).is_err());
    }
}
