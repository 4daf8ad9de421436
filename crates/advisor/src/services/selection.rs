//! Selection persistence in the visitor's session.
//!
//! The selection lives in one named slot holding the JSON-encoded array of
//! product ids, e.g. `"[3,1]"`. Reads fail open: anything that is not a
//! valid encoded array is treated as an empty selection.

use serde_json::Value;
use tower_sessions::Session;

use routine_advisor_core::SelectionSet;

/// Session slot holding the encoded selection.
pub const SELECTED_PRODUCTS_KEY: &str = "selectedProducts";

/// Load the selection, defaulting to empty if absent or unreadable.
pub async fn load_selection(session: &Session) -> SelectionSet {
    let stored = match session.get_value(SELECTED_PRODUCTS_KEY).await {
        Ok(stored) => stored,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read selection from session");
            return SelectionSet::new();
        }
    };

    match stored {
        None => SelectionSet::new(),
        Some(Value::String(raw)) => SelectionSet::decode(&raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Discarding malformed stored selection");
            SelectionSet::new()
        }),
        Some(other) => {
            tracing::warn!(stored = %other, "Discarding stored selection of unexpected type");
            SelectionSet::new()
        }
    }
}

/// Write the full selection back to the session.
///
/// # Errors
///
/// Returns an error if the session store rejects the write.
pub async fn save_selection(
    session: &Session,
    selection: &SelectionSet,
) -> Result<(), tower_sessions::session::Error> {
    session
        .insert_value(SELECTED_PRODUCTS_KEY, Value::String(selection.encode()))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use routine_advisor_core::ProductId;
    use serde_json::json;
    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_absent_slot_is_empty() {
        assert!(load_selection(&session()).await.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let session = session();
        let selection = SelectionSet::from_ids([ProductId::new(3), ProductId::new(1)]);

        save_selection(&session, &selection).await.expect("save");

        assert_eq!(load_selection(&session).await, selection);
        assert_eq!(
            session.get_value(SELECTED_PRODUCTS_KEY).await.expect("read"),
            Some(json!("[3,1]"))
        );
    }

    #[tokio::test]
    async fn test_malformed_encoded_value_is_empty() {
        let session = session();
        session
            .insert_value(SELECTED_PRODUCTS_KEY, json!("{not json"))
            .await
            .expect("insert");

        assert!(load_selection(&session).await.is_empty());
    }

    #[tokio::test]
    async fn test_unexpected_value_type_is_empty() {
        let session = session();
        session
            .insert_value(SELECTED_PRODUCTS_KEY, json!({ "ids": [1, 2] }))
            .await
            .expect("insert");

        assert!(load_selection(&session).await.is_empty());
    }

    #[tokio::test]
    async fn test_saving_empty_selection_overwrites() {
        let session = session();
        save_selection(&session, &SelectionSet::from_ids([ProductId::new(2)]))
            .await
            .expect("save");
        save_selection(&session, &SelectionSet::new())
            .await
            .expect("save");

        assert!(load_selection(&session).await.is_empty());
        assert_eq!(
            session.get_value(SELECTED_PRODUCTS_KEY).await.expect("read"),
            Some(json!("[]"))
        );
    }
}
