//! Loading the product catalog at startup.

use std::time::Duration;

use tracing::instrument;

use routine_advisor_core::{Catalog, CatalogParseError};

use crate::config::CatalogSource;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur while loading the catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogLoadError {
    /// Reading the catalog file failed.
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// Fetching the catalog over HTTP failed.
    #[error("failed to fetch catalog: {0}")]
    Http(#[from] reqwest::Error),

    /// The document is not a valid catalog.
    #[error(transparent)]
    Parse(#[from] CatalogParseError),
}

/// Load the catalog document once.
///
/// # Errors
///
/// Returns an error if the document cannot be read or is not a valid
/// catalog.
#[instrument(skip(source), fields(source = %source))]
pub async fn load_catalog(source: &CatalogSource) -> Result<Catalog, CatalogLoadError> {
    let json = match source {
        CatalogSource::File(path) => tokio::fs::read_to_string(path).await?,
        CatalogSource::Remote(url) => {
            reqwest::Client::builder()
                .timeout(FETCH_TIMEOUT)
                .build()?
                .get(url.clone())
                .send()
                .await?
                .error_for_status()?
                .text()
                .await?
        }
    };

    let catalog = Catalog::from_json(&json)?;
    tracing::info!(
        products = catalog.len(),
        categories = catalog.categories().len(),
        "Catalog loaded"
    );
    Ok(catalog)
}
