use std::path::Path;

use serde::Deserialize;
use tracing::info;
use velo_catalog::{Catalog, CatalogError, PriceTable, RestrictionTable};

use crate::app_config::CatalogConfig;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid catalog: {0}")]
    Invalid(#[from] CatalogError),
}

// On-disk shape of a catalog snapshot
#[derive(Debug, Deserialize)]
struct CatalogFile {
    prices: PriceTable,
    #[serde(default)]
    restrictions: RestrictionTable,
}

/// Parse and check a JSON catalog snapshot.
pub fn parse_catalog(json: &str) -> Result<Catalog, StoreError> {
    let file: CatalogFile = serde_json::from_str(json)?;
    Ok(Catalog::new(file.prices, file.restrictions)?)
}

pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog, StoreError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let catalog = parse_catalog(&json)?;
    info!("Loaded catalog from {} ({} prices)", path.display(), catalog.prices().len());
    Ok(catalog)
}

/// The configured catalog file, or the built-in catalog when none is set.
pub fn load_configured_catalog(config: &CatalogConfig) -> Result<Catalog, StoreError> {
    match &config.path {
        Some(path) => load_catalog(path),
        None => {
            info!("No catalog path configured, using built-in catalog");
            Ok(Catalog::default())
        }
    }
}
