use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, TrackerError};
use crate::models::Catalog;

/// The JSON file holding the catalog. Every save rewrites it whole.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Catalog> {
        let text = fs::read_to_string(&self.path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => TrackerError::StoreNotFound { path: self.path.clone() },
            _ => TrackerError::StoreIo { path: self.path.clone(), source },
        })?;
        let catalog: Catalog = serde_json::from_str(&text)
            .map_err(|source| TrackerError::StoreParse { path: self.path.clone(), source })?;
        debug!(path = %self.path.display(), products = catalog.len(), "loaded catalog");
        Ok(catalog)
    }

    /// Like [`load`](Self::load), but a missing file is an empty catalog.
    pub fn load_or_default(&self) -> Result<Catalog> {
        match self.load() {
            Err(TrackerError::StoreNotFound { .. }) => Ok(Catalog::default()),
            other => other,
        }
    }

    pub fn save(&self, catalog: &Catalog) -> Result<()> {
        let json = serde_json::to_string_pretty(catalog)
            .map_err(|source| TrackerError::StoreParse { path: self.path.clone(), source })?;
        let io_err = |source: std::io::Error| TrackerError::StoreIo { path: self.path.clone(), source };
        let mut file = File::create(&self.path).map_err(io_err)?;
        file.write_all(json.as_bytes()).map_err(io_err)?;
        debug!(path = %self.path.display(), products = catalog.len(), "saved catalog");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Product, Selectors};

    fn sample() -> Catalog {
        let selectors = Selectors {
            price_tag_type: "span".into(),
            price_identifier: "a-price-whole".into(),
            currency_tag_type: "span".into(),
            currency_identifier: "a-price-symbol".into(),
        };
        let mut first = Product::new("Kettle".into(), "https://shop.test/k".into(), selectors.clone(), 30.0);
        first.current_price = 34.99;
        let second = Product::new("Kettle".into(), "https://shop.test/k".into(), selectors, 12.0);
        Catalog { products: vec![first, second] }
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = CatalogStore::new(dir.path().join("products.json"));
        let catalog = sample();

        store.save(&catalog).unwrap();
        assert_eq!(store.load().unwrap(), catalog);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = CatalogStore::new(dir.path().join("absent.json"));

        let err = store.load().unwrap_err();
        assert!(matches!(err, TrackerError::StoreNotFound { .. }));
        assert!(store.load_or_default().unwrap().is_empty());
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        fs::write(&path, "{ not json").unwrap();
        let store = CatalogStore::new(&path);

        assert!(matches!(store.load(), Err(TrackerError::StoreParse { .. })));
        assert!(matches!(store.load_or_default(), Err(TrackerError::StoreParse { .. })));
    }

    #[test]
    fn save_overwrites_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let store = CatalogStore::new(dir.path().join("products.json"));
        store.save(&sample()).unwrap();
        store.save(&Catalog::default()).unwrap();

        assert!(store.load().unwrap().is_empty());
    }
}
