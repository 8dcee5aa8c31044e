//! Item catalog loader.

use std::path::Path;

use atb_core::ItemDef;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, parse_ron};

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalog {
    pub items: Vec<ItemDef>,
}

/// Loader for item catalog from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load every item definition in an [`ItemCatalog`] file.
    pub fn load(path: &Path) -> LoadResult<Vec<ItemDef>> {
        let catalog: ItemCatalog = parse_ron(path, "item catalog")?;
        Ok(catalog.items)
    }
}
