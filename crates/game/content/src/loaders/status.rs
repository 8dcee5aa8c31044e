//! Status effect catalog loader.

use std::path::Path;

use atb_core::StatusEffectDef;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, parse_ron};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCatalog {
    pub statuses: Vec<StatusEffectDef>,
}

pub struct StatusLoader;

impl StatusLoader {
    /// Loads status definitions. A periodic effect with no tick interval
    /// would never fire; it is kept but logged.
    pub fn load(path: &Path) -> LoadResult<Vec<StatusEffectDef>> {
        let catalog: StatusCatalog = parse_ron(path, "status catalog")?;
        for status in &catalog.statuses {
            if status.periodic.is_some() && status.tick_interval_ms == 0 {
                tracing::warn!(
                    status = %status.id,
                    name = %status.name,
                    "periodic effect without tick_interval_ms never ticks"
                );
            }
        }
        Ok(catalog.statuses)
    }
}
