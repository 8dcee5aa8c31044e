//! Skill catalog loader.

use std::path::Path;

use atb_core::SkillDef;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, parse_ron};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCatalog {
    pub skills: Vec<SkillDef>,
}

pub struct SkillLoader;

impl SkillLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<SkillDef>> {
        let catalog: SkillCatalog = parse_ron(path, "skill catalog")?;
        for skill in &catalog.skills {
            if skill.timer_cost < 0.0 {
                anyhow::bail!("{} ({}) has a negative timer_cost", skill.id, skill.name);
            }
        }
        Ok(catalog.skills)
    }
}
