//! Battle configuration loader.

use std::path::Path;

use atb_core::BattleConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for battle configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a [`BattleConfig`] from a TOML file.
    ///
    /// Keys left out keep their defaults, so a file may override a single
    /// field.
    pub fn load(path: &Path) -> LoadResult<BattleConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<BattleConfig> {
        let mut config: BattleConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.tick_ms == 0 {
            tracing::warn!("tick_ms = 0 in config, using 1");
            config.tick_ms = 1;
        }
        if !(config.timer_threshold.is_finite() && config.timer_threshold > 0.0) {
            anyhow::bail!(
                "timer_threshold must be a positive number, got {}",
                config.timer_threshold
            );
        }
        if config.escape.min > config.escape.max {
            anyhow::bail!(
                "escape.min ({}) is above escape.max ({})",
                config.escape.min,
                config.escape.max
            );
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = ConfigLoader::parse(
            r#"
            tick_ms = 100
            ai_reaction_delay_ms = 0

            [escape]
            base = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(config.tick_ms, 100);
        assert_eq!(config.ai_reaction_delay_ms, 0);
        assert_eq!(config.escape.base, 0.5);
        assert_eq!(config.escape.max, BattleConfig::default().escape.max);
        assert_eq!(config.atb_rate, BattleConfig::DEFAULT_ATB_RATE);
    }

    #[test]
    fn zero_tick_is_raised_to_one() {
        let config = ConfigLoader::parse("tick_ms = 0").unwrap();
        assert_eq!(config.tick_ms, 1);
    }

    #[test]
    fn inverted_escape_bounds_are_rejected() {
        let err = ConfigLoader::parse("[escape]\nmin = 0.9\nmax = 0.1").unwrap_err();
        assert!(err.to_string().contains("escape.min"));
    }

    #[test]
    fn unknown_types_are_reported() {
        assert!(ConfigLoader::parse("tick_ms = \"fast\"").is_err());
    }
}
