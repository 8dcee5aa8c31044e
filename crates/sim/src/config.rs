//! Runner configuration from environment variables.
use std::env;
use std::path::PathBuf;

/// Headless runner settings.
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    /// Directory holding `items.ron`, `skills.ron`, `statuses.ron`,
    /// `roster.ron` and optionally `config.toml`.
    pub data_dir: PathBuf,
    pub seed: u64,
    /// Hard stop for battles that never resolve.
    pub max_ticks: u64,
    /// Where to write end-of-battle combatant snapshots, if anywhere.
    pub snapshot_dir: Option<PathBuf>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/data")),
            seed: Self::DEFAULT_SEED,
            max_ticks: Self::DEFAULT_MAX_TICKS,
            snapshot_dir: None,
        }
    }
}

impl SimConfig {
    pub const DEFAULT_SEED: u64 = 0xC0FFEE;
    pub const DEFAULT_MAX_TICKS: u64 = 100_000;

    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `ATB_DATA_DIR` - content directory (default: the bundled `data/`)
    /// - `ATB_SEED` - battle seed (default: 0xC0FFEE)
    /// - `ATB_MAX_TICKS` - tick limit (default: 100000)
    /// - `ATB_SNAPSHOT_DIR` - snapshot output directory (default: none)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup("ATB_DATA_DIR").filter(|s| !s.is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(seed) = parse(&lookup, "ATB_SEED") {
            config.seed = seed;
        }
        if let Some(max_ticks) = parse::<u64>(&lookup, "ATB_MAX_TICKS") {
            config.max_ticks = max_ticks.max(1);
        }
        config.snapshot_dir = lookup("ATB_SNAPSHOT_DIR")
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        config
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparsable environment value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(SimConfig::from_lookup(lookup(&[])), SimConfig::default());
    }

    #[test]
    fn values_are_read() {
        let config = SimConfig::from_lookup(lookup(&[
            ("ATB_DATA_DIR", "/srv/content"),
            ("ATB_SEED", "42"),
            ("ATB_MAX_TICKS", "0"),
            ("ATB_SNAPSHOT_DIR", "/tmp/snaps"),
        ]));
        assert_eq!(config.data_dir, PathBuf::from("/srv/content"));
        assert_eq!(config.seed, 42);
        assert_eq!(config.max_ticks, 1);
        assert_eq!(config.snapshot_dir, Some(PathBuf::from("/tmp/snaps")));
    }

    #[test]
    fn garbage_falls_back() {
        let config = SimConfig::from_lookup(lookup(&[("ATB_SEED", "lots")]));
        assert_eq!(config.seed, SimConfig::DEFAULT_SEED);
    }
}
