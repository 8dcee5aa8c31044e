//! File-based combatant snapshot store.

use std::fs;
use std::path::{Path, PathBuf};

use atb_core::{BattleError, CombatantId, CombatantSnapshot, ErrorSeverity};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl BattleError for StoreError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Io(_) => ErrorSeverity::Recoverable,
            Self::Serialization(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Io(_) => "STORE_IO",
            Self::Serialization(_) => "STORE_SERIALIZATION",
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Stores combatant snapshots as individual bincode files keyed by id.
///
/// # File Format
///
/// `snapshot_{id}.bin`, one [`CombatantSnapshot`] per file. Writes go to a
/// temporary file first and are renamed into place.
pub struct SnapshotStore {
    base_dir: PathBuf,
}

impl SnapshotStore {
    /// Opens (and creates, if needed) a store rooted at `base_dir`.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn snapshot_path(&self, id: CombatantId) -> PathBuf {
        self.base_dir.join(format!("snapshot_{}.bin", id.0))
    }

    pub fn save(&self, snapshot: &CombatantSnapshot) -> Result<()> {
        let path = self.snapshot_path(snapshot.id);
        let temp_path = path.with_extension("bin.tmp");

        let bytes =
            bincode::serialize(snapshot).map_err(|e| StoreError::Serialization(e.to_string()))?;
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!(combatant = %snapshot.id, path = %path.display(), "snapshot saved");
        Ok(())
    }

    /// Returns `None` if no snapshot exists for `id`.
    pub fn load(&self, id: CombatantId) -> Result<Option<CombatantSnapshot>> {
        let path = self.snapshot_path(id);
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let snapshot: CombatantSnapshot =
            bincode::deserialize(&bytes).map_err(|e| StoreError::Serialization(e.to_string()))?;

        tracing::debug!(combatant = %id, path = %path.display(), "snapshot loaded");
        Ok(Some(snapshot))
    }

    pub fn exists(&self, id: CombatantId) -> bool {
        self.snapshot_path(id).exists()
    }

    pub fn delete(&self, id: CombatantId) -> Result<()> {
        let path = self.snapshot_path(id);
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!(combatant = %id, "snapshot deleted");
        }
        Ok(())
    }

    /// Ids with a stored snapshot, ascending.
    pub fn list_ids(&self) -> Result<Vec<CombatantId>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(id) = filename
                    .strip_prefix("snapshot_")
                    .and_then(|s| s.strip_suffix(".bin"))
                && let Ok(id) = id.parse::<u32>()
            {
                ids.push(CombatantId(id));
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }
}
