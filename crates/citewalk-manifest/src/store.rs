//! Manifest storage: trait + file-backed implementation.
//!
//! Each run is kept as one pretty-printed JSON file under the day it was
//! created, so a store directory doubles as a browsable run log.

use std::fs;
use std::path::{Path, PathBuf};

use crate::{CorpusManifest, ManifestId};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("No manifest with id {0}")]
    NotFound(ManifestId),

    #[error("Manifest {0} failed its integrity check")]
    IntegrityViolation(ManifestId),

    #[error("Cannot store a manifest without a content hash; finalize it first")]
    NotFinalized,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persistence backend for run manifests.
pub trait ManifestStore {
    /// Store a finalized manifest and return where it landed.
    fn save(&self, manifest: &CorpusManifest) -> Result<PathBuf, StoreError>;

    /// Retrieve a manifest by id, verifying integrity.
    fn get(&self, id: ManifestId) -> Result<CorpusManifest, StoreError>;

    /// Every recorded run, newest first.
    ///
    /// Manifests are returned as stored; callers decide what to do with ones
    /// that fail [`CorpusManifest::verify_integrity`].
    fn list(&self) -> Result<Vec<CorpusManifest>, StoreError>;
}

/// Directory-backed manifest store.
///
/// ```text
/// {root}/
///   2026/
///     10/
///       19/
///         {manifest_id}.json
/// ```
pub struct FileManifestStore {
    root: PathBuf,
}

impl FileManifestStore {
    /// Open a store at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn manifest_path(&self, manifest: &CorpusManifest) -> PathBuf {
        self.root
            .join(manifest.created_at.format("%Y/%m/%d").to_string())
            .join(format!("{}.json", manifest.id))
    }

    /// All `.json` files below the root, in no particular order.
    fn manifest_files(&self) -> Result<Vec<PathBuf>, StoreError> {
        let mut files = Vec::new();
        let mut pending = vec![self.root.clone()];
        while let Some(dir) = pending.pop() {
            for entry in fs::read_dir(&dir)? {
                let path = entry?.path();
                if path.is_dir() {
                    pending.push(path);
                } else if path.extension().is_some_and(|ext| ext == "json") {
                    files.push(path);
                }
            }
        }
        Ok(files)
    }

    fn read(path: &Path) -> Result<CorpusManifest, StoreError> {
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }
}

impl ManifestStore for FileManifestStore {
    fn save(&self, manifest: &CorpusManifest) -> Result<PathBuf, StoreError> {
        if manifest.content_hash.is_none() {
            return Err(StoreError::NotFinalized);
        }

        let path = self.manifest_path(manifest);
        if let Some(day) = path.parent() {
            fs::create_dir_all(day)?;
        }
        fs::write(&path, serde_json::to_string_pretty(manifest)?)?;

        tracing::debug!(
            manifest_id = %manifest.id,
            path = %path.display(),
            "Manifest saved"
        );
        Ok(path)
    }

    fn get(&self, id: ManifestId) -> Result<CorpusManifest, StoreError> {
        let filename = format!("{id}.json");
        let path = self
            .manifest_files()?
            .into_iter()
            .find(|p| p.file_name().is_some_and(|n| n == filename.as_str()))
            .ok_or(StoreError::NotFound(id))?;

        let manifest = Self::read(&path)?;
        if !manifest.verify_integrity() {
            return Err(StoreError::IntegrityViolation(id));
        }
        Ok(manifest)
    }

    fn list(&self) -> Result<Vec<CorpusManifest>, StoreError> {
        let mut manifests = self
            .manifest_files()?
            .iter()
            .map(|path| Self::read(path))
            .collect::<Result<Vec<_>, _>>()?;
        manifests.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        tracing::debug!(
            root = %self.root.display(),
            count = manifests.len(),
            "Manifests listed"
        );
        Ok(manifests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{sample_corpus, sample_stats};
    use citewalk_core::WalkConfig;

    fn finalized(seed: u64) -> CorpusManifest {
        CorpusManifest::new(sample_stats(), WalkConfig::default(), seed, 2, &sample_corpus())
            .finalize()
    }

    #[test]
    fn test_save_and_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileManifestStore::new(dir.path()).unwrap();
        let manifest = finalized(42);

        let path = store.save(&manifest).unwrap();
        assert!(path.starts_with(store.root()));
        assert!(path.exists());

        let loaded = store.get(manifest.id).unwrap();
        assert_eq!(loaded, manifest);
    }

    #[test]
    fn test_tampered_manifest_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileManifestStore::new(dir.path()).unwrap();
        let manifest = finalized(42);
        let path = store.save(&manifest).unwrap();

        let mut tampered = FileManifestStore::read(&path).unwrap();
        tampered.seed = 43;
        fs::write(&path, serde_json::to_string_pretty(&tampered).unwrap()).unwrap();

        assert!(matches!(
            store.get(manifest.id),
            Err(StoreError::IntegrityViolation(_))
        ));
        // Listing still shows the run so it can be inspected.
        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert!(!listed[0].verify_integrity());
    }

    #[test]
    fn test_save_rejects_unfinalized() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileManifestStore::new(dir.path()).unwrap();
        let manifest =
            CorpusManifest::new(sample_stats(), WalkConfig::default(), 1, 2, &sample_corpus());

        assert!(matches!(store.save(&manifest), Err(StoreError::NotFinalized)));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_get_unknown_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileManifestStore::new(dir.path()).unwrap();
        assert!(matches!(
            store.get(ManifestId::new()),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_list_returns_newest_first_across_days() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileManifestStore::new(dir.path()).unwrap();

        let older = finalized(1);
        let newer = CorpusManifest {
            created_at: older.created_at + chrono::Duration::days(2),
            content_hash: None,
            ..finalized(2)
        }
        .finalize();

        let older_path = store.save(&older).unwrap();
        let newer_path = store.save(&newer).unwrap();
        assert_ne!(older_path.parent(), newer_path.parent());

        let ids: Vec<ManifestId> = store.list().unwrap().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
    }
}
