//! File-based cache for analysis payloads (JSON on disk).
//!
//! Why cache?
//! - Each analysis call is a full remote round trip; identical content
//!   under different paths should only ever be analyzed once.
//! - Re-running the pipeline on an unchanged tree should be O(1) per file.
//!
//! Key: SHA-256 of the file content, independent of path.
//! Layout: `<root>/<kind>/<fingerprint>.json`, one namespace per kind.
//! Entries never expire; stale-cache correctness is the caller's problem.
//!
//! Reads swallow corruption (a bad entry is just a miss); writes propagate
//! their errors.

use std::path::PathBuf;

use serde::{Serialize, de::DeserializeOwned};
use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::warn;

use crate::errors::CacheError;
use crate::types::AnalysisKind;

/// Content-addressed store for per-kind analysis payloads.
#[derive(Debug, Clone)]
pub struct AnalysisCache {
    root: PathBuf,
}

impl AnalysisCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Deterministic content fingerprint (lowercase SHA-256 hex).
    ///
    /// Identical content always yields the identical key, regardless of the
    /// path it was ingested under.
    pub fn fingerprint(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Returns the stored payload for `(fingerprint, kind)`, or `None` if
    /// absent. Unreadable or corrupt entries are logged and treated as a
    /// miss, triggering recomputation upstream.
    pub async fn get<T: DeserializeOwned>(
        &self,
        fingerprint: &str,
        kind: AnalysisKind,
    ) -> Option<T> {
        let path = self.entry_path(fingerprint, kind);
        let data = match fs::read(&path).await {
            Ok(d) => d,
            Err(_) => return None,
        };
        match serde_json::from_slice(&data) {
            Ok(payload) => Some(payload),
            Err(err) => {
                warn!(%err, path = %path.display(), "corrupt cache entry treated as miss");
                None
            }
        }
    }

    /// Persists `payload`, overwriting any prior entry for the same key.
    /// Creates the kind namespace on first use.
    ///
    /// # Errors
    /// Serialization and I/O failures propagate; a cache that cannot be
    /// written to is a local fault worth failing on.
    pub async fn put<T: Serialize>(
        &self,
        fingerprint: &str,
        kind: AnalysisKind,
        payload: &T,
    ) -> Result<(), CacheError> {
        let path = self.entry_path(fingerprint, kind);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).await?;
        }
        let json = serde_json::to_vec_pretty(payload)?;
        fs::write(&path, json).await?;
        Ok(())
    }

    fn entry_path(&self, fingerprint: &str, kind: AnalysisKind) -> PathBuf {
        self.root
            .join(kind.as_str())
            .join(format!("{fingerprint}.json"))
    }
}
