//! JSON file draft store

use super::{check_namespace, decode, encode, DraftStore, Unusable};
use crate::error::DraftError;
use crate::state::DraftRecord;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Stores the draft as `<dir>/<namespace>.json`
#[derive(Debug, Clone)]
pub struct FileDraftStore {
    dir: PathBuf,
    namespace: String,
}

impl FileDraftStore {
    pub fn new(dir: impl Into<PathBuf>, namespace: impl Into<String>) -> Result<Self, DraftError> {
        let namespace = namespace.into();
        check_namespace(&namespace)?;
        Ok(Self {
            dir: dir.into(),
            namespace,
        })
    }

    /// Path of the draft file
    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.namespace))
    }

    fn discard(&self, path: &Path) {
        if let Err(e) = fs::remove_file(path) {
            if e.kind() != ErrorKind::NotFound {
                tracing::warn!("Failed to remove unusable draft {}: {e}", path.display());
            }
        }
    }
}

impl DraftStore for FileDraftStore {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn load(&self) -> Option<DraftRecord> {
        let path = self.path();
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Failed to read draft {}: {e}", path.display());
                return None;
            }
        };
        let raw = match String::from_utf8(bytes) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Discarding non-UTF-8 draft '{}': {e}", self.namespace);
                self.discard(&path);
                return None;
            }
        };

        match decode(&raw) {
            Ok(record) => {
                tracing::info!(
                    "Restored draft '{}' at step {}",
                    self.namespace,
                    record.current_step_index
                );
                Some(record)
            }
            Err(Unusable::Malformed(e)) => {
                tracing::warn!("Discarding malformed draft '{}': {e}", self.namespace);
                self.discard(&path);
                None
            }
            Err(Unusable::Inconsistent) => {
                tracing::warn!("Discarding inconsistent draft '{}'", self.namespace);
                self.discard(&path);
                None
            }
        }
    }

    fn save(&self, record: &DraftRecord) -> Result<(), DraftError> {
        fs::create_dir_all(&self.dir)?;
        let content = encode(record)?;
        // Write then rename so a crash never leaves a half-written draft
        let tmp = self.dir.join(format!(".{}.json.tmp", self.namespace));
        fs::write(&tmp, content)?;
        fs::rename(&tmp, self.path())?;
        tracing::debug!(
            "Saved draft '{}' at step {}",
            self.namespace,
            record.current_step_index
        );
        Ok(())
    }

    fn clear(&self) -> Result<(), DraftError> {
        match fs::remove_file(self.path()) {
            Ok(()) => {
                tracing::debug!("Cleared draft '{}'", self.namespace);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
