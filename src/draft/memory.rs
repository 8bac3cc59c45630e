//! In-memory draft store

use super::{check_namespace, decode, encode, DraftStore, Unusable};
use crate::error::DraftError;
use crate::state::DraftRecord;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

type Slots = Arc<Mutex<HashMap<String, String>>>;

/// Keeps serialized drafts in a map shared between clones.
///
/// Drafts go through the same encoding as the file store, so a clone handed
/// to a controller and a clone kept by the caller see identical data.
#[derive(Debug, Clone)]
pub struct MemoryDraftStore {
    slots: Slots,
    namespace: String,
}

impl MemoryDraftStore {
    pub fn new(namespace: impl Into<String>) -> Result<Self, DraftError> {
        let namespace = namespace.into();
        check_namespace(&namespace)?;
        Ok(Self {
            slots: Slots::default(),
            namespace,
        })
    }

    /// A store over the same map, scoped to another namespace
    pub fn scoped(&self, namespace: impl Into<String>) -> Result<Self, DraftError> {
        let namespace = namespace.into();
        check_namespace(&namespace)?;
        Ok(Self {
            slots: Arc::clone(&self.slots),
            namespace,
        })
    }

    /// Replace the stored bytes directly
    pub fn put_raw(&self, raw: impl Into<String>) {
        self.lock().insert(self.namespace.clone(), raw.into());
    }

    /// Stored bytes, if any
    pub fn raw(&self) -> Option<String> {
        self.lock().get(&self.namespace).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DraftStore for MemoryDraftStore {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn load(&self) -> Option<DraftRecord> {
        let raw = self.raw()?;
        match decode(&raw) {
            Ok(record) => Some(record),
            Err(Unusable::Malformed(e)) => {
                tracing::warn!("Discarding malformed draft '{}': {e}", self.namespace);
                self.lock().remove(&self.namespace);
                None
            }
            Err(Unusable::Inconsistent) => {
                tracing::warn!("Discarding inconsistent draft '{}'", self.namespace);
                self.lock().remove(&self.namespace);
                None
            }
        }
    }

    fn save(&self, record: &DraftRecord) -> Result<(), DraftError> {
        let content = encode(record)?;
        self.lock().insert(self.namespace.clone(), content);
        Ok(())
    }

    fn clear(&self) -> Result<(), DraftError> {
        self.lock().remove(&self.namespace);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AnswerSet;

    fn record(index: usize) -> DraftRecord {
        DraftRecord {
            answers: AnswerSet::default(),
            current_step_index: index,
        }
    }

    #[test]
    fn test_clones_share_storage() {
        let store = MemoryDraftStore::new("shared").unwrap();
        let handle = store.clone();
        store.save(&record(1)).unwrap();
        assert_eq!(handle.load(), Some(record(1)));
    }

    #[test]
    fn test_scoped_stores_are_isolated() {
        let a = MemoryDraftStore::new("a").unwrap();
        let b = a.scoped("b").unwrap();
        a.save(&record(1)).unwrap();
        assert!(b.load().is_none());
        assert!(a.load().is_some());
    }

    #[test]
    fn test_malformed_draft_is_removed() {
        let store = MemoryDraftStore::new("broken").unwrap();
        store.put_raw("[1, 2, 3]");
        assert!(store.load().is_none());
        assert!(store.raw().is_none());
    }

    #[test]
    fn test_saved_numbers_load_back_bit_for_bit() {
        use crate::state::{BasicsAnswers, StepPayload};

        let store = MemoryDraftStore::new("precision").unwrap();
        for acreage in [994141.4334139935, 1.079907802215119e-66, 0.1 + 0.2] {
            let saved = DraftRecord {
                answers: AnswerSet::default().with_step(StepPayload::Basics(BasicsAnswers {
                    acreage: Some(acreage),
                    ..Default::default()
                })),
                current_step_index: 2,
            };
            store.save(&saved).unwrap();
            let loaded = store.load().unwrap();
            let loaded_acreage = loaded.answers.basics.as_ref().and_then(|b| b.acreage);
            assert_eq!(
                loaded_acreage.map(f64::to_bits),
                Some(acreage.to_bits()),
                "{acreage:e}"
            );
            assert_eq!(loaded, saved);
        }
    }

    #[test]
    fn test_clear_without_draft() {
        let store = MemoryDraftStore::new("empty").unwrap();
        assert!(store.clear().is_ok());
    }
}
