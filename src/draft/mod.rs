//! Draft persistence
//!
//! At most one draft per namespace. Stores hold no business logic: they
//! overwrite on save, forget on clear, and treat anything they cannot read
//! back as no draft at all.

mod file;
mod memory;

pub use file::FileDraftStore;
pub use memory::MemoryDraftStore;

use crate::error::DraftError;
use crate::state::DraftRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Namespace used when none is configured
pub const DEFAULT_NAMESPACE: &str = "project-application-draft";

/// Persistence surface for the in-progress draft
pub trait DraftStore: Send {
    /// Namespace this store is scoped to
    fn namespace(&self) -> &str;

    /// The last saved draft. Missing, malformed or inconsistent data yields
    /// `None`; malformed data is removed so the next start is clean.
    fn load(&self) -> Option<DraftRecord>;

    /// Overwrite the stored draft
    fn save(&self, record: &DraftRecord) -> Result<(), DraftError>;

    /// Remove the stored draft. Removing nothing is not an error.
    fn clear(&self) -> Result<(), DraftError>;
}

/// Serialized form of a stored draft
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DraftEnvelope {
    saved_at: DateTime<Utc>,
    draft: DraftRecord,
}

fn encode(record: &DraftRecord) -> Result<String, DraftError> {
    let envelope = DraftEnvelope {
        saved_at: Utc::now(),
        draft: record.clone(),
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Why stored bytes could not be used as a draft
#[derive(Debug)]
enum Unusable {
    Malformed(serde_json::Error),
    Inconsistent,
}

fn decode(raw: &str) -> Result<DraftRecord, Unusable> {
    let envelope: DraftEnvelope = serde_json::from_str(raw).map_err(Unusable::Malformed)?;
    if !envelope.draft.is_consistent() {
        return Err(Unusable::Inconsistent);
    }
    tracing::debug!(
        "Decoded draft saved at {} (step {})",
        envelope.saved_at,
        envelope.draft.current_step_index
    );
    Ok(envelope.draft)
}

/// Namespaces double as file names, so keep them to a safe character set
fn check_namespace(namespace: &str) -> Result<(), DraftError> {
    let valid = !namespace.is_empty()
        && namespace
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && !namespace.starts_with('.');
    if valid {
        Ok(())
    } else {
        Err(DraftError::InvalidNamespace(namespace.to_string()))
    }
}
