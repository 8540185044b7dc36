//! In-process session store.

use std::sync::{PoisonError, RwLock};

use tracing::debug;

use celebconnect_core::{Result, SessionRecord, SessionStore};

/// Session store backed by a single in-memory slot.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: RwLock<Option<SessionRecord>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `record`.
    pub fn with_record(record: SessionRecord) -> Self {
        Self {
            slot: RwLock::new(Some(record)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Result<Option<SessionRecord>> {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        Ok(slot.clone())
    }

    fn set(&self, record: &SessionRecord) -> Result<()> {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(record.clone());
        debug!(role = %record.role, "session stored");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
        Ok(())
    }

    fn update(&self, patch: &dyn Fn(&mut SessionRecord)) -> Result<Option<SessionRecord>> {
        // Hold the write lock across read-modify-write.
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        Ok(slot.as_mut().map(|record| {
            patch(record);
            record.clone()
        }))
    }
}
