//! Session store trait.

use crate::Result;
use crate::types::SessionRecord;

/// A single-slot store for the cached [`SessionRecord`].
///
/// Implementations must serialize writes so a reader never observes a
/// half-written record, even when a logout triggered by one in-flight
/// request races a read from another.
pub trait SessionStore: Send + Sync {
    /// Returns the stored session, if any.
    fn get(&self) -> Result<Option<SessionRecord>>;

    /// Replace the stored session.
    fn set(&self, record: &SessionRecord) -> Result<()>;

    /// Remove the stored session. Clearing an empty store is not an error.
    fn clear(&self) -> Result<()>;

    /// Apply `patch` to the stored session, if one exists.
    ///
    /// Returns the updated record.
    fn update(
        &self,
        patch: &dyn Fn(&mut SessionRecord),
    ) -> Result<Option<SessionRecord>> {
        match self.get()? {
            Some(mut record) => {
                patch(&mut record);
                self.set(&record)?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }
}
