//! celebconnect-store - Session store implementations.
//!
//! [`MemorySessionStore`] keeps the identity for the life of the process;
//! [`FileSessionStore`] persists it as a JSON document so a CLI session
//! survives between invocations.

mod file;
mod memory;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;
