//! Navigation port.

/// Where the embedding application is, and how to send it elsewhere.
///
/// The gateway uses this to pick a login page after a terminal auth failure
/// and to perform the redirect.
pub trait Navigator: Send + Sync {
    /// Returns the current location path (e.g. `/agent/dashboard`).
    fn current_path(&self) -> String;

    /// Perform a full navigation to `path`.
    fn navigate_to(&self, path: &str);
}
