//! Navigator for a terminal: there is no page to leave, so a redirect is
//! recorded and reported to the user instead.

use std::sync::{Mutex, PoisonError};

use tracing::info;

use celebconnect_core::Navigator;

#[derive(Debug)]
pub struct TerminalNavigator {
    location: String,
    redirected: Mutex<Option<String>>,
}

impl TerminalNavigator {
    /// A navigator that reports `location` as the current page.
    pub fn at(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            redirected: Mutex::new(None),
        }
    }

    /// Where the session was sent, if anywhere.
    pub fn redirected_to(&self) -> Option<String> {
        self.redirected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for TerminalNavigator {
    fn current_path(&self) -> String {
        self.location.clone()
    }

    fn navigate_to(&self, path: &str) {
        info!(from = %self.location, to = %path, "redirect");
        *self
            .redirected
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(path.to_string());
    }
}
