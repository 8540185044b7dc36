//! Logout command implementation.

use anyhow::{Context, Result};

use crate::cli::GlobalArgs;
use crate::output;
use crate::session::Runtime;

pub async fn run(global: &GlobalArgs) -> Result<()> {
    let runtime = Runtime::open(global, None)?;

    runtime
        .accounts
        .logout()
        .await
        .context("Failed to clear local session")?;

    output::success("Logged out");
    if let Some(login) = runtime.navigator.redirected_to() {
        output::field("Login", &login);
    }
    Ok(())
}
