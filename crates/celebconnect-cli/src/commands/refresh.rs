//! Refresh command implementation.

use anyhow::Result;

use celebconnect_core::SessionStore;

use crate::cli::GlobalArgs;
use crate::commands::fail;
use crate::output;
use crate::session::Runtime;

pub async fn run(global: &GlobalArgs) -> Result<()> {
    let runtime = Runtime::open(global, None)?;

    runtime
        .gateway
        .refresh()
        .await
        .map_err(|e| fail(&runtime, e, "Failed to refresh session"))?;

    output::success("Session refreshed");
    if let Ok(Some(record)) = runtime.store.get() {
        output::field("Role", record.role.as_str());
    }
    Ok(())
}
