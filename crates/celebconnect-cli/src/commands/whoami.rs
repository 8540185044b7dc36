//! Whoami command implementation.

use anyhow::{Context, Result};
use clap::Args;

use celebconnect_core::SessionStore;

use crate::output;
use crate::session::Runtime;

#[derive(Args, Debug)]
pub struct WhoamiArgs {
    /// Print the full cached record as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: WhoamiArgs) -> Result<()> {
    let store = Runtime::open_store_only()?;
    let record = store
        .get()
        .context("Failed to load session")?
        .context("No active session. Run 'celebconnect login' first.")?;

    if args.json {
        return output::json(&record);
    }

    output::field("Role", record.role.as_str());
    if let Some(name) = record.display_name() {
        output::field("Name", &name);
    }
    for key in ["email", "level", "is_verified", "email_verified"] {
        if let Some(value) = record.get(key) {
            let text = match value.as_str() {
                Some(s) => s.to_string(),
                None => value.to_string(),
            };
            output::field(key, &text);
        }
    }

    Ok(())
}
