//! Agent password command implementation.

use anyhow::Result;
use clap::Args;

use crate::cli::GlobalArgs;
use crate::commands::fail;
use crate::output;
use crate::session::Runtime;

#[derive(Args, Debug)]
pub struct AgentPasswordArgs {
    /// Current (temporary) password
    #[arg(long = "old")]
    pub old_password: String,

    /// New password
    #[arg(long = "new")]
    pub new_password: String,
}

pub async fn run(args: AgentPasswordArgs, global: &GlobalArgs) -> Result<()> {
    let runtime = Runtime::open(global, Some("/agent/update-password"))?;

    runtime
        .accounts
        .update_agent_password(&args.old_password, &args.new_password)
        .await
        .map_err(|e| fail(&runtime, e, "Failed to update password"))?;

    output::success("Password updated");
    Ok(())
}
