//! Email verification commands.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cli::GlobalArgs;
use crate::commands::fail;
use crate::output;
use crate::session::Runtime;

#[derive(Args, Debug)]
pub struct OtpCommand {
    #[command(subcommand)]
    pub command: OtpSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum OtpSubcommand {
    /// Email a new verification code
    Request,

    /// Submit a verification code
    Validate {
        /// The six-character code from the email
        code: String,
    },
}

pub async fn run(cmd: OtpCommand, global: &GlobalArgs) -> Result<()> {
    let runtime = Runtime::open(global, Some("/validate/otp"))?;

    match cmd.command {
        OtpSubcommand::Request => {
            let message = runtime
                .accounts
                .request_otp()
                .await
                .map_err(|e| fail(&runtime, e, "Failed to request code"))?;
            output::success(message.as_deref().unwrap_or("Verification code sent"));
        }
        OtpSubcommand::Validate { code } => {
            runtime
                .accounts
                .validate_otp(&code)
                .await
                .map_err(|e| fail(&runtime, e, "Failed to validate code"))?;
            output::success("Email verified");
        }
    }
    Ok(())
}
