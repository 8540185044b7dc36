//! Subcommand implementations.

pub mod agent_password;
pub mod login;
pub mod logout;
pub mod otp;
pub mod refresh;
pub mod request;
pub mod signup;
pub mod whoami;

use anyhow::Result;

use crate::cli::{Cli, Commands};
use crate::output;
use crate::session::Runtime;

pub async fn dispatch(cli: Cli) -> Result<()> {
    let global = cli.global;
    match cli.command {
        Commands::Login(args) => login::run(args, &global).await,
        Commands::Signup(args) => signup::run(args, &global).await,
        Commands::Logout => logout::run(&global).await,
        Commands::Whoami(args) => whoami::run(args),
        Commands::Refresh => refresh::run(&global).await,
        Commands::Request(args) => request::run(args, &global).await,
        Commands::Otp(cmd) => otp::run(cmd, &global).await,
        Commands::AgentPassword(args) => agent_password::run(args, &global).await,
    }
}

/// Turn a library error into a CLI error, telling the user when the
/// session has been ended.
pub(crate) fn fail(runtime: &Runtime, err: celebconnect_core::Error, doing: &str) -> anyhow::Error {
    if err.is_terminal_auth() {
        let login = runtime
            .navigator
            .redirected_to()
            .unwrap_or_else(|| "/login".to_string());
        output::error(&format!("Session ended. Sign in again at {}", login));
    }
    anyhow::Error::new(err).context(doing.to_string())
}
