//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::commands::{
    agent_password::AgentPasswordArgs, login::LoginArgs, otp::OtpCommand, request::RequestArgs,
    signup::SignupArgs, whoami::WhoamiArgs,
};

/// Command-line client for the celebconnect marketplace API.
#[derive(Parser, Debug)]
#[command(name = "celebconnect")]
#[command(author, version = env!("CELEBCONNECT_VERSION"), about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// API base URL (overrides the config file)
    #[arg(long, env = "CELEBCONNECT_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Path to a JSON config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in as a customer, agent or admin
    Login(LoginArgs),

    /// Create a customer account
    Signup(SignupArgs),

    /// End the session
    Logout,

    /// Show the cached identity
    Whoami(WhoamiArgs),

    /// Refresh the session cookies
    Refresh,

    /// Send an authenticated request
    Request(RequestArgs),

    /// Email verification codes
    Otp(OtpCommand),

    /// Change an agent's password
    AgentPassword(AgentPasswordArgs),
}
