//! Login command implementation.

use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::Colorize;

use celebconnect_core::{Credentials, Role};

use crate::cli::GlobalArgs;
use crate::commands::fail;
use crate::output;
use crate::session::Runtime;

/// Which login endpoint to use.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LoginRole {
    User,
    Agent,
    Admin,
}

impl From<LoginRole> for Role {
    fn from(role: LoginRole) -> Self {
        match role {
            LoginRole::User => Role::User,
            LoginRole::Agent => Role::Agent,
            LoginRole::Admin => Role::Admin,
        }
    }
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long)]
    pub password: String,

    /// Log in as a customer, agent or admin
    #[arg(long = "as", value_enum, default_value = "user")]
    pub role: LoginRole,
}

pub async fn run(args: LoginArgs, global: &GlobalArgs) -> Result<()> {
    let role = Role::from(args.role);
    let runtime = Runtime::open(global, None)?;
    let credentials = Credentials::new(&args.email, &args.password);

    eprintln!("{}", "Logging in...".dimmed());

    let record = runtime
        .accounts
        .login(role, &credentials)
        .await
        .map_err(|e| fail(&runtime, e, "Failed to login"))?;

    output::success("Logged in successfully");
    println!();
    output::field("Role", record.role.as_str());
    if let Some(name) = record.display_name() {
        output::field("Name", &name);
    }
    output::field("Home", &runtime.config.routes.for_role(record.role).home_path);

    Ok(())
}

