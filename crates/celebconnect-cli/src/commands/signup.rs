//! Signup command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use celebconnect_core::SignupRequest;
use celebconnect_core::accounts::parse_date_of_birth;

use crate::cli::GlobalArgs;
use crate::commands::fail;
use crate::output;
use crate::session::Runtime;

#[derive(Args, Debug)]
pub struct SignupArgs {
    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    #[arg(long)]
    pub email: String,

    /// Phone number, including country code
    #[arg(long)]
    pub phone: String,

    /// Date of birth (YYYY-MM-DD)
    #[arg(long)]
    pub dob: String,

    #[arg(long)]
    pub password: String,
}

pub async fn run(args: SignupArgs, global: &GlobalArgs) -> Result<()> {
    let request = SignupRequest {
        first_name: args.first_name,
        last_name: args.last_name,
        email: args.email,
        phone_number: args.phone,
        date_of_birth: parse_date_of_birth(&args.dob).context("Invalid --dob")?,
        password: args.password,
    };
    let runtime = Runtime::open(global, Some("/signup"))?;

    eprintln!("{}", "Creating account...".dimmed());

    let record = runtime
        .accounts
        .signup(&request)
        .await
        .map_err(|e| fail(&runtime, e, "Failed to sign up"))?;

    output::success("Account created");
    println!();
    output::field("Email", record.get_str("email").unwrap_or(&request.email));
    output::field("Next", "run 'celebconnect otp request' to verify your email");

    Ok(())
}
