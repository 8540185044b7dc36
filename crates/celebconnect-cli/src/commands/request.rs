//! Generic authenticated request command.

use anyhow::{Context, Result, anyhow};
use clap::Args;

use celebconnect_core::{ApiRequest, Error, Method};

use crate::cli::GlobalArgs;
use crate::commands::fail;
use crate::output;
use crate::session::Runtime;

#[derive(Args, Debug)]
pub struct RequestArgs {
    /// HTTP method (GET, POST, PUT, PATCH, DELETE)
    pub method: String,

    /// API path, e.g. /user/bookings
    pub path: String,

    /// JSON request body
    #[arg(long)]
    pub data: Option<String>,

    /// Query parameter as key=value (repeatable)
    #[arg(long = "query", value_name = "KEY=VALUE")]
    pub query: Vec<String>,

    /// Page the request is made from; decides the login page on expiry
    #[arg(long)]
    pub location: Option<String>,
}

fn build_request(args: &RequestArgs) -> Result<ApiRequest> {
    let method: Method = args.method.parse().context("Invalid method")?;
    let mut request = ApiRequest::new(method, &args.path).context("Invalid path")?;

    if let Some(data) = &args.data {
        let body: serde_json::Value = serde_json::from_str(data).context("Invalid --data JSON")?;
        request = request.with_body(body);
    }
    for pair in &args.query {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow!("Invalid --query '{}': expected KEY=VALUE", pair))?;
        request = request.query(key, value);
    }
    Ok(request)
}

pub async fn run(args: RequestArgs, global: &GlobalArgs) -> Result<()> {
    let request = build_request(&args)?;
    let runtime = Runtime::open(global, args.location.as_deref())?;

    match runtime.gateway.send(request).await {
        Ok(response) => {
            output::field("Status", &response.status().to_string());
            output::body(response.body())
        }
        Err(Error::Upstream(err)) => {
            output::field("Status", &err.status.to_string());
            output::body(&err.body)?;
            Err(anyhow!(err)).context("Request failed")
        }
        Err(err) => Err(fail(&runtime, err, "Request failed")),
    }
}
