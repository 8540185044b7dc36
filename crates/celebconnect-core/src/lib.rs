//! celebconnect-core - Session gateway, types and ports for the
//! celebconnect marketplace API client.
//!
//! All authenticated calls flow through a [`SessionGateway`], which recovers
//! once from an expired credential and otherwise ends the session.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use celebconnect_core::{ApiRequest, GatewayConfig, Navigator, SessionGateway, SessionStore, Transport};
//!
//! # async fn example(
//! #     transport: Arc<dyn Transport>,
//! #     store: Arc<dyn SessionStore>,
//! #     navigator: Arc<dyn Navigator>,
//! # ) -> celebconnect_core::Result<()> {
//! let gateway = SessionGateway::new(transport, store, navigator, &GatewayConfig::default());
//! let response = gateway.send(ApiRequest::get("/user/bookings")?).await?;
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! ```

pub mod accounts;
pub mod config;
pub mod credentials;
pub mod error;
pub mod gateway;
pub mod routes;
pub mod traits;
pub mod types;

#[cfg(test)]
mod testing;

pub use accounts::{AccountService, SignupRequest};
pub use config::{AccountEndpoints, GatewayConfig};
pub use credentials::Credentials;
pub use error::Error;
pub use gateway::{RequestAttempt, SessionGateway};
pub use routes::{RoleRoutes, RouteTable};
pub use traits::{Navigator, SessionStore, Transport};
pub use types::{
    ApiEnvelope, ApiPath, ApiRequest, ApiResponse, BaseUrl, Method, Role, SessionRecord,
};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
