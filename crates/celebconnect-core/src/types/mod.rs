//! Core client types.
//!
//! These types enforce their invariants at construction time,
//! so invalid URLs and paths never reach the transport.

mod base_url;
mod request;
mod response;
mod role;
mod session_record;

pub use base_url::BaseUrl;
pub use request::{ApiPath, ApiRequest, Method};
pub use response::{ApiEnvelope, ApiResponse, STATUS_RESET_CONTENT, STATUS_UNAUTHORIZED};
pub use role::Role;
pub use session_record::SessionRecord;
