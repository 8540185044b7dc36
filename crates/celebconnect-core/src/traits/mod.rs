//! Ports the gateway is assembled from.

mod navigator;
mod store;
mod transport;

pub use navigator::Navigator;
pub use store::SessionStore;
pub use transport::Transport;
