mod client;
pub mod endpoints;
mod hourly;
mod login_form;
pub mod meters;
pub mod mock;
mod session;

pub use client::{Credentials, PortalClient};
#[cfg(test)]
pub use endpoints::Endpoints;
pub use hourly::ConsumptionFetcher;
pub use meters::list_meters;
pub use session::PortalSession;
