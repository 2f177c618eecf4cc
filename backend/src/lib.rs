//! Account platform: account, user and statistics services over a shared
//! hexagonal core.
//!
//! The three binaries differ only in which [`server::ServiceKind`] they run.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
#[cfg(test)]
mod test_support;

/// Request tracing middleware applied to every service.
pub use middleware::Trace;
