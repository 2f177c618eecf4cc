//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: MongoDB-backed and in-memory repositories
//! - **http**: reqwest clients for calls to the user and statistics services
//!
//! Adapters are thin translators between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod http;
pub mod persistence;
