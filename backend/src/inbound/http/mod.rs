//! HTTP inbound adapter exposing REST endpoints.
//!
//! Each service mounts one resource module (`accounts`, `users` or
//! `statistics`) plus the shared health probes. Handlers only translate
//! between JSON and the driving ports held in the per-service state.

pub mod accounts;
pub mod error;
pub mod health;
pub mod paging;
pub mod schemas;
pub mod state;
pub mod statistics;
pub mod users;
pub mod validation;

pub use error::ApiResult;
