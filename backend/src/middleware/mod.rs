//! Actix middleware shared by the three services.
//!
//! [`Trace`] assigns or adopts the request trace identifier.

pub mod trace;

pub use trace::Trace;
