//! Shared MongoDB error mapping for the document repositories.

use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use tracing::debug;

/// Server code for a unique index violation.
const DUPLICATE_KEY: i32 = 11000;

/// Map a driver error into repository-specific constructors.
///
/// Duplicate-key write failures become `duplicate`, errors raised before a
/// server answered become `connection`, everything else is a `query` error.
pub fn map_mongo_error<E, Q, C, D>(error: MongoError, query: Q, connection: C, duplicate: D) -> E
where
    Q: FnOnce(String) -> E,
    C: FnOnce(String) -> E,
    D: FnOnce(String) -> E,
{
    debug!(error = %error, "document store operation failed");
    let message = error.to_string();
    match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY => {
            duplicate(message)
        }
        ErrorKind::ServerSelection { .. }
        | ErrorKind::Io(_)
        | ErrorKind::ConnectionPoolCleared { .. }
        | ErrorKind::DnsResolve { .. } => connection(message),
        _ => query(message),
    }
}
