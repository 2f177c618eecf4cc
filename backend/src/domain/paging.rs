//! Sort-field checks shared by the listing services.

use pagination::PageRequest;
use serde_json::json;

use super::Error;

/// Reject page requests that sort on a field the entity does not expose.
pub fn ensure_sortable(request: &PageRequest, allowed: &[&str]) -> Result<(), Error> {
    let field = request.sort_field();
    if allowed.contains(&field) {
        return Ok(());
    }
    Err(
        Error::invalid_request(format!("cannot sort by '{field}'")).with_details(json!({
            "field": "sortField",
            "value": field,
            "allowed": allowed,
            "code": "unsupported_sort_field",
        })),
    )
}
