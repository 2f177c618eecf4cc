//! Reqwest-backed adapters for calls between the services.
//!
//! Adapters own transport details only: URL construction, timeouts, status
//! mapping, and JSON decoding. The request trace id, when one is in scope,
//! is forwarded in the `trace-id` header.

mod statistics_sink;
mod user_directory;

pub use statistics_sink::HttpStatisticsSink;
pub use user_directory::HttpUserDirectory;

use reqwest::{RequestBuilder, StatusCode, Url};

use crate::domain::{TRACE_ID_HEADER, TraceId};

/// Append `segments` to `base`, percent-encoding each one.
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, String> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| format!("base URL {base} cannot carry a path"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn with_trace_id(request: RequestBuilder) -> RequestBuilder {
    match TraceId::current() {
        Some(trace_id) => request.header(TRACE_ID_HEADER, trace_id.to_string()),
        None => request,
    }
}

fn status_message(status: StatusCode, body: &[u8]) -> String {
    let body_preview = body_preview(body);
    if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
