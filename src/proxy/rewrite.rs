//! Request path rewriting against a route target.

use std::borrow::Cow;

use url::Url;

use crate::proxy::ForwardError;

/// Ensure the unmatched remainder is rooted (`""` → `"/"`, `"x"` → `"/x"`).
pub fn rooted(remaining: &str) -> Cow<'_, str> {
    if remaining.starts_with('/') {
        Cow::Borrowed(remaining)
    } else {
        Cow::Owned(format!("/{remaining}"))
    }
}

/// Build the upstream URL for a matched request.
///
/// The target's scheme, host, port and base path are kept; the rooted
/// remainder is appended below the base path and the inbound query replaces
/// any query on the target. The remainder is spliced into the path rather
/// than resolved as a reference, so it can never change scheme or host.
pub fn upstream_url(target: &str, remaining: &str, query: Option<&str>) -> Result<Url, ForwardError> {
    let mut url = Url::parse(target).map_err(|source| ForwardError::InvalidTarget {
        target: target.to_string(),
        source,
    })?;
    if url.cannot_be_a_base() {
        return Err(ForwardError::OpaqueTarget(target.to_string()));
    }

    let base = url.path().trim_end_matches('/');
    let path = format!("{base}{}", rooted(remaining));
    url.set_path(&path);
    url.set_query(query.filter(|q| !q.is_empty()));
    url.set_fragment(None);
    Ok(url)
}

/// `Host` header value for an upstream URL, including a non-default port.
pub fn host_header(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}
