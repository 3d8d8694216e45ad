//! Header relay between the caller and the upstream.
//!
//! Headers are forwarded as received in both directions: every value of
//! every name, in order, with no deduplication and no hop-by-hop
//! filtering. `Host`, `Connection` and friends go through untouched.

use http::{HeaderMap, HeaderName};

/// Append every header in `from` onto `to`, keeping all values of a
/// name in their original order. Existing entries in `to` are kept.
pub fn append_all(from: HeaderMap, to: &mut HeaderMap) {
    // `HeaderMap::into_iter` yields `None` for the name of every value
    // after the first one of the same header.
    let mut current: Option<HeaderName> = None;
    for (name, value) in from {
        if let Some(name) = name {
            current = Some(name);
        }
        if let Some(ref name) = current {
            to.append(name.clone(), value);
        }
    }
}
