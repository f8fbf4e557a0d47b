//! Header relaying utilities for the proxy service

use http::HeaderMap;

/// Append every value of every key from `src` into `dst`.
///
/// Multi-valued keys keep all their values in the order `src` yields them;
/// existing entries in `dst` are kept, never replaced.
pub fn copy_headers(dst: &mut HeaderMap, src: &HeaderMap) {
    for (name, value) in src {
        dst.append(name.clone(), value.clone());
    }
}
