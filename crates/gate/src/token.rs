//! Bearer credential extraction.

/// Locate the bearer credential for a request.
///
/// The auth cookie wins when present; otherwise the `Authorization` header
/// is consulted with its `Bearer ` scheme prefix stripped. Absence is a
/// first-class outcome routed to the decision layer, never an error.
///
/// The caller resolves the cookie name (it is configuration) and hands in
/// the raw values; this function never inspects more than it is given.
pub fn bearer_token<'a>(
    cookie: Option<&'a str>,
    authorization: Option<&'a str>,
) -> Option<&'a str> {
    if let Some(value) = cookie {
        let value = value.trim();
        if !value.is_empty() {
            return Some(value);
        }
    }

    let token = authorization?.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}
