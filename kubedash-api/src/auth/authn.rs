//! Identity extraction from the upstream auth proxy header

use axum::http::HeaderMap;

use crate::config::AuthConfig;

/// Derive the caller identity from the configured header.
///
/// Header lookup is case-insensitive. The configured prefix is stripped when
/// present; a value without the prefix is used as is. A missing header, a
/// value that is not visible ASCII, or an empty result yields `None`.
pub fn user_identity(headers: &HeaderMap, config: &AuthConfig) -> Option<String> {
    let raw = match headers.get(config.userid_header.as_str()) {
        Some(value) => value,
        None => {
            tracing::debug!(header = %config.userid_header, "User header not present");
            return None;
        }
    };

    let raw = raw.to_str().ok()?;
    let user = raw.strip_prefix(config.userid_prefix.as_str()).unwrap_or(raw);

    if user.is_empty() {
        return None;
    }

    tracing::debug!(user = %user, header = %config.userid_header, "Resolved caller identity");
    Some(user.to_string())
}
