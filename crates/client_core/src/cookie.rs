use std::fmt;

use percent_encoding::percent_decode_str;

pub const DEFAULT_CSRF_COOKIE: &str = "csrftoken";

/// Anti-forgery token sent as `X-CSRFToken` on state-mutating requests.
#[derive(Clone, PartialEq, Eq)]
pub struct SecurityToken(String);

impl SecurityToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn from_cookie_header(cookie_header: &str, cookie_name: &str) -> Option<Self> {
        cookie_value(cookie_header, cookie_name).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecurityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecurityToken(<redacted>)")
    }
}

/// Looks up `name` in a `Cookie`-style header (`a=1; b=2`).
///
/// Values are percent-decoded like `decodeURIComponent`, so `+` stays a plus
/// sign. The first matching pair wins.
pub fn cookie_value(cookie_header: &str, name: &str) -> Option<String> {
    if cookie_header.is_empty() || name.is_empty() {
        return None;
    }

    cookie_header
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(name)?.strip_prefix('='))
        .and_then(|raw| percent_decode_str(raw).decode_utf8().ok())
        .map(|decoded| decoded.into_owned())
}
