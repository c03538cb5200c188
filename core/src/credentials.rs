//! Request Credentials
//!
//! State-changing requests echo a CSRF token back to the server. Where that
//! token comes from is injected through [`CredentialProvider`], so the HTTP
//! client never reaches into ambient process state for it.

use std::fmt;

/// Default name of the CSRF cookie
pub const DEFAULT_CSRF_COOKIE: &str = "csrftoken";

/// Header that carries the CSRF token on POST requests
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Supplies credentials for outgoing requests
pub trait CredentialProvider: Send + Sync {
    /// Token for the `X-CSRFToken` header, if one is available
    fn csrf_token(&self) -> Option<String>;

    /// Raw `Cookie` header to send with every request, if any
    fn cookie_header(&self) -> Option<String> {
        None
    }
}

/// No credentials at all; POSTs carry an empty CSRF header
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCredentials;

impl CredentialProvider for NoCredentials {
    fn csrf_token(&self) -> Option<String> {
        None
    }
}

/// A fixed CSRF token
#[derive(Clone)]
pub struct StaticCredentials {
    token: String,
}

impl StaticCredentials {
    /// Create with a token
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("token", &"<redacted>")
            .finish()
    }
}

impl CredentialProvider for StaticCredentials {
    fn csrf_token(&self) -> Option<String> {
        Some(self.token.clone())
    }
}

/// Credentials taken from a browser-style cookie string
///
/// The whole string is forwarded as the `Cookie` header (so the server sees
/// its session) and the CSRF token is read from the named cookie.
#[derive(Clone)]
pub struct CookieCredentials {
    cookies: String,
    csrf_cookie: String,
}

impl CookieCredentials {
    /// Use `cookies` (e.g. `"sessionid=abc; csrftoken=xyz"`) with the default
    /// CSRF cookie name
    pub fn new(cookies: impl Into<String>) -> Self {
        Self::with_cookie_name(cookies, DEFAULT_CSRF_COOKIE)
    }

    /// Use `cookies` and read the token from `csrf_cookie`
    pub fn with_cookie_name(cookies: impl Into<String>, csrf_cookie: impl Into<String>) -> Self {
        Self {
            cookies: cookies.into(),
            csrf_cookie: csrf_cookie.into(),
        }
    }

    /// Name of the cookie the token is read from
    #[must_use]
    pub fn csrf_cookie_name(&self) -> &str {
        &self.csrf_cookie
    }
}

impl fmt::Debug for CookieCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CookieCredentials")
            .field("csrf_cookie", &self.csrf_cookie)
            .field("cookies", &"<redacted>")
            .finish()
    }
}

impl CredentialProvider for CookieCredentials {
    fn csrf_token(&self) -> Option<String> {
        cookie_value(&self.cookies, &self.csrf_cookie)
    }

    fn cookie_header(&self) -> Option<String> {
        let trimmed = self.cookies.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

/// Look up `name` in a `;`-separated cookie string
///
/// Whitespace around the name and before the value is ignored. An empty
/// value counts as absent. The first match wins.
#[must_use]
pub fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    cookies.split(';').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key.trim() != name {
            return None;
        }
        let value = value.trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    })
}
