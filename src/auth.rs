//! Token acceptance
//!
//! Tenants are identified by the auth token the game client or game server
//! plugin sends along. The store never checks tokens itself; callers run
//! [`authorize`] (or consult a [`TokenFilter`] directly) before touching it.

use crate::error::{Error, Result};

/// Decides whether a token may use the relay
///
/// Not a syntax check; filters enforce policy (allow lists, bans, quotas).
pub trait TokenFilter: Send + Sync {
    /// Check if the token should be accepted
    fn accept(&self, token: &str) -> bool;
}

impl<F> TokenFilter for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn accept(&self, token: &str) -> bool {
        self(token)
    }
}

/// Filter that accepts every token or none
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleTokenFilter {
    pub value: bool,
}

impl ToggleTokenFilter {
    pub fn new(value: bool) -> Self {
        Self { value }
    }
}

impl Default for ToggleTokenFilter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl TokenFilter for ToggleTokenFilter {
    fn accept(&self, _token: &str) -> bool {
        self.value
    }
}

/// Authorization header scheme, one per data source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// Game client state integration
    Gsi,
    /// Game server plugin snapshots
    Sm,
}

impl AuthScheme {
    /// Header prefix including the separating space
    pub fn prefix(&self) -> &'static str {
        match self {
            AuthScheme::Gsi => "GSI ",
            AuthScheme::Sm => "SM ",
        }
    }

    /// Extract the token from an authorization header value
    pub fn strip<'a>(&self, header: &'a str) -> Option<&'a str> {
        header
            .strip_prefix(self.prefix())
            .filter(|token| !token.is_empty())
    }
}

impl std::fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.prefix().trim_end())
    }
}

/// Extract and check the token of an authorization header
pub fn authorize<'a, F>(header: &'a str, scheme: AuthScheme, filter: &F) -> Result<&'a str>
where
    F: TokenFilter + ?Sized,
{
    let token = scheme.strip(header).ok_or(Error::MissingToken(scheme))?;

    if !filter.accept(token) {
        tracing::debug!(scheme = %scheme, "Token rejected by filter");
        return Err(Error::RejectedToken);
    }

    Ok(token)
}
