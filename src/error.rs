//! Error types
//!
//! The tenant store itself is total; errors only come from the edges that
//! parse configuration or authorization headers.

use crate::auth::AuthScheme;

/// Result alias for fallible relay operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for configuration and authorization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A configuration value could not be parsed or is out of range
    InvalidConfig {
        /// Variable name
        key: String,
        /// Raw value as found
        value: String,
    },
    /// No token for the expected scheme
    MissingToken(AuthScheme),
    /// Token filter refused the token
    RejectedToken,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidConfig { key, value } => {
                write!(f, "Invalid configuration value for {}: {:?}", key, value)
            }
            Error::MissingToken(scheme) => write!(f, "Missing {} token", scheme),
            Error::RejectedToken => write!(f, "Token rejected"),
        }
    }
}

impl std::error::Error for Error {}
