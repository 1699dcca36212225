//! Error type shared by every component in the crate.
//!
//! Failures fall into three families:
//!
//! - **Remote**: the server answered with `success = false`. The message is
//!   meant to be shown to the user verbatim.
//! - **Network**: the request never produced a usable answer (transport error,
//!   malformed body). Shown as a generic error.
//! - **Local invariant violations** (`IndexOutOfBounds`, `IdentityMismatch`):
//!   a row action addressed a buffer position that cannot exist. These point
//!   at a bug in the caller and are never turned into user notices.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while loading or mutating a cached list.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The server rejected the request; carries the server's own message.
    #[error("{0}")]
    Remote(String),

    /// Transport-level failure.
    #[error("network error: {0}")]
    Network(String),

    /// A computed absolute row index fell outside the loaded buffer.
    #[error("row index {index} is outside the loaded buffer of {len} items")]
    IndexOutOfBounds {
        /// Absolute index that was computed.
        index: usize,
        /// Buffer length at the time.
        len: usize,
    },

    /// The row at `index` does not hold the item the action was issued for.
    #[error("row index {index} does not hold item {expected}")]
    IdentityMismatch {
        /// Absolute index that was computed.
        index: usize,
        /// Display form of the id the caller expected.
        expected: String,
    },

    /// The list source does not implement the requested operation.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns true for the local invariant family, which signals a caller bug
    /// rather than anything the user can act on.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Error::IndexOutOfBounds { .. } | Error::IdentityMismatch { .. }
        )
    }

    /// Text suitable for a user-facing notice, or `None` for errors that must
    /// not reach the user.
    pub fn user_message(&self) -> Option<String> {
        match self {
            Error::Remote(message) => Some(message.clone()),
            Error::Network(_) | Error::Unsupported(_) | Error::Config(_) => Some(self.to_string()),
            Error::IndexOutOfBounds { .. } | Error::IdentityMismatch { .. } => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Network(format!("malformed response: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_message_is_verbatim() {
        let err = Error::Remote("token name too long".to_string());
        assert_eq!(err.to_string(), "token name too long");
        assert_eq!(err.user_message().as_deref(), Some("token name too long"));
    }

    #[test]
    fn test_invariant_violations_stay_hidden() {
        let err = Error::IndexOutOfBounds { index: 12, len: 10 };
        assert!(err.is_invariant_violation());
        assert!(err.user_message().is_none());

        let err = Error::IdentityMismatch {
            index: 3,
            expected: "7".to_string(),
        };
        assert!(err.is_invariant_violation());
        assert!(err.user_message().is_none());
    }

    #[test]
    fn test_decode_errors_become_network_errors() {
        let err: Error = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert!(matches!(err, Error::Network(_)));
        assert!(err.to_string().starts_with("network error: malformed response"));
    }
}
