use std::fmt;

/// Key loading, signing and transport errors
///
/// Every variant carries a message describing the failing step. The
/// `Display` output is prefixed with the stage that failed so callers can
/// report it without adding context of their own.
///
/// # Example
/// ```rust
/// use cdpcurl::{AuthError, Result};
///
/// fn report(result: Result<String>) {
///     match result {
///         Ok(token) => println!("token: {}", token),
///         Err(AuthError::KeyLoad(msg)) => println!("no usable api key: {}", msg),
///         Err(AuthError::KeySelection(msg)) => println!("bad private key: {}", msg),
///         Err(e) => println!("other error: {}", e),
///     }
/// }
/// ```
#[derive(Debug)]
pub enum AuthError {
    /// The API key could not be loaded
    ///
    /// This error occurs when:
    /// - An explicitly configured key file cannot be opened
    /// - A key file exists but is not valid JSON
    /// - A directory on the search path cannot be read for a reason other
    ///   than the file being absent
    /// - No source supplied both a key name and a private key
    KeyLoad(String),

    /// The private key text could not be turned into a signing key
    ///
    /// This error occurs when:
    /// - A PEM-armored key cannot be decoded or is not a P-256 EC key
    /// - A non-PEM key is not valid standard base64
    /// - A decoded Ed25519 key is not exactly 32 bytes
    KeySelection(String),

    /// Token construction failed
    ///
    /// This error occurs when the nonce cannot be drawn from the operating
    /// system RNG or when the header or claims cannot be serialized.
    Signing(String),

    /// The wrapped transport failed to deliver the request or read the response
    Transport(String),

    /// The outgoing request cannot carry a token
    ///
    /// Raised when the request URI has no host to bind the token to, or the
    /// resulting header value is not a valid HTTP header value.
    InvalidRequest(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::KeyLoad(msg) => write!(f, "api key loader: {msg}"),
            AuthError::KeySelection(msg) => write!(f, "jwt: {msg}"),
            AuthError::Signing(msg) => write!(f, "jwt: {msg}"),
            AuthError::Transport(msg) => write!(f, "transport: {msg}"),
            AuthError::InvalidRequest(msg) => write!(f, "invalid request: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

pub type Result<T> = std::result::Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_stage_prefix() {
        let err = AuthError::KeyLoad("could not load api key".to_string());
        assert_eq!(err.to_string(), "api key loader: could not load api key");

        let err = AuthError::KeySelection("could not decode PEM private key".to_string());
        assert!(err.to_string().starts_with("jwt: "));

        let err = AuthError::Transport("connection refused".to_string());
        assert_eq!(err.to_string(), "transport: connection refused");
    }
}
