use thiserror::Error;

/// Errors surfaced by the cookie cipher and the stateless retry path.
///
/// Cookie failures are deliberately collapsed into [`Error::InvalidCookie`]: a
/// wrong key, a tampered ciphertext and a malformed plaintext look the same to
/// the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The ClientHello record could not be parsed far enough to find its extensions.
    #[error("Malformed ClientHello: {0}")]
    Malformed(String),

    #[error("Invalid cookie")]
    InvalidCookie,

    /// No common protocol version, cipher suite or group with the client.
    #[error("Negotiation failed: {0}")]
    Negotiation(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Crypto error: {0}")]
    Crypto(String),
}

impl<'a> From<nom::Err<nom::error::Error<&'a [u8]>>> for Error {
    fn from(value: nom::Err<nom::error::Error<&'a [u8]>>) -> Self {
        match value {
            nom::Err::Incomplete(_) => Error::Malformed("incomplete input".to_string()),
            nom::Err::Error(e) | nom::Err::Failure(e) => {
                Error::Malformed(format!("{:?} ({} bytes left)", e.code, e.input.len()))
            }
        }
    }
}
