//! Errors in the library.
use thiserror::Error;

/// Failures of the remote world collaborator.
#[derive(Error, Debug, Clone)]
pub enum WorldError {
    /// Network or HTTP transport failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// Entering a world was refused by the server.
    #[error("world unavailable: {0}")]
    Unavailable(String),

    /// The server answered but reported a failure code.
    #[error("api error: {0}")]
    Api(String),

    /// The server answered with a payload that could not be interpreted.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl WorldError {
    /// Whether this error must stop the whole training session.
    ///
    /// A refused world entry cannot be recovered from by skipping to the
    /// next episode; transport and API errors only fail the current one.
    pub fn is_fatal(&self) -> bool {
        matches!(self, WorldError::Unavailable(_))
    }
}

/// Failures of the local score store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying file I/O failed.
    #[error("score store i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored record could not be read or written.
    #[error("score store format error: {0}")]
    Format(String),
}
