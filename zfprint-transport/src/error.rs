//! Transport errors

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Not connected")]
    NotConnected,

    #[error("Already connected")]
    AlreadyConnected,

    #[error("Connection timeout")]
    ConnectionTimeout,

    #[error("Read timeout")]
    ReadTimeout,

    #[error("Connection closed by remote")]
    ConnectionClosed,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Cannot open {endpoint}: {reason}")]
    Open { endpoint: String, reason: String },

    #[error("No transport could connect: {0}")]
    Exhausted(String),
}

impl Error {
    /// Nothing arrived in time; the channel itself is still fine
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::ReadTimeout | Self::ConnectionTimeout)
    }
}
