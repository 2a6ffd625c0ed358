//! Error types for zfprint-core

use crate::code::ErrorCode;

/// Result type alias for zfprint operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Frame is too short to be valid
    #[error("Frame too short: expected at least {expected} bytes, got {actual} bytes")]
    FrameTooShort {
        expected: usize,
        actual: usize,
    },

    /// First byte is neither STX nor ACK
    #[error("Unexpected frame marker: 0x{0:02X}")]
    UnexpectedMarker(u8),

    /// Last byte is not the frame terminator
    #[error("Frame not terminated: last byte 0x{0:02X}")]
    MissingTerminator(u8),

    /// LENGTH byte disagrees with the received byte count
    #[error("Length mismatch: header says 0x{header:02X}, frame carries {payload_len} payload bytes")]
    LengthMismatch {
        header: u8,
        payload_len: usize,
    },

    /// Checksum verification failed
    #[error("Checksum mismatch: expected {expected:02X?}, received {received:02X?}")]
    ChecksumMismatch {
        expected: [u8; 2],
        received: [u8; 2],
    },

    /// ACK error subfield is not two hex digits
    #[error("Malformed acknowledgement status: {0:02X?}")]
    MalformedStatus([u8; 2]),

    /// Response grew past the device's maximum frame size
    #[error("Response overflow: more than {max} bytes without a terminator")]
    ResponseOverflow {
        max: usize,
    },

    /// Unknown command byte
    #[error("Unknown command code: 0x{0:02X}")]
    UnknownCommand(u8),

    /// Payload too large for the one-byte LENGTH field
    #[error("Payload too large: {size} bytes (max: {max} bytes)")]
    PayloadTooLarge {
        size: usize,
        max: usize,
    },

    /// Caller-supplied argument outside its documented range
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// NaN or infinity where a number goes on the wire
    #[error("Non-finite value for {0}")]
    NonFinite(&'static str),

    /// Logo bitmap of the wrong size
    #[error("Logo bitmap must be {expected} bytes, got {actual}")]
    InvalidLogo {
        expected: usize,
        actual: usize,
    },

    /// Session already closed
    #[error("Session closed")]
    SessionClosed,

    /// Invalid session state
    #[error("Invalid session state: {0}")]
    InvalidSessionState(String),
}

impl Error {
    /// Matching ZFP error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::FrameTooShort { .. }
            | Self::UnexpectedMarker(_)
            | Self::MissingTerminator(_)
            | Self::LengthMismatch { .. }
            | Self::MalformedStatus(_)
            | Self::UnknownCommand(_) => ErrorCode::BAD_RESPONSE,
            Self::ChecksumMismatch { .. } => ErrorCode::CHECKSUM,
            Self::ResponseOverflow { .. } => ErrorCode::RESPONSE_OVERFLOW,
            Self::PayloadTooLarge { .. } | Self::InvalidInput(_) | Self::NonFinite(_) => {
                ErrorCode::INVALID_INPUT
            }
            Self::InvalidLogo { .. } => ErrorCode::BAD_FILE,
            Self::SessionClosed | Self::InvalidSessionState(_) => ErrorCode::CLOSED,
        }
    }

    /// Faults on the wire itself; the session should be rebuilt
    pub fn is_transport_fault(&self) -> bool {
        matches!(
            self,
            Self::FrameTooShort { .. }
                | Self::UnexpectedMarker(_)
                | Self::MissingTerminator(_)
                | Self::LengthMismatch { .. }
                | Self::ChecksumMismatch { .. }
                | Self::MalformedStatus(_)
                | Self::ResponseOverflow { .. }
                | Self::SessionClosed
                | Self::InvalidSessionState(_)
        )
    }

    pub(crate) fn invalid(what: impl Into<String>) -> Self {
        Self::InvalidInput(what.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_share_invalid_input_code() {
        assert_eq!(Error::invalid("operator").code(), ErrorCode::INVALID_INPUT);
        assert_eq!(Error::NonFinite("price").code(), ErrorCode::INVALID_INPUT);
        assert!(!Error::invalid("operator").is_transport_fault());
    }

    #[test]
    fn test_checksum_is_transport_fault() {
        let err = Error::ChecksumMismatch {
            expected: [0x30, 0x31],
            received: [0x30, 0x32],
        };
        assert_eq!(err.code(), ErrorCode::CHECKSUM);
        assert!(err.is_transport_fault());
    }
}
