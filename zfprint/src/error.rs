//! High-level error types
//!
//! Errors fall in two families:
//! - transport faults ([`Error::is_transport_fault`]): the exchange with the
//!   device broke down; abandon and rebuild the session
//! - protocol errors ([`Error::is_protocol_error`]): the device or the
//!   argument checks rejected the operation; the session stays usable
//!
//! Either way [`Error::code`] gives the ZFP code, and for device
//! rejections [`Error::kind`] splits it into the state/command pair.

use std::path::PathBuf;
use std::time::Duration;

use zfprint_core::{ErrorCode, ErrorKind};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Core protocol error: {0}")]
    Core(#[from] zfprint_core::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] zfprint_transport::Error),

    #[error("Bad response data: {0}")]
    Decode(#[from] zfprint_types::Error),

    /// No response within the response timeout
    #[error("No response within {waited:?}")]
    Timeout { waited: Duration },

    /// Our own probe came back: the line is looped back
    #[error("Echo fault: the transport echoes what is sent")]
    EchoFault,

    #[error("Device did not answer {attempts} liveness probes")]
    DeviceUnresponsive { attempts: u32 },

    #[error("Device still busy after {attempts} probes")]
    DeviceBusy { attempts: u32 },

    #[error("Out of sequence: sent 0x{expected:02X}, device answered 0x{actual:02X}")]
    OutOfSequence { expected: u8, actual: u8 },

    /// NACK: the device did not accept the frame
    #[error("Command rejected by device (NACK)")]
    CommandRejected,

    /// Acknowledged with a nonzero device error byte
    #[error("Device error {0}")]
    Device(ErrorCode),

    #[error("Cannot read {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Printer not connected")]
    NotConnected,

    /// The session was disconnected, possibly while the command was in flight
    #[error("Session closed")]
    Closed,
}

impl Error {
    /// ZFP error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Core(e) => e.code(),
            Self::Transport(zfprint_transport::Error::ReadTimeout)
            | Self::Transport(zfprint_transport::Error::ConnectionTimeout)
            | Self::Timeout { .. } => ErrorCode::TIMEOUT,
            Self::Transport(_) => ErrorCode::IO,
            Self::Decode(_) => ErrorCode::BAD_RESPONSE,
            Self::EchoFault => ErrorCode::ECHO_FAULT,
            Self::DeviceUnresponsive { .. } => ErrorCode::UNRESPONSIVE,
            Self::DeviceBusy { .. } => ErrorCode::BUSY,
            Self::OutOfSequence { .. } => ErrorCode::OUT_OF_SEQUENCE,
            Self::CommandRejected => ErrorCode::NACK,
            Self::Device(code) => *code,
            Self::File { .. } => ErrorCode::BAD_FILE,
            Self::NotConnected | Self::Closed => ErrorCode::CLOSED,
        }
    }

    /// Structured classification of [`Error::code`]
    pub fn kind(&self) -> ErrorKind {
        self.code().kind()
    }

    /// The exchange broke down; the session should be rebuilt
    pub fn is_transport_fault(&self) -> bool {
        match self {
            Self::Core(e) => e.is_transport_fault(),
            Self::Transport(_)
            | Self::Timeout { .. }
            | Self::EchoFault
            | Self::DeviceUnresponsive { .. }
            | Self::OutOfSequence { .. }
            | Self::NotConnected
            | Self::Closed => true,
            Self::Decode(_)
            | Self::DeviceBusy { .. }
            | Self::CommandRejected
            | Self::Device(_)
            | Self::File { .. } => false,
        }
    }

    /// Business outcome; the session stays usable
    pub fn is_protocol_error(&self) -> bool {
        !self.is_transport_fault()
    }

    /// The channel itself is gone
    pub(crate) fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Transport(
                zfprint_transport::Error::ConnectionClosed
                    | zfprint_transport::Error::Io(_)
                    | zfprint_transport::Error::NotConnected
            )
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zfprint_core::{CommandRejection, DeviceState};

    #[test]
    fn test_device_error_keeps_both_nibbles() {
        let err = Error::Device(ErrorCode::from(0x31u8));
        assert_eq!(err.code().raw(), 0x31);
        assert!(err.is_protocol_error());
        assert_eq!(
            err.kind(),
            ErrorKind::DeviceState {
                state: DeviceState::from_nibble(0x3),
                command: CommandRejection::from_nibble(0x1),
            }
        );
    }

    #[test]
    fn test_transport_family() {
        for err in [
            Error::Timeout { waited: Duration::from_secs(3) },
            Error::EchoFault,
            Error::DeviceUnresponsive { attempts: 10 },
            Error::OutOfSequence { expected: 0x21, actual: 0x22 },
            Error::Closed,
        ] {
            assert!(err.is_transport_fault(), "{}", err);
        }
    }

    #[test]
    fn test_codes() {
        assert_eq!(Error::Timeout { waited: Duration::ZERO }.code(), ErrorCode::TIMEOUT);
        assert_eq!(Error::CommandRejected.code(), ErrorCode::NACK);
        assert_eq!(
            Error::from(zfprint_types::Error::Parse("x".into())).code(),
            ErrorCode::BAD_RESPONSE
        );
        assert_eq!(
            Error::from(zfprint_core::Error::InvalidInput("operator".into())).code(),
            ErrorCode::INVALID_INPUT
        );
        assert_eq!(Error::DeviceBusy { attempts: 10 }.code(), ErrorCode::BUSY);
    }
}
