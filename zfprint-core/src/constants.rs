//! Protocol constants

/// Frame start, also the first byte of a data response
pub const STX: u8 = 0x02;

/// Antiecho marker sent ahead of every probe byte
pub const ANTIECHO: u8 = 0x03;

/// Liveness probe, echoed by a present device
pub const PING: u8 = 0x04;

/// Busy probe, echoed once the device can accept a command
pub const BUSY: u8 = 0x05;

/// Short acknowledgement response
pub const ACK: u8 = 0x06;

/// Frame terminator
pub const END: u8 = 0x0A;

/// Device asks the host to keep waiting
pub const RETRY: u8 = 0x0E;

/// Command not accepted
pub const NACK: u8 = 0x15;

/// Added to the payload length to form the LENGTH byte
pub const LENGTH_OFFSET: u8 = 0x20 + 3;

/// Lowest (and initial) sequence number
pub const SEQUENCE_MIN: u8 = 0x20;

/// Highest sequence number before wrapping back to [`SEQUENCE_MIN`]
pub const SEQUENCE_MAX: u8 = 0xFF;

/// Liveness/busy probe timeout per attempt (milliseconds)
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 1000;

/// Response timeout (milliseconds)
pub const DEFAULT_RESPONSE_TIMEOUT_MS: u64 = 3000;

/// Probe attempts before the device is declared unresponsive
pub const DEFAULT_PROBE_RETRIES: u32 = 10;

/// Largest response the device may send, terminator included
pub const MAX_RESPONSE_SIZE: usize = 256;

/// Logo upload layout
pub mod logo {
    /// Bitmap bytes carried by one logo frame
    pub const BITMAP_SIZE: usize = 3902;

    /// Fixed header of the logo frame (STX, length, sequence, command)
    pub const HEADER: [u8; 4] = [0x02, 0x39, 0x37, 0x4C];

    /// Total logo frame size
    pub const FRAME_SIZE: usize = HEADER.len() + BITMAP_SIZE;
}

/// Text alignment used by the free-text print command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Right,
    Center,
}

/// Daily, operator and article reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    /// Information report, registers are kept
    X,
    /// Zeroing report
    Z,
}

impl ReportMode {
    pub fn as_char(self) -> char {
        match self {
            Self::X => 'X',
            Self::Z => 'Z',
        }
    }
}
