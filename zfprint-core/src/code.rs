//! ZFP error codes
//!
//! A code is 16 bits wide. Values from 0x100 up are flat
//! communication/application codes raised by the host side. Values below
//! 0x100 come from the device and pack two independent nibbles: the high
//! nibble is the device state, the low nibble the reason the command was
//! rejected. Both are kept verbatim.

use std::fmt;

/// Raw 16-bit error code
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ErrorCode(u16);

impl ErrorCode {
    pub const IO: Self = Self(0x100);
    pub const INVALID_INPUT: Self = Self(0x101);
    pub const TIMEOUT: Self = Self(0x102);
    pub const NACK: Self = Self(0x103);
    pub const CHECKSUM: Self = Self(0x104);
    pub const BUSY: Self = Self(0x105);
    pub const BAD_RESPONSE: Self = Self(0x106);
    pub const RESPONSE_OVERFLOW: Self = Self(0x107);
    pub const BAD_FILE: Self = Self(0x108);
    pub const BAD_BLOCK_NUMBER: Self = Self(0x10A);
    pub const OUT_OF_SEQUENCE: Self = Self(0x10B);
    pub const UNRESPONSIVE: Self = Self(0x10C);
    pub const CLOSED: Self = Self(0x10D);
    pub const ECHO_FAULT: Self = Self(0x10E);

    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Code reported by the device itself (state/command nibble pair)
    pub const fn is_device_code(self) -> bool {
        self.0 < 0x100
    }

    pub fn kind(self) -> ErrorKind {
        if self.is_device_code() {
            let byte = self.0 as u8;
            ErrorKind::DeviceState {
                state: DeviceState::from_nibble(byte >> 4),
                command: CommandRejection::from_nibble(byte & 0x0F),
            }
        } else {
            ErrorKind::Communication(CommunicationCause::from_code(self.0))
        }
    }
}

impl From<u8> for ErrorCode {
    fn from(byte: u8) -> Self {
        Self(byte as u16)
    }
}

impl From<u16> for ErrorCode {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> u16 {
        code.0
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:03X} ({})", self.0, self.kind())
    }
}

/// Structured classification of an [`ErrorCode`]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Host-side communication or application fault (code >= 0x100)
    Communication(CommunicationCause),

    /// Device-reported pair (code < 0x100)
    DeviceState {
        state: DeviceState,
        command: CommandRejection,
    },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Communication(cause) => write!(f, "{:?}", cause),
            Self::DeviceState { state, command } => {
                write!(f, "state={:?}, command={:?}", state, command)
            }
        }
    }
}

/// Flat codes from 0x100 upwards
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CommunicationCause {
    Io,
    InvalidInput,
    Timeout,
    Nack,
    Checksum,
    Busy,
    BadResponse,
    ResponseOverflow,
    BadFile,
    BadBlockNumber,
    OutOfSequence,
    Unresponsive,
    Closed,
    EchoFault,
    Unknown(u16),
}

impl CommunicationCause {
    fn from_code(code: u16) -> Self {
        match code {
            0x100 => Self::Io,
            0x101 => Self::InvalidInput,
            0x102 => Self::Timeout,
            0x103 => Self::Nack,
            0x104 => Self::Checksum,
            0x105 => Self::Busy,
            0x106 => Self::BadResponse,
            0x107 => Self::ResponseOverflow,
            0x108 => Self::BadFile,
            0x10A => Self::BadBlockNumber,
            0x10B => Self::OutOfSequence,
            0x10C => Self::Unresponsive,
            0x10D => Self::Closed,
            0x10E => Self::EchoFault,
            other => Self::Unknown(other),
        }
    }
}

/// High nibble of a device code
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DeviceState {
    Ok,
    PaperOut,
    RegistersOverflow,
    ClockNotSet,
    FiscalReceiptOpen,
    PaymentResidue,
    NonFiscalReceiptOpen,
    PaymentNotClosed,
    ReadOnlyMemory,
    BadPassword,
    DisplayMissing,
    DailyReportDue,
    Overheated,
    PowerLossInReceipt,
    JournalFull,
    InsufficientConditions,
}

impl DeviceState {
    pub fn from_nibble(nibble: u8) -> Self {
        match nibble & 0x0F {
            0x0 => Self::Ok,
            0x1 => Self::PaperOut,
            0x2 => Self::RegistersOverflow,
            0x3 => Self::ClockNotSet,
            0x4 => Self::FiscalReceiptOpen,
            0x5 => Self::PaymentResidue,
            0x6 => Self::NonFiscalReceiptOpen,
            0x7 => Self::PaymentNotClosed,
            0x8 => Self::ReadOnlyMemory,
            0x9 => Self::BadPassword,
            0xA => Self::DisplayMissing,
            0xB => Self::DailyReportDue,
            0xC => Self::Overheated,
            0xD => Self::PowerLossInReceipt,
            0xE => Self::JournalFull,
            _ => Self::InsufficientConditions,
        }
    }

    pub fn nibble(self) -> u8 {
        self as u8
    }
}

/// Low nibble of a device code
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CommandRejection {
    Ok,
    Invalid,
    Illegal,
    DailyReportNotZero,
    SyntaxError,
    InputOverflow,
    ZeroInput,
    CorrectionUnavailable,
    InsufficientSubtotal,
    /// Nibble values without a documented meaning, kept raw
    Unknown(u8),
}

impl CommandRejection {
    pub fn from_nibble(nibble: u8) -> Self {
        match nibble & 0x0F {
            0x0 => Self::Ok,
            0x1 => Self::Invalid,
            0x2 => Self::Illegal,
            0x3 => Self::DailyReportNotZero,
            0x4 => Self::SyntaxError,
            0x5 => Self::InputOverflow,
            0x6 => Self::ZeroInput,
            0x7 => Self::CorrectionUnavailable,
            0x8 => Self::InsufficientSubtotal,
            other => Self::Unknown(other),
        }
    }

    pub fn nibble(self) -> u8 {
        match self {
            Self::Ok => 0x0,
            Self::Invalid => 0x1,
            Self::Illegal => 0x2,
            Self::DailyReportNotZero => 0x3,
            Self::SyntaxError => 0x4,
            Self::InputOverflow => 0x5,
            Self::ZeroInput => 0x6,
            Self::CorrectionUnavailable => 0x7,
            Self::InsufficientSubtotal => 0x8,
            Self::Unknown(raw) => raw,
        }
    }
}
