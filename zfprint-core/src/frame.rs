//! ZFP frame structure and encoding/decoding

use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;

use crate::{
    checksum,
    command::Command,
    constants::{logo, ACK, ANTIECHO, END, LENGTH_OFFSET, NACK, RETRY, STX},
    error::{Error, Result},
};

/// ZFP protocol frame
///
/// # Frame Structure
///
/// ```text
/// ┌───────┬────────┬───────┬───────┬───────────┬──────────┬───────┐
/// │  STX  │ LENGTH │  SEQ  │  CMD  │  Payload  │ Checksum │  END  │
/// │ 0x02  │ N+0x23 │ 1 B   │ 1 B   │  N bytes  │ 2 bytes  │ 0x0A  │
/// └───────┴────────┴───────┴───────┴───────────┴──────────┴───────┘
/// ```
///
/// The checksum covers LENGTH through the last payload byte.
///
/// # Examples
///
/// ```
/// use zfprint_core::{Command, Frame};
///
/// let frame = Frame::new(0x21, Command::GetStatus, Vec::new());
/// let encoded = frame.encode().unwrap();
///
/// let decoded = Frame::decode(&encoded).unwrap();
/// assert_eq!(frame, decoded);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    /// Sequence number (NBL)
    pub sequence: u8,

    /// Raw command byte
    pub command: u8,

    /// Command-specific data
    pub payload: Bytes,
}

impl Frame {
    /// Bytes around the payload: STX, LENGTH, SEQ, CMD, 2x checksum, END
    pub const OVERHEAD: usize = 7;

    /// Largest payload the LENGTH byte can describe
    pub const MAX_PAYLOAD_SIZE: usize = (u8::MAX - LENGTH_OFFSET) as usize;

    pub fn new(sequence: u8, command: Command, payload: impl Into<Bytes>) -> Self {
        Self::with_raw_command(sequence, command.code(), payload)
    }

    pub fn with_raw_command(sequence: u8, command: u8, payload: impl Into<Bytes>) -> Self {
        Self {
            sequence,
            command,
            payload: payload.into(),
        }
    }

    /// Decoded command, if the byte is known
    pub fn command(&self) -> Result<Command> {
        Command::try_from(self.command)
    }

    /// Encode frame to bytes
    ///
    /// # Errors
    ///
    /// Returns [`Error::PayloadTooLarge`] when the payload does not fit the
    /// LENGTH byte.
    pub fn encode(&self) -> Result<BytesMut> {
        let len = self.payload.len();
        if len > Self::MAX_PAYLOAD_SIZE {
            return Err(Error::PayloadTooLarge {
                size: len,
                max: Self::MAX_PAYLOAD_SIZE,
            });
        }

        let mut buf = BytesMut::with_capacity(Self::OVERHEAD + len);
        buf.put_u8(STX);
        buf.put_u8(len as u8 + LENGTH_OFFSET);
        buf.put_u8(self.sequence);
        buf.put_u8(self.command);
        buf.put_slice(&self.payload);

        let cs = checksum::calculate(&buf[1..]);
        buf.put_slice(&cs);
        buf.put_u8(END);

        Ok(buf)
    }

    /// Decode and validate a complete frame
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Buffer is shorter than [`Frame::OVERHEAD`]
    /// - Start or end marker is wrong
    /// - LENGTH disagrees with the byte count
    /// - Checksum verification fails
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < Self::OVERHEAD {
            return Err(Error::FrameTooShort {
                expected: Self::OVERHEAD,
                actual: buf.len(),
            });
        }
        if buf[0] != STX {
            return Err(Error::UnexpectedMarker(buf[0]));
        }
        let last = buf[buf.len() - 1];
        if last != END {
            return Err(Error::MissingTerminator(last));
        }

        let payload_len = buf.len() - Self::OVERHEAD;
        if payload_len > Self::MAX_PAYLOAD_SIZE || buf[1] != payload_len as u8 + LENGTH_OFFSET {
            return Err(Error::LengthMismatch {
                header: buf[1],
                payload_len,
            });
        }

        verify_checksum(buf)?;

        Ok(Self {
            sequence: buf[2],
            command: buf[3],
            payload: Bytes::copy_from_slice(&buf[4..4 + payload_len]),
        })
    }

    /// Get total frame size
    pub fn size(&self) -> usize {
        Self::OVERHEAD + self.payload.len()
    }
}

/// Build an outbound frame
pub fn build_frame(sequence: u8, command: u8, payload: &[u8]) -> Result<BytesMut> {
    Frame::with_raw_command(sequence, command, Bytes::copy_from_slice(payload)).encode()
}

/// Parse and validate an inbound data frame
pub fn parse_frame(buf: &[u8]) -> Result<Frame> {
    Frame::decode(buf)
}

/// Build the fixed-size logo upload frame
///
/// The logo does not go through the general frame layout: it is a fixed
/// header followed by the raw bitmap, with no checksum or terminator.
pub fn logo_frame(bitmap: &[u8]) -> Result<BytesMut> {
    if bitmap.len() != logo::BITMAP_SIZE {
        return Err(Error::InvalidLogo {
            expected: logo::BITMAP_SIZE,
            actual: bitmap.len(),
        });
    }

    let mut buf = BytesMut::with_capacity(logo::FRAME_SIZE);
    buf.put_slice(&logo::HEADER);
    buf.put_slice(bitmap);
    Ok(buf)
}

fn verify_checksum(buf: &[u8]) -> Result<()> {
    let cs_at = buf.len() - 3;
    let received = [buf[cs_at], buf[cs_at + 1]];
    let expected = checksum::calculate(&buf[1..cs_at]);
    if expected != received {
        return Err(Error::ChecksumMismatch { expected, received });
    }
    Ok(())
}

/// Classification of the first byte of an inbound response
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ControlByte {
    Ack,
    Nack,
    Stx,
    Retry,
    Antiecho,
}

impl ControlByte {
    pub fn classify(byte: u8) -> Option<Self> {
        match byte {
            ACK => Some(Self::Ack),
            NACK => Some(Self::Nack),
            STX => Some(Self::Stx),
            RETRY => Some(Self::Retry),
            ANTIECHO => Some(Self::Antiecho),
            _ => None,
        }
    }
}

/// Validated device response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Short acknowledgement carrying the device error byte (0 = success)
    Ack { status: u8 },

    /// Full data frame
    Data(Frame),
}

impl Response {
    /// Smallest acknowledgement: ACK, one header byte, two hex digits, checksum, END
    pub const ACK_SIZE: usize = 7;

    /// Decode a buffer that starts with ACK or STX and ends with END
    pub fn decode(buf: &[u8]) -> Result<Self> {
        match buf.first().copied() {
            Some(ACK) => Self::decode_ack(buf),
            Some(STX) => Frame::decode(buf).map(Self::Data),
            Some(other) => Err(Error::UnexpectedMarker(other)),
            None => Err(Error::FrameTooShort {
                expected: Self::ACK_SIZE,
                actual: 0,
            }),
        }
    }

    fn decode_ack(buf: &[u8]) -> Result<Self> {
        if buf.len() < Self::ACK_SIZE {
            return Err(Error::FrameTooShort {
                expected: Self::ACK_SIZE,
                actual: buf.len(),
            });
        }
        let last = buf[buf.len() - 1];
        if last != END {
            return Err(Error::MissingTerminator(last));
        }

        verify_checksum(buf)?;

        let digits = [buf[2], buf[3]];
        let status = std::str::from_utf8(&digits)
            .ok()
            .and_then(|s| u8::from_str_radix(s, 16).ok())
            .ok_or(Error::MalformedStatus(digits))?;

        Ok(Self::Ack { status })
    }

    /// Payload of a data response, empty for an acknowledgement
    pub fn payload(&self) -> &[u8] {
        match self {
            Self::Ack { .. } => &[],
            Self::Data(frame) => &frame.payload,
        }
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("sequence", &format!("0x{:02X}", self.sequence))
            .field("command", &format!("0x{:02X}", self.command))
            .field("payload", &hex::encode(&self.payload))
            .finish()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.command() {
            Ok(cmd) => write!(
                f,
                "Frame[{}](seq=0x{:02X}, len={})",
                cmd,
                self.sequence,
                self.payload.len()
            ),
            Err(_) => write!(
                f,
                "Frame[0x{:02X}](seq=0x{:02X}, len={})",
                self.command,
                self.sequence,
                self.payload.len()
            ),
        }
    }
}
