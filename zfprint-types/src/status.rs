//! Device status bytes

use std::fmt;

use bitflags::bitflags;

use crate::error::{Error, Result};

/// Number of status bytes every device reports
pub const MIN_STATUS_BYTES: usize = 5;

bitflags! {
    /// Status bits, numbered `byte * 8 + bit`
    ///
    /// Bit 7 of every status byte is always set on the wire and carries no
    /// meaning.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StatusFlags: u64 {
        // Byte 0: general
        const READ_ONLY_FISCAL_MEMORY = 1 << 0;
        const POWER_DOWN_IN_RECEIPT = 1 << 1;
        const PRINTER_OVERHEAT = 1 << 2;
        const CLOCK_NOT_SET = 1 << 3;
        const INCORRECT_DATE = 1 << 4;
        const RAM_RESET = 1 << 5;
        const HARDWARE_CLOCK_ERROR = 1 << 6;

        // Byte 1: printer and registers
        const PAPER_OUT = 1 << 8;
        const REPORTS_OVERFLOW = 1 << 9;
        const DAILY_REPORT_NOT_ZEROED = 1 << 11;
        const ARTICLE_REPORT_NOT_ZEROED = 1 << 12;
        const OPERATOR_REPORT_NOT_ZEROED = 1 << 13;
        const DUPLICATE_PRINTED = 1 << 14;

        // Byte 2: receipts
        const NON_FISCAL_RECEIPT_OPEN = 1 << 16;
        const FISCAL_RECEIPT_OPEN = 1 << 17;
        const INVOICE_OPEN = 1 << 18;
        const VAT_INCLUDED = 1 << 19;
        const DETAILED_RECEIPT = 1 << 20;

        // Byte 3: peripherals
        const LOW_BATTERY = 1 << 24;
        const EXTERNAL_DISPLAY_MISSING = 1 << 25;

        // Byte 4: fiscal memory
        const FISCAL_MEMORY_ALMOST_FULL = 1 << 32;
        const FISCAL_MEMORY_FULL = 1 << 33;
        const TAX_NUMBER_SET = 1 << 36;
        const SERIAL_NUMBER_SET = 1 << 37;
        const FISCALIZED = 1 << 38;
    }
}

/// Decoded status response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceStatus {
    raw: Vec<u8>,
    flags: StatusFlags,
}

impl DeviceStatus {
    pub fn decode(payload: &[u8]) -> Result<Self> {
        if payload.len() < MIN_STATUS_BYTES {
            return Err(Error::TooShort {
                record: "status",
                expected: MIN_STATUS_BYTES,
                actual: payload.len(),
            });
        }

        let bits = payload
            .iter()
            .take(8)
            .enumerate()
            .fold(0u64, |acc, (i, byte)| acc | (u64::from(byte & 0x7F) << (i * 8)));

        Ok(Self {
            raw: payload.to_vec(),
            flags: StatusFlags::from_bits_retain(bits),
        })
    }

    pub fn flags(&self) -> StatusFlags {
        self.flags
    }

    /// Raw status bytes as received
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Test a bit by byte and bit index
    pub fn bit(&self, byte: usize, bit: u8) -> bool {
        self.raw
            .get(byte)
            .is_some_and(|b| bit < 7 && b & (1 << bit) != 0)
    }

    pub fn is_receipt_open(&self) -> bool {
        self.flags.intersects(
            StatusFlags::FISCAL_RECEIPT_OPEN
                | StatusFlags::NON_FISCAL_RECEIPT_OPEN
                | StatusFlags::INVOICE_OPEN,
        )
    }

    pub fn is_fiscalized(&self) -> bool {
        self.flags.contains(StatusFlags::FISCALIZED)
    }

    pub fn is_paper_out(&self) -> bool {
        self.flags.contains(StatusFlags::PAPER_OUT)
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Status[")?;
        for (i, (name, _)) in self.flags.iter_names().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", name)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_flags() {
        let status = DeviceStatus::decode(&[0x80, 0x81, 0x82, 0x80, 0xC0]).unwrap();

        assert!(status.is_paper_out());
        assert!(status.flags().contains(StatusFlags::FISCAL_RECEIPT_OPEN));
        assert!(status.is_receipt_open());
        assert!(status.is_fiscalized());
        assert!(!status.flags().contains(StatusFlags::CLOCK_NOT_SET));
        assert!(status.bit(1, 0));
        assert!(!status.bit(0, 7));
    }

    #[test]
    fn test_bit_seven_ignored() {
        let status = DeviceStatus::decode(&[0x80; 5]).unwrap();
        assert!(status.flags().is_empty());
        assert_eq!(status.to_string(), "Status[]");
    }

    #[test]
    fn test_too_short() {
        assert!(matches!(
            DeviceStatus::decode(&[0x80; 4]),
            Err(Error::TooShort { expected: 5, actual: 4, .. })
        ));
    }

    #[test]
    fn test_display_names_flags() {
        let status = DeviceStatus::decode(&[0x88, 0x80, 0x80, 0x80, 0x80, 0x80]).unwrap();
        assert_eq!(status.to_string(), "Status[CLOCK_NOT_SET]");
    }
}
