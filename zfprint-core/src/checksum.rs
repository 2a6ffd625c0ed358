//! ZFP frame checksum
//!
//! The checksum is the XOR of every byte between the start marker
//! (exclusive) and the checksum field (exclusive). It travels as two
//! printable ASCII bytes: the high nibble OR 0x30, then the low nibble
//! OR 0x30.

use tracing::trace;

/// XOR all bytes of the checksummed span
pub fn xor(span: &[u8]) -> u8 {
    span.iter().fold(0, |acc, b| acc ^ b)
}

/// Calculate the two checksum bytes for a span
///
/// # Examples
///
/// ```
/// use zfprint_core::checksum;
///
/// // LEN, SEQ, CMD of an empty status request
/// let cs = checksum::calculate(&[0x23, 0x21, 0x20]);
/// assert_eq!(cs, [0x32, 0x32]);
/// ```
pub fn calculate(span: &[u8]) -> [u8; 2] {
    let crc = xor(span);
    let encoded = [((crc >> 4) & 0x0F) | 0x30, (crc & 0x0F) | 0x30];

    trace!(
        span_len = span.len(),
        checksum = format!("0x{:02X}", crc),
        "Calculated checksum"
    );

    encoded
}

/// Verify received checksum bytes against a span
pub fn verify(span: &[u8], received: [u8; 2]) -> bool {
    calculate(span) == received
}
