//! Fixed-width field encoding for command payloads
//!
//! Text goes out in the Windows-1251 device code page; characters it cannot
//! represent are sent as `?`. Widths count characters, so one character is
//! always one byte on the wire.

use bytes::{BufMut, Bytes, BytesMut};
use encoding_rs::WINDOWS_1251;

use crate::constants::Align;
use crate::error::{Error, Result};

/// Field separator
pub const SEPARATOR: u8 = b';';

/// Width of an amount or quantity field
pub const AMOUNT_WIDTH: usize = 10;

/// Slack for binary representation error when truncating a scaled amount
const TRUNCATE_TOLERANCE: f64 = 1e-6;

/// Map one character to its device byte
pub fn device_byte(c: char) -> u8 {
    if c.is_ascii() {
        return c as u8;
    }

    let mut utf8 = [0u8; 4];
    let (bytes, _, unmappable) = WINDOWS_1251.encode(c.encode_utf8(&mut utf8));
    match bytes.as_ref() {
        [byte] if !unmappable => *byte,
        _ => b'?',
    }
}

/// Truncate text to `max` characters without padding
pub fn truncate(text: &str, max: usize) -> Vec<u8> {
    text.chars().take(max).map(device_byte).collect()
}

/// Encode text into exactly `width` bytes
///
/// Longer text is truncated. Centered text that does not leave any room
/// is laid out left aligned.
pub fn fixed(text: &str, width: usize, align: Align) -> Vec<u8> {
    let body = truncate(text, width);
    let room = width - body.len();

    let left = match align {
        Align::Left => 0,
        Align::Right => room,
        Align::Center if text.chars().count() >= width => 0,
        Align::Center => room / 2,
    };

    let mut out = Vec::with_capacity(width);
    out.resize(left, b' ');
    out.extend_from_slice(&body);
    out.resize(width, b' ');
    out
}

/// Zero-padded unsigned number, e.g. `number(7, 5)` is `00007`
pub fn number(value: u32, width: usize) -> String {
    format!("{:0width$}", value, width = width)
}

/// Boolean flag as `0`/`1`
pub fn flag(value: bool) -> char {
    if value { '1' } else { '0' }
}

fn ensure_finite(value: f64, what: &'static str) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::NonFinite(what))
    }
}

/// Format with `decimals` fractional digits, truncating toward zero
///
/// Values a hair below a digit boundary only through float noise, like
/// `0.29 * 100.0 == 28.999999999999996`, are taken at the boundary.
fn truncated(value: f64, decimals: usize) -> String {
    let scale = 10f64.powi(decimals as i32);
    let scaled = value * scale;
    let whole = (scaled + scaled.signum() * TRUNCATE_TOLERANCE).trunc();
    // no "-0.00"
    let whole = if whole == 0.0 { 0.0 } else { whole };
    format!("{:.*}", decimals, whole / scale)
}

/// Left-pad with zeros after the sign, like `%0Nf`
fn zero_pad(text: &str, width: usize) -> String {
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let fill = width.saturating_sub(sign.len() + digits.len());
    format!("{}{}{}", sign, "0".repeat(fill), digits)
}

/// Encode an amount or quantity into a 10-character field
///
/// Values above 9,999,999.99 (2 decimals) or 999,999.999 (otherwise) fall
/// back to a whole-number representation. A result whose tenth character
/// is the decimal point is cut to nine characters.
///
/// ```
/// use zfprint_core::encoding::amount;
///
/// assert_eq!(amount(2.345, 2).unwrap(), "0000002.34");
/// assert_eq!(amount(1.5, 3).unwrap(), "000001.500");
/// assert_eq!(amount(12_345_678.9, 2).unwrap(), "12345678");
/// ```
pub fn amount(value: f64, decimals: usize) -> Result<String> {
    ensure_finite(value, "amount")?;

    let max = if decimals == 2 { 9_999_999.99 } else { 999_999.999 };
    let mut text = if value > max {
        truncated(value, 0)
    } else {
        zero_pad(&truncated(value, decimals), AMOUNT_WIDTH)
    };

    if text.as_bytes().get(9) == Some(&b'.') {
        text.truncate(9);
    }

    Ok(text)
}

/// Signed discount/surcharge percentage, `%6.2f%`
pub fn percent(value: f64) -> Result<String> {
    ensure_finite(value, "percent")?;
    Ok(format!("{:6.2}%", value))
}

/// Tax rate, `%.2f%`
pub fn rate(value: f64) -> Result<String> {
    ensure_finite(value, "tax rate")?;
    Ok(format!("{:.2}%", value))
}

/// Builder for `;`-delimited payloads
#[derive(Debug, Default)]
pub struct PayloadBuilder {
    buf: BytesMut,
}

impl PayloadBuilder {
    pub fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(64),
        }
    }

    /// Append raw ASCII
    pub fn push_str(mut self, s: &str) -> Self {
        self.buf.put_slice(&truncate(s, usize::MAX));
        self
    }

    pub fn push_char(mut self, c: char) -> Self {
        self.buf.put_u8(device_byte(c));
        self
    }

    pub fn push_bytes(mut self, bytes: &[u8]) -> Self {
        self.buf.put_slice(bytes);
        self
    }

    /// Append text in a fixed-width, left-aligned field
    pub fn text(self, text: &str, width: usize) -> Self {
        self.push_bytes(&fixed(text, width, Align::Left))
    }

    /// Append text truncated to `max` characters, no padding
    pub fn text_max(self, text: &str, max: usize) -> Self {
        self.push_bytes(&truncate(text, max))
    }

    pub fn flag(self, value: bool) -> Self {
        self.push_char(flag(value))
    }

    pub fn sep(mut self) -> Self {
        self.buf.put_u8(SEPARATOR);
        self
    }

    pub fn finish(self) -> Bytes {
        self.buf.freeze()
    }
}
