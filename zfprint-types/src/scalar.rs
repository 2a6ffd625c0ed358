//! Single-value responses

use crate::error::Result;
use crate::fields;

/// Firmware version: the whole payload, trimmed
pub fn version(payload: &[u8]) -> String {
    fields::text(payload)
}

/// Tax number in `[0..13]`
pub fn tax_number(payload: &[u8]) -> Result<String> {
    let end = payload.len().min(13);
    Ok(fields::text(fields::slice("tax number", payload, 0, end)?))
}

/// Decimal point position, first byte
pub fn decimal_point(payload: &[u8]) -> Result<u8> {
    let digit = fields::slice("decimal point", payload, 0, 1)?;
    fields::number("decimal point", &fields::text(digit))
}

/// Counters (last receipt number, free fiscal blocks) followed by a 3-byte trailer
pub fn counter(payload: &[u8]) -> Result<u32> {
    let body = fields::without_trailer("counter", payload, 3)?;
    fields::number("counter", &fields::text(body))
}

/// Header/footer line: drops the echoed `N;` prefix and one trailing byte
pub fn header_line(payload: &[u8]) -> Result<String> {
    let end = payload.len().saturating_sub(1);
    let line = fields::slice("header line", payload, 2, end)?;
    Ok(crate::text::decode(line).trim_end().to_owned())
}

/// Subtotal amount, the whole payload
pub fn amount(payload: &[u8]) -> Result<f64> {
    fields::number("amount", &fields::text(payload))
}
