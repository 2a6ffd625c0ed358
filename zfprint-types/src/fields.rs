//! Field extraction helpers shared by the record decoders

use std::str::FromStr;

use crate::error::{Error, Result};
use crate::text;

/// Bytes `[start..end]`, failing if the payload is shorter
pub(crate) fn slice<'a>(
    record: &'static str,
    payload: &'a [u8],
    start: usize,
    end: usize,
) -> Result<&'a [u8]> {
    if start > end || end > payload.len() {
        return Err(Error::TooShort {
            record,
            expected: end.max(start),
            actual: payload.len(),
        });
    }
    Ok(&payload[start..end])
}

/// Payload minus `trailer` bytes at the end
pub(crate) fn without_trailer<'a>(
    record: &'static str,
    payload: &'a [u8],
    trailer: usize,
) -> Result<&'a [u8]> {
    let end = payload.len().checked_sub(trailer).ok_or(Error::TooShort {
        record,
        expected: trailer,
        actual: payload.len(),
    })?;
    Ok(&payload[..end])
}

/// Decoded, trimmed text
pub(crate) fn text(bytes: &[u8]) -> String {
    text::decode(bytes).trim().to_owned()
}

/// Split on any of `separators`, keeping empty tokens
pub(crate) fn split<'a>(text: &'a str, separators: &[char]) -> Vec<&'a str> {
    text.split(|c: char| separators.contains(&c)).collect()
}

/// Split into exactly `expected` tokens
pub(crate) fn exact<'a>(
    record: &'static str,
    text: &'a str,
    separators: &[char],
    expected: usize,
) -> Result<Vec<&'a str>> {
    let tokens = split(text, separators);
    if tokens.len() != expected {
        return Err(Error::FieldCount {
            record,
            expected,
            actual: tokens.len(),
        });
    }
    Ok(tokens)
}

/// Parse a trimmed token; decimals always use `.`
pub(crate) fn number<T: FromStr>(field: &str, token: &str) -> Result<T> {
    token
        .trim()
        .parse()
        .map_err(|_| Error::Parse(format!("{}: {:?} is not a number", field, token)))
}

/// `0`/`1` flag
pub(crate) fn flag(field: &str, token: &str) -> Result<bool> {
    match token.trim() {
        "0" => Ok(false),
        "1" => Ok(true),
        other => Err(Error::Parse(format!("{}: {:?} is not a flag", field, other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_bounds() {
        assert_eq!(slice("x", b"abcdef", 1, 3).unwrap(), b"bc");
        assert!(matches!(
            slice("x", b"abc", 1, 5),
            Err(Error::TooShort { expected: 5, actual: 3, .. })
        ));
    }

    #[test]
    fn test_exact() {
        assert_eq!(exact("x", "a;b;c", &[';'], 3).unwrap(), ["a", "b", "c"]);
        assert!(matches!(
            exact("x", "a;b", &[';'], 3),
            Err(Error::FieldCount { expected: 3, actual: 2, .. })
        ));
    }

    #[test]
    fn test_number_and_flag() {
        assert_eq!(number::<f64>("sum", " 12.50 ").unwrap(), 12.5);
        assert!(number::<u32>("count", "1,5").is_err());
        assert!(flag("logo", "1").unwrap());
        assert!(flag("logo", "2").is_err());
    }
}
