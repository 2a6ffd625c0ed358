//! Device date and time

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{Error, Result};
use crate::fields;

const SEPARATORS: [char; 4] = [' ', '-', ':', ';'];

/// Parse `DD-MM-YY HH:MM` (or a 4-digit year)
///
/// Two-digit years are taken as 20YY. Seconds are not reported by the
/// device and come back as zero.
///
/// ```
/// use zfprint_types::datetime::parse;
///
/// let at = parse("07-03-24 09:05").unwrap();
/// assert_eq!(at.to_string(), "2024-03-07 09:05:00");
/// ```
pub fn parse(text: &str) -> Result<NaiveDateTime> {
    let tokens: Vec<&str> = fields::split(text.trim(), &SEPARATORS)
        .into_iter()
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.len() != 5 {
        return Err(Error::FieldCount {
            record: "date/time",
            expected: 5,
            actual: tokens.len(),
        });
    }

    let day: u32 = fields::number("day", tokens[0])?;
    let month: u32 = fields::number("month", tokens[1])?;
    let mut year: i32 = fields::number("year", tokens[2])?;
    let hour: u32 = fields::number("hour", tokens[3])?;
    let minute: u32 = fields::number("minute", tokens[4])?;

    if tokens[2].len() <= 2 {
        year += 2000;
    }

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .ok_or_else(|| Error::Validation(format!("no such date/time: {:?}", text)))
}

/// Decode the date/time query payload
pub fn decode(payload: &[u8]) -> Result<NaiveDateTime> {
    parse(&fields::text(payload))
}
