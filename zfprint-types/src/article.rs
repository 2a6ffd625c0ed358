//! Article records from the device database

use chrono::NaiveDateTime;

use crate::error::{Error, Result};
use crate::{datetime, fields};

const RECORD: &str = "article";

/// Article programmed in the device
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub number: u32,
    pub name: String,
    pub price: f64,
    pub tax_group: char,
    pub turnover: f64,
    pub sales: f64,
    /// Number of the last article report
    pub report_counter: u32,
    /// Time of the last article report
    pub report_at: NaiveDateTime,
}

impl Article {
    /// Decode the article query payload
    ///
    /// Layout: `NNNNN;` then the name in `[6..26]`, a separator, five
    /// `;`-separated values (price, tax group, turnover, sales, report
    /// counter), a separator, the 16-byte last report date/time and one
    /// trailing byte.
    pub fn decode(number: u32, payload: &[u8]) -> Result<Self> {
        let len = payload.len();
        let name = fields::text(fields::slice(RECORD, payload, 6, 26)?);

        let values = fields::text(fields::slice(RECORD, payload, 27, len.saturating_sub(18))?);
        let tokens = fields::exact(RECORD, &values, &[';'], 5)?;

        let stamp = fields::slice(RECORD, payload, len.saturating_sub(17), len.saturating_sub(1))?;
        let report_at = datetime::parse(&fields::text(stamp))?;

        let tax_group = tokens[1]
            .trim()
            .chars()
            .next()
            .ok_or_else(|| Error::Parse("article: empty tax group".into()))?;

        Ok(Self {
            number,
            name,
            price: fields::number("price", tokens[0])?,
            tax_group,
            turnover: fields::number("turnover", tokens[2])?,
            sales: fields::number("sales", tokens[3])?,
            report_counter: fields::number("report counter", tokens[4])?,
            report_at,
        })
    }
}
