//! Operator records

use crate::error::Result;
use crate::fields;

#[derive(Debug, Clone, PartialEq)]
pub struct OperatorInfo {
    pub number: u8,
    pub name: String,
    pub password: String,
    /// Receipts issued since the last operator report
    pub receipts: u32,
    pub sales: u32,
    pub turnover: f64,
}

impl OperatorInfo {
    /// Decode `N;name;pass;receipts;sales;turnover`
    pub fn decode(payload: &[u8]) -> Result<Self> {
        let text = crate::text::decode(payload);
        let tokens = fields::exact("operator", text.trim_end(), &[';'], 6)?;

        Ok(Self {
            number: fields::number("operator", tokens[0])?,
            name: tokens[1].trim().to_owned(),
            password: tokens[2].trim().to_owned(),
            receipts: fields::number("receipts", tokens[3])?,
            sales: fields::number("sales", tokens[4])?,
            turnover: fields::number("turnover", tokens[5])?,
        })
    }
}
