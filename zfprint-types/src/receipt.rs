//! Current receipt state

use crate::error::Result;
use crate::fields;

#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptInfo {
    pub open: bool,
    pub invoice: bool,
    pub items: u32,
    pub subtotal: f64,
    pub paid: f64,
}

impl ReceiptInfo {
    /// Decode `open;invoice;items;subtotal;paid`
    pub fn decode(payload: &[u8]) -> Result<Self> {
        let text = fields::text(payload);
        let tokens = fields::exact("receipt", &text, &[';'], 5)?;

        Ok(Self {
            open: fields::flag("open", tokens[0])?,
            invoice: fields::flag("invoice", tokens[1])?,
            items: fields::number("items", tokens[2])?,
            subtotal: fields::number("subtotal", tokens[3])?,
            paid: fields::number("paid", tokens[4])?,
        })
    }

    /// Amount still due
    pub fn remaining(&self) -> f64 {
        self.subtotal - self.paid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode() {
        let info = ReceiptInfo::decode(b"1;0;3;12.50;10.00").unwrap();
        assert!(info.open);
        assert!(!info.invoice);
        assert_eq!(info.items, 3);
        assert_eq!(info.remaining(), 2.5);
    }

    #[test]
    fn test_malformed() {
        assert!(ReceiptInfo::decode(b"1;0;three;12.50;10.00").is_err());
    }
}
