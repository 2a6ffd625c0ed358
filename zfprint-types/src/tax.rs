//! Per tax group values: rates or daily sums

use crate::error::{Error, Result};
use crate::fields;

/// One value per tax group, in group order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaxTable {
    values: Vec<f64>,
}

impl TaxTable {
    /// Decode tax rates, `R1%;R2%;R3%`
    pub fn decode_percents(payload: &[u8]) -> Result<Self> {
        Self::decode(payload, &['%', ';'])
    }

    /// Decode daily sums, `S1;S2;...`
    pub fn decode_sums(payload: &[u8]) -> Result<Self> {
        Self::decode(payload, &[';'])
    }

    fn decode(payload: &[u8], separators: &[char]) -> Result<Self> {
        let text = fields::text(payload);
        let values = fields::split(&text, separators)
            .into_iter()
            .filter(|t| !t.trim().is_empty())
            .map(|t| fields::number("tax group value", t))
            .collect::<Result<Vec<f64>>>()?;

        if values.is_empty() {
            return Err(Error::Validation("tax table is empty".into()));
        }
        Ok(Self { values })
    }

    /// Value for a 0-based group index
    pub fn get(&self, group: usize) -> Option<f64> {
        self.values.get(group).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}
