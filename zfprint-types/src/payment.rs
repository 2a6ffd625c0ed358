//! Payment type names

use crate::error::{Error, Result};
use crate::fields;

/// Names of the payment types, in type order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentTypes {
    names: Vec<String>,
}

impl PaymentTypes {
    pub fn decode(payload: &[u8]) -> Result<Self> {
        let text = crate::text::decode(payload);
        let names: Vec<String> = fields::split(&text, &[';'])
            .into_iter()
            .map(|name| name.trim().to_owned())
            .collect();

        if names.iter().all(String::is_empty) {
            return Err(Error::Validation("no payment types".into()));
        }
        Ok(Self { names })
    }

    pub fn name(&self, kind: usize) -> Option<&str> {
        self.names.get(kind).map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}
