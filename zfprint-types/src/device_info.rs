//! Device identification

use std::fmt;

use crate::error::Result;
use crate::fields;

/// Device identification numbers and firmware
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Factory (serial) number
    pub factory_number: String,

    /// Fiscal memory number
    pub fiscal_memory_number: String,

    /// Firmware version, when queried
    pub firmware_version: Option<String>,
}

impl DeviceInfo {
    pub fn new(factory_number: String, fiscal_memory_number: String) -> Self {
        Self {
            factory_number,
            fiscal_memory_number,
            firmware_version: None,
        }
    }

    /// Decode the serial numbers payload: factory in `[0..8]`, fiscal memory in `[9..17]`
    pub fn decode(payload: &[u8]) -> Result<Self> {
        let factory = fields::slice("serial numbers", payload, 0, 8)?;
        let fiscal = fields::slice("serial numbers", payload, 9, 17)?;
        Ok(Self::new(fields::text(factory), fields::text(fiscal)))
    }

    pub fn with_firmware_version(mut self, version: impl Into<String>) -> Self {
        self.firmware_version = Some(version.into());
        self
    }
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Device[SN: {}, FM: {}",
            self.factory_number, self.fiscal_memory_number
        )?;
        if let Some(version) = &self.firmware_version {
            write!(f, ", FW: {}", version)?;
        }
        write!(f, "]")
    }
}
