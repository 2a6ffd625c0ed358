//! Printer configuration

use std::time::Duration;

use zfprint_core::constants::{
    DEFAULT_PROBE_RETRIES, DEFAULT_PROBE_TIMEOUT_MS, DEFAULT_RESPONSE_TIMEOUT_MS,
};

/// Timing of the per-command exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrinterConfig {
    /// Wait for one liveness or busy probe to be answered
    pub probe_timeout: Duration,

    /// Probe attempts before giving up
    pub probe_retries: u32,

    /// Wait for the response to a command frame
    pub response_timeout: Duration,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_millis(DEFAULT_PROBE_TIMEOUT_MS),
            probe_retries: DEFAULT_PROBE_RETRIES,
            response_timeout: Duration::from_millis(DEFAULT_RESPONSE_TIMEOUT_MS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PrinterConfig::default();
        assert_eq!(config.probe_timeout, Duration::from_secs(1));
        assert_eq!(config.probe_retries, 10);
        assert_eq!(config.response_timeout, Duration::from_secs(3));
    }
}
