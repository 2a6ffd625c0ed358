//! General device parameters

use crate::error::Result;
use crate::fields;

/// Parameters set with the parameters command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceParameters {
    pub pos_number: u32,
    pub print_logo: bool,
    pub open_till: bool,
    pub auto_cut: bool,
    pub transparent_display: bool,
}

impl DeviceParameters {
    /// Decode `NNNN;L;T;C;D`
    pub fn decode(payload: &[u8]) -> Result<Self> {
        let text = fields::text(payload);
        let tokens = fields::exact("parameters", &text, &[';'], 5)?;

        Ok(Self {
            pos_number: fields::number("POS number", tokens[0])?,
            print_logo: fields::flag("logo", tokens[1])?,
            open_till: fields::flag("till", tokens[2])?,
            auto_cut: fields::flag("auto cut", tokens[3])?,
            transparent_display: fields::flag("transparent display", tokens[4])?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode() {
        let params = DeviceParameters::decode(b"0012;1;0;1;0").unwrap();
        assert_eq!(
            params,
            DeviceParameters {
                pos_number: 12,
                print_logo: true,
                open_till: false,
                auto_cut: true,
                transparent_display: false,
            }
        );
    }

    #[test]
    fn test_bad_flag() {
        assert!(DeviceParameters::decode(b"0012;1;0;1;7").is_err());
        assert!(DeviceParameters::decode(b"0012;1;0;1").is_err());
    }
}
