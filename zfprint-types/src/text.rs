//! Device code page
//!
//! Windows-1251: ASCII in the lower half, Cyrillic and typographic
//! symbols in the upper half.

use encoding_rs::WINDOWS_1251;

/// Decode device bytes into a string
pub fn decode(bytes: &[u8]) -> String {
    WINDOWS_1251
        .decode_without_bom_handling(bytes)
        .0
        .into_owned()
}
