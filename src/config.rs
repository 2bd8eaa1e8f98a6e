//! Seed derivation options.
//!
//! Passed from JS as a plain object (`{ byteMix: "decimalAsHex" }`) or built
//! directly in Rust. Missing fields fall back to defaults.

use serde::{Deserialize, Serialize};

/// How each XOR-ed byte is added to the seed accumulator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ByteMix {
    /// Add the byte value itself.
    #[default]
    Raw,
    /// Add the byte's decimal digits re-read as hex (byte 170 adds 0x170).
    /// Matches seeds published by the deployed JS implementation.
    DecimalAsHex,
}

impl ByteMix {
    /// Value added to the accumulator for one mixed byte.
    #[inline(always)]
    pub fn contribution(self, byte: u8) -> u32 {
        match self {
            ByteMix::Raw => byte as u32,
            ByteMix::DecimalAsHex => {
                let (hundreds, tens, ones) = (byte / 100, byte / 10 % 10, byte % 10);
                ((hundreds as u32) << 8) | ((tens as u32) << 4) | ones as u32
            }
        }
    }
}

/// Options for `derive_seed_with` and `derive_seed_from_hash`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeriveConfig {
    pub byte_mix: ByteMix,
}
