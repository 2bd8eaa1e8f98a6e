//! Value types flowing through seed derivation.
//!
//! `BlockHash` and `Salt` are raw digests; `Seed` is the arbitrary-precision
//! accumulator produced by mixing them, rendered as a decimal string wherever
//! it leaves the crate.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Result, RngError};

/// Byte length of a SHA-256 digest.
pub const DIGEST_LEN: usize = 32;

/// Largest integer a JS number represents exactly.
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A JS number as an exact integer, or `None` if it is non-finite,
/// fractional, or beyond +/- `MAX_SAFE_INTEGER`.
pub fn safe_integer(value: f64) -> Option<i64> {
    if !value.is_finite() || value.fract() != 0.0 || value.abs() > MAX_SAFE_INTEGER {
        return None;
    }
    Some(value as i64)
}

/// Convert JS range bounds, rejecting anything `safe_integer` rejects.
pub fn range_bounds_from_f64(min: f64, max: f64) -> Result<(i64, i64)> {
    let convert = |name: &str, value: f64| {
        safe_integer(value).ok_or_else(|| RngError::InvalidNumber {
            message: format!("range {name} must be a safe integer, got {value}"),
        })
    };
    Ok((convert("min", min)?, convert("max", max)?))
}

/// Finalized block hash as returned by the chain client.
///
/// The length is whatever the chain's hash algorithm produces; it is only
/// checked against the salt when the two are mixed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockHash {
    bytes: Vec<u8>,
}

impl BlockHash {
    /// Decode a hex rendering (either case, no `0x` prefix).
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = hex::decode(hex_str).map_err(|e| {
            tracing::warn!(hash = hex_str, "malformed block hash hex");
            RngError::derivation(format!("block hash is not valid hex: {e}"))
        })?;
        Ok(Self { bytes })
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self { bytes: bytes.into() }
    }

    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Lowercase hex, the form chain clients publish.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

/// SHA-256 digest of a caller identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Salt {
    bytes: [u8; DIGEST_LEN],
}

impl Salt {
    /// Hash the UTF-8 bytes of `identifier`.
    pub fn for_identifier(identifier: &str) -> Self {
        let digest = Sha256::digest(identifier.as_bytes());
        let mut bytes = [0u8; DIGEST_LEN];
        bytes.copy_from_slice(digest.as_slice());
        Self { bytes }
    }

    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Lowercase hex digest, 64 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

/// Initial generator state derived from a block hash and a salt.
///
/// Serialized as a decimal string so published seeds survive JSON and JS
/// number precision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Seed(BigUint);

impl Seed {
    /// Shift the accumulator left by `shift` bits, then add `value`.
    #[inline(always)]
    pub(crate) fn shift_add(&mut self, shift: usize, value: u32) {
        self.0 <<= shift;
        self.0 += value;
    }

    /// The seed reduced modulo 2^32.
    pub fn low_u32(&self) -> u32 {
        self.0.iter_u32_digits().next().unwrap_or(0)
    }

    /// Significant bits in the accumulator.
    pub fn bits(&self) -> u64 {
        self.0.bits()
    }
}

impl From<u64> for Seed {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl From<BigUint> for Seed {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Seed {
    type Err = RngError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(RngError::InvalidSeed {
                message: format!("expected a non-negative decimal integer, got {s:?}"),
            });
        }
        BigUint::parse_bytes(s.as_bytes(), 10)
            .map(Self)
            .ok_or_else(|| RngError::InvalidSeed {
                message: format!("could not parse {s:?}"),
            })
    }
}

impl From<Seed> for String {
    fn from(seed: Seed) -> Self {
        seed.to_string()
    }
}

impl TryFrom<String> for Seed {
    type Error = RngError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salt_matches_known_digest() {
        let salt = Salt::for_identifier("abc");
        assert_eq!(
            salt.to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        let salt = Salt::for_identifier("user-123");
        assert_eq!(
            salt.to_hex(),
            "fcdec6df4d44dbc637c7c5b58efface52a7f8a88535423430255be0bb89bedd8"
        );
    }

    #[test]
    fn test_block_hash_hex_either_case() {
        let lower = BlockHash::from_hex("aabbcc").unwrap();
        let upper = BlockHash::from_hex("AABBCC").unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower.as_bytes(), &[0xaa, 0xbb, 0xcc]);
        assert_eq!(upper.to_hex(), "aabbcc");
    }

    #[test]
    fn test_block_hash_rejects_bad_hex() {
        assert!(matches!(
            BlockHash::from_hex("abc"),
            Err(RngError::Derivation { .. })
        ));
        assert!(matches!(
            BlockHash::from_hex("zz"),
            Err(RngError::Derivation { .. })
        ));
    }

    #[test]
    fn test_safe_integer() {
        assert_eq!(safe_integer(0.0), Some(0));
        assert_eq!(safe_integer(-7.0), Some(-7));
        assert_eq!(safe_integer(MAX_SAFE_INTEGER), Some(9_007_199_254_740_991));
        assert_eq!(safe_integer(-MAX_SAFE_INTEGER), Some(-9_007_199_254_740_991));
        for bad in [2.5, -0.5, f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 9_007_199_254_740_992.0] {
            assert_eq!(safe_integer(bad), None, "accepted {bad}");
        }
    }

    #[test]
    fn test_range_bounds_beyond_i32_kept_exact() {
        // These would wrap to (0, 5) and (-1, -1) as 32-bit integers.
        assert_eq!(range_bounds_from_f64(0.0, 4_294_967_301.0).unwrap(), (0, 4_294_967_301));
        assert_eq!(range_bounds_from_f64(-1.0, 4_294_967_295.0).unwrap(), (-1, 4_294_967_295));
        assert_eq!(range_bounds_from_f64(-2_147_483_649.0, 0.0).unwrap(), (-2_147_483_649, 0));
    }

    #[test]
    fn test_range_bounds_reject_fractional_and_huge() {
        assert!(matches!(range_bounds_from_f64(0.0, 2.5), Err(RngError::InvalidNumber { .. })));
        assert!(matches!(range_bounds_from_f64(f64::NAN, 1.0), Err(RngError::InvalidNumber { .. })));
        assert!(matches!(range_bounds_from_f64(0.0, 1e300), Err(RngError::InvalidNumber { .. })));
    }

    #[test]
    fn test_seed_shift_add() {
        let mut seed = Seed::default();
        seed.shift_add(2, 3);
        seed.shift_add(2, 1);
        // (3 << 2) + 1
        assert_eq!(seed, Seed::from(13));
    }

    #[test]
    fn test_seed_low_word() {
        let seed: Seed = "529589838520884285615".parse().unwrap();
        assert_eq!(seed.low_u32(), (529589838520884285615u128 % (1u128 << 32)) as u32);
        assert_eq!(Seed::default().low_u32(), 0);
        assert_eq!(seed.bits(), 69);
    }

    #[test]
    fn test_seed_decimal_parse_strict() {
        assert!("".parse::<Seed>().is_err());
        assert!("-1".parse::<Seed>().is_err());
        assert!("+1".parse::<Seed>().is_err());
        assert!("1_000".parse::<Seed>().is_err());
        assert_eq!("007".parse::<Seed>().unwrap(), Seed::from(7));
    }

    #[test]
    fn test_seed_serde_as_string() {
        let seed: Seed = "951303125290909056141".parse().unwrap();
        let json = serde_json::to_string(&seed).unwrap();
        assert_eq!(json, "\"951303125290909056141\"");
        let back: Seed = serde_json::from_str(&json).unwrap();
        assert_eq!(back, seed);
        assert!(serde_json::from_str::<Seed>("\"12a\"").is_err());
    }
}
