//! Seed derivation: mix a finalized block hash with a hashed identifier.
//!
//! Resolving the block hash is delegated to a `BlockHashLookup`, which keeps
//! this module decoupled from any particular chain client. The mixing itself
//! is synchronous and lives in `derive_seed_from_hash()`.

use std::collections::HashMap;
use std::future::Future;

use crate::config::{ByteMix, DeriveConfig};
use crate::error::{Result, RngError};
use crate::types::{BlockHash, Salt, Seed};

/// Bits the accumulator is shifted by before each byte is added.
///
/// Deliberately 2, not 8: consecutive bytes overlap in the accumulator.
pub const MIX_SHIFT: usize = 2;

/// Resolves a block height to its finalized hash.
///
/// Implementations return `RngError::BlockNotFound` when the height is not
/// finalized yet. Retries and timeouts are the implementation's business.
pub trait BlockHashLookup {
    fn block_hash(&self, height: u64) -> impl Future<Output = Result<BlockHash>>;
}

/// Fixed height → hash table, for replaying published draws offline.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlockHashes {
    hashes: HashMap<u64, BlockHash>,
}

impl MemoryBlockHashes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, height: u64, hash: BlockHash) {
        self.hashes.insert(height, hash);
    }

    pub fn get(&self, height: u64) -> Result<BlockHash> {
        self.hashes
            .get(&height)
            .cloned()
            .ok_or(RngError::BlockNotFound { height })
    }
}

impl BlockHashLookup for MemoryBlockHashes {
    async fn block_hash(&self, height: u64) -> Result<BlockHash> {
        self.get(height)
    }
}

/// Derive the seed for `identifier` from the block at `height`.
pub async fn derive_seed<L: BlockHashLookup>(
    lookup: &L,
    height: u64,
    identifier: &str,
) -> Result<Seed> {
    derive_seed_with(lookup, height, identifier, &DeriveConfig::default()).await
}

/// `derive_seed` with explicit options.
///
/// The lookup is awaited exactly once; everything after it is synchronous.
pub async fn derive_seed_with<L: BlockHashLookup>(
    lookup: &L,
    height: u64,
    identifier: &str,
    config: &DeriveConfig,
) -> Result<Seed> {
    tracing::debug!(height, identifier, "calculating seed");
    let block_hash = lookup.block_hash(height).await?;
    let seed = derive_seed_from_hash(&block_hash, identifier, config)?;
    tracing::debug!(height, identifier, seed = %seed, "derived seed");
    Ok(seed)
}

/// Derive a seed from an already resolved block hash.
pub fn derive_seed_from_hash(
    block_hash: &BlockHash,
    identifier: &str,
    config: &DeriveConfig,
) -> Result<Seed> {
    let salt = Salt::for_identifier(identifier);
    mix(block_hash.as_bytes(), salt.as_bytes(), config.byte_mix)
}

/// Fold `hash[i] ^ salt[i]` into an accumulator, shifting by `MIX_SHIFT`
/// before each addition.
pub fn mix(hash: &[u8], salt: &[u8], byte_mix: ByteMix) -> Result<Seed> {
    if hash.len() != salt.len() {
        tracing::warn!(
            hash_len = hash.len(),
            salt_len = salt.len(),
            "block hash and salt lengths differ"
        );
        return Err(RngError::derivation(format!(
            "block hash is {} bytes but salt is {} bytes",
            hash.len(),
            salt.len()
        )));
    }

    let mut seed = Seed::default();
    for (&h, &s) in hash.iter().zip(salt) {
        seed.shift_add(MIX_SHIFT, byte_mix.contribution(h ^ s));
    }
    Ok(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededGenerator;
    use futures::executor::block_on;

    const SCENARIO_HASH: &str =
        "aabbccaabbccaabbccaabbccaabbccaabbccaabbccaabbccaabbccaabbccaabb";

    fn scenario_lookup() -> MemoryBlockHashes {
        let mut lookup = MemoryBlockHashes::new();
        lookup.insert(1_000, BlockHash::from_hex(SCENARIO_HASH).unwrap());
        lookup
    }

    #[test]
    fn test_mix_shifts_by_two_bits() {
        let seed = mix(&[0x01, 0x02, 0x03], &[0x00, 0x00, 0x00], ByteMix::Raw).unwrap();
        // ((1 << 2) + 2) << 2) + 3
        assert_eq!(seed, Seed::from(27));

        let seed = mix(&[0xff, 0xff], &[0x0f, 0xf0], ByteMix::Raw).unwrap();
        // 0xf0 = 240, 0x0f = 15 → (240 << 2) + 15
        assert_eq!(seed, Seed::from(975));
    }

    #[test]
    fn test_mix_empty_is_zero() {
        assert_eq!(mix(&[], &[], ByteMix::Raw).unwrap(), Seed::default());
    }

    #[test]
    fn test_scenario_seed() {
        let hash = BlockHash::from_hex(SCENARIO_HASH).unwrap();
        assert_eq!(hash.len(), 32);
        let seed = derive_seed_from_hash(&hash, "user-123", &DeriveConfig::default()).unwrap();
        assert_eq!(seed.to_string(), "529589838520884285615");

        let mut gen = SeededGenerator::new(seed);
        assert!(!gen.bool());
        assert_eq!(gen.state(), 2_736_123_731);
    }

    #[test]
    fn test_scenario_seed_decimal_as_hex() {
        let hash = BlockHash::from_hex(SCENARIO_HASH).unwrap();
        let config = DeriveConfig { byte_mix: ByteMix::DecimalAsHex };
        let seed = derive_seed_from_hash(&hash, "user-123", &config).unwrap();
        assert_eq!(seed.to_string(), "951303125290909056141");
    }

    #[test]
    fn test_zero_hash_yields_salt_schedule() {
        let hash = BlockHash::from_bytes(vec![0u8; 32]);
        let seed = derive_seed_from_hash(&hash, "user-123", &DeriveConfig::default()).unwrap();
        assert_eq!(seed.to_string(), "1493236063338313027388");
    }

    #[test]
    fn test_length_mismatch_is_derivation_error() {
        let short = BlockHash::from_bytes(vec![0xaa; 31]);
        let err = derive_seed_from_hash(&short, "user-123", &DeriveConfig::default()).unwrap_err();
        assert!(matches!(err, RngError::Derivation { .. }));

        let long = BlockHash::from_bytes(vec![0xaa; 48]);
        assert!(derive_seed_from_hash(&long, "user-123", &DeriveConfig::default()).is_err());
    }

    #[test]
    fn test_derive_seed_via_lookup() {
        let lookup = scenario_lookup();
        let seed = block_on(derive_seed(&lookup, 1_000, "user-123")).unwrap();
        assert_eq!(seed.to_string(), "529589838520884285615");
    }

    #[test]
    fn test_derive_seed_deterministic() {
        let lookup = scenario_lookup();
        let a = block_on(derive_seed(&lookup, 1_000, "chest-42")).unwrap();
        let b = block_on(derive_seed(&lookup, 1_000, "chest-42")).unwrap();
        assert_eq!(a, b);

        let other = block_on(derive_seed(&lookup, 1_000, "chest-43")).unwrap();
        assert_ne!(a, other);
    }

    #[test]
    fn test_unknown_height_is_block_not_found() {
        let lookup = scenario_lookup();
        let err = block_on(derive_seed(&lookup, 1_001, "user-123")).unwrap_err();
        assert_eq!(err, RngError::BlockNotFound { height: 1_001 });
    }
}
