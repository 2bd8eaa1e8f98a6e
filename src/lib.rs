//! Verifiable random draws seeded from public block hashes.
//!
//! A seed is derived by mixing a finalized block hash with the SHA-256 of a
//! caller identifier; a `SeededGenerator` then turns it into ranges, weighted
//! picks and coin flips that any third party can recompute from the same
//! public inputs.
//!
//! Exports high-level functions callable from JavaScript via wasm-bindgen.
//! Seeds cross the boundary as decimal strings; block hashes and salts as
//! lowercase hex.

pub mod config;
pub mod error;
pub mod rng;
pub mod seed;
pub mod types;
pub mod weights;

pub use config::{ByteMix, DeriveConfig};
pub use error::{Result, RngError};
pub use rng::SeededGenerator;
pub use seed::{derive_seed, derive_seed_from_hash, derive_seed_with, BlockHashLookup, MemoryBlockHashes};
pub use types::{BlockHash, Salt, Seed};

// JS bindings, wasm32 builds only.

#[cfg(target_arch = "wasm32")]
mod wasm_exports {
    use wasm_bindgen::prelude::*;
    use crate::config::DeriveConfig;
    use crate::rng::SeededGenerator;
    use crate::types::{self, BlockHash, Salt, Seed};
    use crate::{seed, weights};

    /// Derive the decimal seed for `identifier` from a resolved block hash.
    /// `config` is optional: `{ byteMix: "raw" | "decimalAsHex" }`.
    #[wasm_bindgen(js_name = "deriveSeedFromHash")]
    pub fn wasm_derive_seed_from_hash(
        block_hash: &str,
        identifier: &str,
        config: JsValue,
    ) -> Result<String, JsError> {
        let config: DeriveConfig = if config.is_undefined() || config.is_null() {
            DeriveConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        let hash = BlockHash::from_hex(block_hash)?;
        let seed = seed::derive_seed_from_hash(&hash, identifier, &config)?;
        Ok(seed.to_string())
    }

    /// SHA-256 salt of `identifier`, lowercase hex.
    #[wasm_bindgen(js_name = "saltFor")]
    pub fn wasm_salt_for(identifier: &str) -> String {
        Salt::for_identifier(identifier).to_hex()
    }

    /// JS handle on a `SeededGenerator`.
    #[wasm_bindgen(js_name = "Generator")]
    pub struct WasmGenerator {
        inner: SeededGenerator,
    }

    #[wasm_bindgen(js_class = "Generator")]
    impl WasmGenerator {
        /// Build a primed generator from a decimal seed string.
        #[wasm_bindgen(constructor)]
        pub fn new(seed: &str) -> Result<WasmGenerator, JsError> {
            let seed: Seed = seed.parse()?;
            Ok(Self { inner: SeededGenerator::new(seed) })
        }

        pub fn advance(&mut self) -> u32 {
            self.inner.advance()
        }

        /// Bounds must be safe integers; the result lies in `[min, max]`,
        /// so it converts back to a JS number exactly.
        pub fn range(&mut self, min: f64, max: f64) -> Result<f64, JsError> {
            let (min, max) = types::range_bounds_from_f64(min, max)?;
            Ok(self.inner.range(min, max)? as f64)
        }

        /// Pick one element of `options`, weighted by `weights`.
        pub fn pick(&mut self, options: js_sys::Array, weights: Vec<f64>) -> Result<JsValue, JsError> {
            let weights = weights::weights_from_f64(&weights)?;
            let slots: Vec<u32> = (0..options.length()).collect();
            let index = *self.inner.pick(&slots, &weights)?;
            Ok(options.get(index))
        }

        #[wasm_bindgen(js_name = "pickIndex")]
        pub fn pick_index(&mut self, weights: Vec<f64>) -> Result<u32, JsError> {
            let weights = weights::weights_from_f64(&weights)?;
            Ok(self.inner.pick_index(&weights)? as u32)
        }

        pub fn bool(&mut self) -> bool {
            self.inner.bool()
        }
    }

    /// Liveness check for the JS loader.
    #[wasm_bindgen(js_name = "ping")]
    pub fn wasm_ping() -> String {
        "block rng ready".to_string()
    }
}
